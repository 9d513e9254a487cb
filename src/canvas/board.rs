use chrono::NaiveDate;

use super::annotation::{AnnotationCanvas, PointerInput, RestoreStatus};
use super::surface::{Brush, Point, Surface, ToolMode};
use crate::config::CanvasSettings;
use crate::models::DiaryField;
use crate::records::Diary;

/// Both annotation surfaces of the diary page for the selected date.
///
/// A surface exists only while it is mounted (on screen). Every operation
/// aimed at an unmounted surface does nothing.
pub struct DiaryBoard {
    date: NaiveDate,
    settings: CanvasSettings,
    mode: ToolMode,
    strengths: Option<AnnotationCanvas>,
    weaknesses: Option<AnnotationCanvas>,
}

impl DiaryBoard {
    pub fn new(date: NaiveDate, settings: CanvasSettings) -> Self {
        Self {
            date,
            settings,
            mode: ToolMode::Pen,
            strengths: None,
            weaknesses: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    fn slot(&self, field: DiaryField) -> &Option<AnnotationCanvas> {
        match field {
            DiaryField::Strengths => &self.strengths,
            DiaryField::Weaknesses => &self.weaknesses,
        }
    }

    fn slot_mut(&mut self, field: DiaryField) -> &mut Option<AnnotationCanvas> {
        match field {
            DiaryField::Strengths => &mut self.strengths,
            DiaryField::Weaknesses => &mut self.weaknesses,
        }
    }

    pub fn canvas(&self, field: DiaryField) -> Option<&AnnotationCanvas> {
        self.slot(field).as_ref()
    }

    pub fn is_mounted(&self, field: DiaryField) -> bool {
        self.slot(field).is_some()
    }

    fn brush(&self) -> Brush {
        Brush {
            pen_width: self.settings.pen_width,
            eraser_width: self.settings.eraser_width,
            pen_color: self.settings.pen_rgba(),
            blur: self.settings.blur,
        }
    }

    /// Place the surface at `origin`, creating it and loading the stored
    /// drawing on first mount
    pub fn mount(&mut self, field: DiaryField, origin: Point, diary: &Diary) {
        if let Some(canvas) = self.slot_mut(field) {
            canvas.set_origin(origin);
            return;
        }

        let surface = Surface::new(
            self.settings.width,
            self.settings.height,
            self.settings.pixel_ratio,
            self.brush(),
        );
        let mut canvas = AnnotationCanvas::new(surface, origin);
        canvas.set_mode(self.mode);
        let stored = diary.entry_for(self.date).and_then(|e| e.drawing(field));
        canvas.restore(stored);
        tracing::debug!(?field, date = %self.date, restoring = canvas.is_restoring(), "canvas mounted");
        *self.slot_mut(field) = Some(canvas);
    }

    pub fn unmount(&mut self, field: DiaryField) {
        *self.slot_mut(field) = None;
    }

    /// Switch the date; mounted surfaces reload that date's drawings
    pub fn select_date(&mut self, date: NaiveDate, diary: &Diary) {
        self.date = date;
        for field in DiaryField::ALL {
            let stored = diary.entry_for(date).and_then(|e| e.drawing(field));
            if let Some(canvas) = self.slot_mut(field) {
                canvas.restore(stored);
            }
        }
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        for field in DiaryField::ALL {
            if let Some(canvas) = self.slot_mut(field) {
                canvas.set_mode(mode);
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            ToolMode::Pen => ToolMode::Eraser,
            ToolMode::Eraser => ToolMode::Pen,
        };
        self.set_mode(next);
    }

    /// Mounted surface under a viewport point
    pub fn field_at(&self, viewport: Point) -> Option<DiaryField> {
        DiaryField::ALL
            .into_iter()
            .find(|&field| self.canvas(field).is_some_and(|c| c.contains(viewport)))
    }

    /// Surface with a stroke in progress
    pub fn active_field(&self) -> Option<DiaryField> {
        DiaryField::ALL
            .into_iter()
            .find(|&field| self.canvas(field).is_some_and(|c| c.is_drawing()))
    }

    pub fn pointer_down(&mut self, field: DiaryField, input: &PointerInput) -> bool {
        match self.slot_mut(field) {
            Some(canvas) => canvas.pointer_down(input),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, field: DiaryField, input: &PointerInput) -> bool {
        match self.slot_mut(field) {
            Some(canvas) => canvas.pointer_move(input),
            None => false,
        }
    }

    /// End the stroke and write the drawing into today's entry
    pub fn pointer_up(&mut self, field: DiaryField, diary: &mut Diary) -> bool {
        let date = self.date;
        let Some(canvas) = self.slot_mut(field) else {
            return false;
        };
        match canvas.pointer_up() {
            Some(data_url) => {
                diary.set_drawing(date, field, Some(data_url));
                true
            }
            None => false,
        }
    }

    pub fn pointer_leave(&mut self, field: DiaryField, diary: &mut Diary) -> bool {
        self.pointer_up(field, diary)
    }

    /// Wipe one surface and drop its stored drawing
    pub fn clear(&mut self, field: DiaryField, diary: &mut Diary) -> bool {
        let date = self.date;
        let Some(canvas) = self.slot_mut(field) else {
            return false;
        };
        canvas.clear();
        diary.set_drawing(date, field, None);
        true
    }

    /// Apply finished background decodes; true if any surface changed
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for field in DiaryField::ALL {
            if let Some(canvas) = self.slot_mut(field) {
                changed |= canvas.poll_restore() == RestoreStatus::Applied;
            }
        }
        changed
    }

    #[cfg(test)]
    fn wait(&mut self) {
        for field in DiaryField::ALL {
            if let Some(canvas) = self.slot_mut(field) {
                canvas.wait_restore();
            }
        }
    }
}
