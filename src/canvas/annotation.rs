use image::RgbaImage;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::codec::{self, CodecError};
use super::surface::{Point, Surface, ToolMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle,
    Drawing { last: Point },
}

/// Raw pointer event position, in viewport units
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(Point),
    /// Active touches; only the first one draws
    Touch(Vec<Point>),
}

impl PointerInput {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerInput::Mouse(point) => Some(*point),
            PointerInput::Touch(touches) => touches.first().copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    /// Nothing was pending
    Idle,
    Pending,
    Applied,
    Failed,
}

type DecodeResult = Result<RgbaImage, CodecError>;

/// One drawable surface placed at an on-screen origin
pub struct AnnotationCanvas {
    surface: Surface,
    origin: Point,
    stroke: StrokeState,
    pending: Option<Receiver<DecodeResult>>,
}

impl AnnotationCanvas {
    pub fn new(surface: Surface, origin: Point) -> Self {
        Self {
            surface,
            origin,
            stroke: StrokeState::Idle,
            pending: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, StrokeState::Drawing { .. })
    }

    pub fn mode(&self) -> ToolMode {
        self.surface.mode()
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.surface.set_mode(mode);
    }

    /// Viewport to surface-local logical coordinates
    pub fn to_local(&self, viewport: Point) -> Point {
        Point::new(viewport.x - self.origin.x, viewport.y - self.origin.y)
    }

    /// Whether a viewport point falls on the surface
    pub fn contains(&self, viewport: Point) -> bool {
        let local = self.to_local(viewport);
        let (w, h) = self.surface.logical_size();
        local.x >= 0.0 && local.y >= 0.0 && local.x < w as f32 && local.y < h as f32
    }

    /// Start a stroke. Ignored while a stroke is already active.
    /// A pending restore is applied first so the stroke lands on the stored drawing.
    pub fn pointer_down(&mut self, input: &PointerInput) -> bool {
        if self.is_drawing() {
            return false;
        }
        let Some(position) = input.position() else {
            return false;
        };
        if self.is_restoring() {
            self.wait_restore();
        }
        self.stroke = StrokeState::Drawing {
            last: self.to_local(position),
        };
        true
    }

    /// Extend the active stroke to the new position
    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        let StrokeState::Drawing { last } = self.stroke else {
            return false;
        };
        let Some(position) = input.position() else {
            return false;
        };
        let current = self.to_local(position);
        self.surface.stroke_segment(last, current);
        self.stroke = StrokeState::Drawing { last: current };
        true
    }

    /// End the active stroke and return the serialized surface
    pub fn pointer_up(&mut self) -> Option<String> {
        if !self.is_drawing() {
            return None;
        }
        self.stroke = StrokeState::Idle;
        match self.serialize() {
            Ok(data_url) => Some(data_url),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode drawing");
                None
            }
        }
    }

    pub fn pointer_leave(&mut self) -> Option<String> {
        self.pointer_up()
    }

    pub fn serialize(&self) -> Result<String, CodecError> {
        codec::encode_data_url(self.surface.pixels())
    }

    /// Wipe the surface. Supersedes a pending restore and ends any stroke.
    pub fn clear(&mut self) {
        self.pending = None;
        self.stroke = StrokeState::Idle;
        self.surface.clear();
    }

    /// Clear, then load `stored` in the background
    pub fn restore(&mut self, stored: Option<&str>) {
        self.clear();
        let Some(stored) = stored else {
            return;
        };

        let (tx, rx) = mpsc::channel();
        let data_url = stored.to_string();
        let spawned = thread::Builder::new()
            .name("canvas-restore".to_string())
            .spawn(move || {
                // Receiver may be gone if superseded
                let _ = tx.send(codec::decode_data_url(&data_url));
            });
        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                tracing::warn!(error = %e, "could not spawn decode thread, decoding inline");
                let result = codec::decode_data_url(stored);
                self.finish_restore(result);
            }
        }
    }

    pub fn is_restoring(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished decode, if any, without blocking
    pub fn poll_restore(&mut self) -> RestoreStatus {
        let Some(rx) = &self.pending else {
            return RestoreStatus::Idle;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish_restore(result)
            }
            Err(TryRecvError::Empty) => RestoreStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                tracing::warn!("decode thread exited without a result");
                RestoreStatus::Failed
            }
        }
    }

    /// Block until the pending decode lands
    pub fn wait_restore(&mut self) -> RestoreStatus {
        let Some(rx) = self.pending.take() else {
            return RestoreStatus::Idle;
        };
        match rx.recv() {
            Ok(result) => self.finish_restore(result),
            Err(_) => {
                tracing::warn!("decode thread exited without a result");
                RestoreStatus::Failed
            }
        }
    }

    fn finish_restore(&mut self, result: DecodeResult) -> RestoreStatus {
        match result {
            Ok(image) => {
                self.surface.draw_image(&image);
                RestoreStatus::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored drawing could not be decoded");
                RestoreStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::Brush;

    fn canvas_at(x: f32, y: f32) -> AnnotationCanvas {
        AnnotationCanvas::new(Surface::new(40, 20, 2.0, Brush::default()), Point::new(x, y))
    }

    fn mouse(x: f32, y: f32) -> PointerInput {
        PointerInput::Mouse(Point::new(x, y))
    }

    fn draw_line(canvas: &mut AnnotationCanvas) -> Option<String> {
        canvas.pointer_down(&mouse(5.0, 5.0));
        canvas.pointer_move(&mouse(20.0, 10.0));
        canvas.pointer_move(&mouse(35.0, 15.0));
        canvas.pointer_up()
    }

    #[test]
    fn test_stroke_state_machine() {
        let mut canvas = canvas_at(0.0, 0.0);
        assert!(!canvas.pointer_move(&mouse(3.0, 3.0)));
        assert!(canvas.surface().is_blank());

        assert!(canvas.pointer_down(&mouse(2.0, 2.0)));
        assert_eq!(canvas.stroke_state(), StrokeState::Drawing { last: Point::new(2.0, 2.0) });

        // Re-entrant down keeps the original contact point
        assert!(!canvas.pointer_down(&mouse(30.0, 15.0)));
        assert_eq!(canvas.stroke_state(), StrokeState::Drawing { last: Point::new(2.0, 2.0) });

        assert!(canvas.pointer_move(&mouse(10.0, 2.0)));
        assert_eq!(canvas.stroke_state(), StrokeState::Drawing { last: Point::new(10.0, 2.0) });

        assert!(canvas.pointer_leave().is_some());
        assert_eq!(canvas.stroke_state(), StrokeState::Idle);
        assert!(canvas.pointer_up().is_none());
    }

    #[test]
    fn test_viewport_offset_is_subtracted() {
        let mut canvas = canvas_at(100.0, 50.0);
        assert!(canvas.contains(Point::new(100.0, 50.0)));
        assert!(!canvas.contains(Point::new(99.0, 50.0)));
        assert!(!canvas.contains(Point::new(140.0, 60.0)));

        canvas.pointer_down(&mouse(110.0, 60.0));
        assert_eq!(canvas.stroke_state(), StrokeState::Drawing { last: Point::new(10.0, 10.0) });
        canvas.pointer_move(&mouse(130.0, 60.0));
        assert!(canvas.surface().alpha_at(20, 10) > 0);
        assert_eq!(canvas.surface().alpha_at(20, 2), 0);
    }

    #[test]
    fn test_touch_uses_first_contact() {
        let mut canvas = canvas_at(0.0, 0.0);
        let touches = PointerInput::Touch(vec![Point::new(4.0, 4.0), Point::new(30.0, 18.0)]);
        canvas.pointer_down(&touches);
        assert_eq!(canvas.stroke_state(), StrokeState::Drawing { last: Point::new(4.0, 4.0) });

        assert!(!canvas.pointer_move(&PointerInput::Touch(Vec::new())));
        assert_eq!(PointerInput::Touch(Vec::new()).position(), None);
    }

    #[test]
    fn test_drawing_survives_restore() {
        let mut canvas = canvas_at(0.0, 0.0);
        let stored = draw_line(&mut canvas).unwrap();
        let original = canvas.surface().pixels().clone();

        let mut other = canvas_at(0.0, 0.0);
        other.restore(Some(&stored));
        assert!(other.is_restoring());
        assert_eq!(other.wait_restore(), RestoreStatus::Applied);
        assert!(!other.surface().is_blank());
        assert_eq!(other.surface().pixels(), &original);
        assert_eq!(other.poll_restore(), RestoreStatus::Idle);
    }

    #[test]
    fn test_poll_eventually_applies() {
        let mut canvas = canvas_at(0.0, 0.0);
        let stored = draw_line(&mut canvas).unwrap();

        let mut other = canvas_at(0.0, 0.0);
        other.restore(Some(&stored));
        let mut status = other.poll_restore();
        for _ in 0..500 {
            if status != RestoreStatus::Pending {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
            status = other.poll_restore();
        }
        assert_eq!(status, RestoreStatus::Applied);
        assert!(!other.surface().is_blank());
    }

    #[test]
    fn test_corrupt_image_leaves_surface_blank() {
        let mut canvas = canvas_at(0.0, 0.0);
        draw_line(&mut canvas);
        canvas.restore(Some("data:image/png;base64,bm90IGEgcG5n"));
        assert!(canvas.surface().is_blank());
        assert_eq!(canvas.wait_restore(), RestoreStatus::Failed);
        assert!(canvas.surface().is_blank());
    }

    #[test]
    fn test_restore_without_image_just_clears() {
        let mut canvas = canvas_at(0.0, 0.0);
        draw_line(&mut canvas);
        canvas.restore(None);
        assert!(canvas.surface().is_blank());
        assert!(!canvas.is_restoring());
    }

    #[test]
    fn test_clear_supersedes_pending_restore() {
        let mut canvas = canvas_at(0.0, 0.0);
        let stored = draw_line(&mut canvas).unwrap();
        canvas.restore(Some(&stored));
        canvas.clear();
        assert!(!canvas.is_restoring());
        assert_eq!(canvas.wait_restore(), RestoreStatus::Idle);
        assert!(canvas.surface().is_blank());
    }

    #[test]
    fn test_stroke_during_restore_keeps_stored_drawing() {
        let mut canvas = canvas_at(0.0, 0.0);
        canvas.pointer_down(&mouse(5.0, 3.0));
        canvas.pointer_move(&mouse(35.0, 3.0));
        let stored = canvas.pointer_up().unwrap();
        let stored_ink = canvas.surface().alpha_at(20, 3);
        assert!(stored_ink > 0);

        let mut other = canvas_at(0.0, 0.0);
        other.restore(Some(&stored));
        assert!(other.is_restoring());
        other.pointer_down(&mouse(5.0, 15.0));
        assert!(!other.is_restoring());
        other.pointer_move(&mouse(35.0, 15.0));
        let committed = other.pointer_up().unwrap();

        let mut reopened = canvas_at(0.0, 0.0);
        reopened.restore(Some(&committed));
        assert_eq!(reopened.wait_restore(), RestoreStatus::Applied);
        assert!(reopened.surface().alpha_at(20, 3) > 0);
        assert!(reopened.surface().alpha_at(20, 15) > 0);
    }

    #[test]
    fn test_eraser_stroke_never_adds_ink() {
        let mut canvas = canvas_at(0.0, 0.0);
        draw_line(&mut canvas);
        let before = canvas.surface().ink_pixels();

        canvas.set_mode(ToolMode::Eraser);
        canvas.pointer_down(&mouse(0.0, 0.0));
        canvas.pointer_move(&mouse(40.0, 20.0));
        canvas.pointer_up();

        assert!(canvas.surface().ink_pixels() < before);
    }
}
