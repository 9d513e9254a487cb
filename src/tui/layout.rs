use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

use crate::models::DiaryField;

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub header_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Width: two diary columns need room for a text box and a canvas each
    /// Height: 2 borders + tabs + header + content + status
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 20;

    pub fn calculate(size: Rect) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Split vertically: tabs (1 line), date header (1 line), content, status (1 line)
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Date header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            tabs_area: vertical[0],
            header_area: vertical[1],
            main_area: vertical[2],
            status_area: vertical[3],
        }
    }

    /// Diary tab areas: one column per field, text above canvas
    pub fn diary(&self) -> DiaryLayout {
        let columns = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(self.main_area);

        let mut text = [Rect::default(); 2];
        let mut canvas = [Rect::default(); 2];
        for (i, column) in columns.iter().enumerate() {
            let rows = RatLayout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(3)])
                .split(*column);
            text[i] = rows[0];
            canvas[i] = rows[1];
        }
        DiaryLayout { text, canvas }
    }
}

pub struct DiaryLayout {
    pub text: [Rect; 2],
    /// Bordered canvas blocks
    pub canvas: [Rect; 2],
}

impl DiaryLayout {
    fn index(field: DiaryField) -> usize {
        match field {
            DiaryField::Strengths => 0,
            DiaryField::Weaknesses => 1,
        }
    }

    pub fn text_area(&self, field: DiaryField) -> Rect {
        self.text[Self::index(field)]
    }

    pub fn canvas_block(&self, field: DiaryField) -> Rect {
        self.canvas[Self::index(field)]
    }

    /// Drawable cells inside the canvas border
    pub fn canvas_inner(&self, field: DiaryField) -> Rect {
        let block = self.canvas_block(field);
        Rect::new(
            block.x + 1,
            block.y + 1,
            block.width.saturating_sub(2),
            block.height.saturating_sub(2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_terminal_is_padded_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5));
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn test_diary_columns_do_not_overlap() {
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        let diary = layout.diary();
        let left = diary.canvas_inner(DiaryField::Strengths);
        let right = diary.canvas_inner(DiaryField::Weaknesses);
        assert!(left.x + left.width <= right.x);
        assert!(left.y > diary.text_area(DiaryField::Strengths).y);
        assert!(left.height > 0 && left.width > 0);
    }
}
