pub mod canvas;
pub mod color;
pub mod confirm_clear;
pub mod diary_view;
pub mod editor;
pub mod help;
pub mod reflection_table;
pub mod stats_panel;
pub mod status_bar;
pub mod tabs;
pub mod task_form;
pub mod task_list;
pub mod text_popup;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
