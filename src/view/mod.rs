//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists, styles)
//! - `layout`: Search bar and sidebar
//! - `content`: Main content area rendering
//! - `progress`: Now-playing footer
//! - `overlays`: Modal overlays (error, help)

mod content;
mod layout;
mod overlays;
mod progress;
mod utils;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::model::AppModel;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + kind tabs
                Constraint::Min(0),    // Main content (sidebar + content)
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        layout::render_search_bar(frame, chunks[0], &model.ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Sidebar (album lists + playlists)
                Constraint::Percentage(70), // Main content
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], &model.ui_state);
        content::render_main_content(frame, main_chunks[1], model);

        progress::render_progress_bar(frame, chunks[2], &model.get_playback_info());

        if model.ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, &model.ui_state);
        }

        if model.ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
