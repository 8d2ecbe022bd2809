//! Layout rendering (search bar, sidebar)

use ratatui::widgets::Padding;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::utils::border_style;
use crate::model::{ActiveSection, SearchKind, UiState};

const SEARCH_KINDS: [(SearchKind, &str); 3] = [
    (SearchKind::Songs, "Songs"),
    (SearchKind::Albums, "Albums"),
    (SearchKind::Artists, "Artists"),
];

pub fn render_search_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(30), // Search kind tabs
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::Search;
    let (text, style) = if ui_state.search_query.is_empty() {
        (ui_state.search_kind.placeholder().to_string(), Style::default().fg(Color::DarkGray))
    } else if is_focused {
        (format!("{}▏", ui_state.search_query), Style::default().fg(Color::Green))
    } else {
        (ui_state.search_query.clone(), Style::default().fg(Color::White))
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(search, chunks[0]);

    let tabs: Vec<Span> = SEARCH_KINDS
        .iter()
        .flat_map(|(kind, label)| {
            let style = if *kind == ui_state.search_kind {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {label} "), style), Span::raw(" ")]
        })
        .collect();

    let kind_tabs = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ctrl-N / Ctrl-B ")
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(kind_tabs, chunks[1]);
}

fn sidebar_item_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let library_height = ui_state.library_items.len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(library_height), // Album lists + borders
            Constraint::Min(0),                 // Playlists (fills remaining space)
        ])
        .split(area);

    let library_focused = ui_state.active_section == ActiveSection::Library;
    let library_items: Vec<ListItem> = ui_state
        .library_items
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            ListItem::new(kind.label()).style(sidebar_item_style(i == ui_state.library_selected, library_focused))
        })
        .collect();

    let library = List::new(library_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Library ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(library_focused)),
    );
    frame.render_widget(library, chunks[0]);

    let playlists_focused = ui_state.active_section == ActiveSection::Playlists;
    let playlist_items: Vec<ListItem> = ui_state
        .playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            let text = format!("{} ({})", playlist.name, playlist.song_count);
            ListItem::new(text).style(sidebar_item_style(i == ui_state.playlist_selected, playlists_focused))
        })
        .collect();

    let playlists = List::new(playlist_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Playlists ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(playlists_focused)),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.playlist_selected));

    frame.render_stateful_widget(playlists, chunks[1], &mut list_state);
}
