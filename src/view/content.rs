//! Main content area rendering (track, album and artist lists, queue)

use ratatui::widgets::Padding;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
};

use super::utils::{
    border_style, calculate_num_width, format_duration, header_style, render_scrollable_list, row_style,
    truncate_string,
};
use crate::model::{ActiveSection, Album, AppModel, Artist, ContentView, Favorites, SearchPaging, Track};

const STAR: &str = "★";

pub fn render_main_content(frame: &mut Frame, area: Rect, model: &AppModel) {
    let is_focused = model.ui_state.active_section == ActiveSection::MainContent;
    let content_state = &model.content_state;

    if content_state.is_loading {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style(is_focused)),
            );
        frame.render_widget(loading, area);
        return;
    }

    let favorites = model.session.favorites();
    let playing_id = model.session.current_track().map(|t| t.id.as_str());

    match &content_state.view {
        ContentView::Empty => {
            let content = Paragraph::new(
                "Type in search and press Enter to find music\n\nUse Tab to navigate between sections\nUse ↑/↓ to select items\nPress Enter to open or play\nPress h for all keys",
            )
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1))
                    .border_style(border_style(is_focused)),
            );
            frame.render_widget(content, area);
        }
        ContentView::Tracks {
            title,
            tracks,
            selected_index,
            paging,
        } => {
            let content_width = area.width.saturating_sub(4) as usize;
            let mut items = render_track_items(
                tracks,
                *selected_index,
                is_focused,
                |_, track| playing_id == Some(track.id.as_str()),
                favorites,
                content_width,
            );
            push_paging_hint(&mut items, paging.as_ref());
            render_scrollable_list(frame, area, items, *selected_index + 1, list_block(title, is_focused));
        }
        ContentView::Albums {
            title,
            albums,
            selected_index,
            paging,
        } => {
            let content_width = area.width.saturating_sub(4) as usize;
            let mut items = render_album_items(albums, *selected_index, is_focused, favorites, content_width);
            push_paging_hint(&mut items, paging.as_ref());
            render_scrollable_list(frame, area, items, *selected_index + 1, list_block(title, is_focused));
        }
        ContentView::Artists {
            title,
            artists,
            selected_index,
            paging,
        } => {
            let mut items = render_artist_items(artists, *selected_index, is_focused, favorites);
            push_paging_hint(&mut items, paging.as_ref());
            render_scrollable_list(frame, area, items, *selected_index + 1, list_block(title, is_focused));
        }
        ContentView::Queue { selected_index } => {
            render_queue(frame, area, model, *selected_index, is_focused);
        }
    }
}

fn list_block(title: &str, is_focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .padding(Padding::horizontal(1))
        .border_style(border_style(is_focused))
}

fn push_paging_hint(items: &mut Vec<ListItem<'static>>, paging: Option<&SearchPaging>) {
    if let Some(paging) = paging
        && paging.loading_more
    {
        items.push(ListItem::new("  Loading more...").style(Style::default().fg(Color::Yellow)));
    }
}

fn render_queue(frame: &mut Frame, area: Rect, model: &AppModel, selected_index: usize, is_focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Currently playing
            Constraint::Min(0),    // Queue
        ])
        .split(area);

    let queue = model.session.queue();
    let cp_text = match queue.current_track() {
        Some(track) => {
            let star = if model.session.favorites().is_starred(&track.id) { "★ " } else { "" };
            format!("{}{}  -  {} ({})", star, track.title, track.artist, track.album)
        }
        None => "No track playing".to_string(),
    };
    let cp_widget = Paragraph::new(cp_text).style(Style::default().fg(Color::Cyan)).block(
        Block::default()
            .padding(Padding::horizontal(1))
            .borders(Borders::ALL)
            .title(" 🎵 Now Playing ")
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(cp_widget, chunks[0]);

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let mut list_items = render_track_items(
        queue.tracks(),
        selected_index,
        is_focused,
        |i, _| queue.is_current(i),
        model.session.favorites(),
        content_width,
    );

    if queue.is_empty() {
        list_items.push(ListItem::new("       Queue is empty").style(Style::default().fg(Color::DarkGray)));
    }

    let title = format!(" Queue ({}) · {} ", queue.len(), model.session.loop_mode().label());
    let queue_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(" d remove · D clear · K/J move · S shuffle ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(is_focused));

    render_scrollable_list(frame, chunks[1], list_items, selected_index + 1, queue_block);
}

/// Header row plus one row per track. `is_playing` decides the ▶ marker; the
/// queue matches by position since the same song may be queued twice.
fn render_track_items(
    tracks: &[Track],
    selected_index: usize,
    is_focused: bool,
    is_playing: impl Fn(usize, &Track) -> bool,
    favorites: &Favorites,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(tracks.len());
    let star_width = 1;
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + star_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    let mut items: Vec<ListItem<'static>> = vec![
        ListItem::new(format!(
            " {:<num_width$}   {}   {:<title_width$}   {:<artist_width$}   {}",
            "#", " ", "Title", "Artist", "Duration",
        ))
        .style(header_style()),
    ];

    items.extend(tracks.iter().enumerate().map(|(i, track)| {
        let playing = is_playing(i, track);
        let star = if favorites.is_starred(&track.id) { STAR } else { " " };
        let marker = if playing { "▶" } else { " " };
        let track_num = format!("{}{:<num_width$}", marker, i + 1);

        ListItem::new(format!(
            "{}   {}   {}   {}   {}",
            track_num,
            star,
            truncate_string(&track.title, title_width),
            truncate_string(&track.artist, artist_width),
            format_duration(track.duration_secs)
        ))
        .style(row_style(i == selected_index, is_focused, playing))
    }));
    items
}

fn render_album_items(
    albums: &[Album],
    selected_index: usize,
    is_focused: bool,
    favorites: &Favorites,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_w = calculate_num_width(albums.len());
    let year_w = 4;
    let fixed_width = 1 + num_w + 3 + 1 + 3 + 3 + 3 + year_w;
    let remaining = content_width.saturating_sub(fixed_width);
    let album_w = (remaining * 50) / 100;
    let artist_w = remaining.saturating_sub(album_w);

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_w$}   {}   {:<album_w$}   {:<artist_w$}   {:>year_w$}",
            "#", " ", "Album", "Artist", "Year",
        ))
        .style(header_style()),
    ];

    items.extend(albums.iter().enumerate().map(|(i, album)| {
        let star = if favorites.is_starred(&album.id) { STAR } else { " " };
        let year = album.year.map(|y| y.to_string()).unwrap_or_default();
        ListItem::new(format!(
            " {:<num_w$}   {}   {}   {}   {:>year_w$}",
            i + 1,
            star,
            truncate_string(&album.name, album_w),
            truncate_string(&album.artist, artist_w),
            year,
        ))
        .style(row_style(i == selected_index, is_focused, false))
    }));
    items
}

fn render_artist_items(
    artists: &[Artist],
    selected_index: usize,
    is_focused: bool,
    favorites: &Favorites,
) -> Vec<ListItem<'static>> {
    let num_w = calculate_num_width(artists.len());

    let mut items = vec![ListItem::new(format!(" {:<num_w$}   {}   {}", "#", " ", "Artist")).style(header_style())];

    items.extend(artists.iter().enumerate().map(|(i, artist)| {
        let star = if favorites.is_starred(&artist.id) { STAR } else { " " };
        let albums = match artist.album_count {
            0 => String::new(),
            1 => " (1 album)".to_string(),
            n => format!(" ({n} albums)"),
        };
        ListItem::new(format!(" {:<num_w$}   {}   {}{}", i + 1, star, artist.name, albums))
            .style(row_style(i == selected_index, is_focused, false))
    }));
    items
}
