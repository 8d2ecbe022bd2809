//! Main application model with state management

use std::time::{Duration, Instant};

use super::content::{
    Album, ContentState, ContentView, PlaylistSummary, SEARCH_PAGE_SIZE, SearchPaging,
    SearchResults, Track,
};
use super::playback::PlaybackInfo;
use super::session::Session;
use super::types::{ActiveSection, AlbumListKind, SearchKind, SelectedItem, UiState};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Distance from the end of a search list at which the next page is requested
const PAGINATION_THRESHOLD: usize = 5;

/// Main application model containing all state. Owned by the controller; the
/// view only ever sees a shared borrow.
#[derive(Default)]
pub struct AppModel {
    pub session: Session,
    pub ui_state: UiState,
    pub content_state: ContentState,
    should_quit: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    // ========================================================================
    // Sections & sidebar
    // ========================================================================

    pub fn cycle_section_forward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.next();
    }

    pub fn cycle_section_backward(&mut self) {
        self.ui_state.active_section = self.ui_state.active_section.prev();
    }

    pub fn set_active_section(&mut self, section: ActiveSection) {
        self.ui_state.active_section = section;
    }

    pub fn move_selection_up(&mut self) {
        let state = &mut self.ui_state;
        match state.active_section {
            ActiveSection::Library => state.library_selected = state.library_selected.saturating_sub(1),
            ActiveSection::Playlists => state.playlist_selected = state.playlist_selected.saturating_sub(1),
            _ => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        let state = &mut self.ui_state;
        match state.active_section {
            ActiveSection::Library => {
                if state.library_selected < state.library_items.len().saturating_sub(1) {
                    state.library_selected += 1;
                }
            }
            ActiveSection::Playlists => {
                if state.playlist_selected < state.playlists.len().saturating_sub(1) {
                    state.playlist_selected += 1;
                }
            }
            _ => {}
        }
    }

    /// Jump to the first entry of the focused list.
    pub fn move_to_top(&mut self) {
        match self.ui_state.active_section {
            ActiveSection::Library => self.ui_state.library_selected = 0,
            ActiveSection::Playlists => self.ui_state.playlist_selected = 0,
            ActiveSection::MainContent => {
                if let Some(index) = self.selected_index_mut() {
                    *index = 0;
                }
            }
            ActiveSection::Search => {}
        }
    }

    /// Jump to the last entry of the focused list.
    pub fn move_to_bottom(&mut self) {
        let state = &mut self.ui_state;
        match state.active_section {
            ActiveSection::Library => state.library_selected = state.library_items.len().saturating_sub(1),
            ActiveSection::Playlists => state.playlist_selected = state.playlists.len().saturating_sub(1),
            ActiveSection::MainContent => {
                let last = self.content_len().saturating_sub(1);
                if let Some(index) = self.selected_index_mut() {
                    *index = last;
                }
            }
            ActiveSection::Search => {}
        }
    }

    pub fn selected_album_list(&self) -> Option<AlbumListKind> {
        self.ui_state.library_items.get(self.ui_state.library_selected).copied()
    }

    pub fn set_playlists(&mut self, playlists: Vec<PlaylistSummary>) {
        self.ui_state.playlists = playlists;
        self.ui_state.playlist_selected = 0;
    }

    pub fn selected_playlist(&self) -> Option<&PlaylistSummary> {
        self.ui_state.playlists.get(self.ui_state.playlist_selected)
    }

    // ========================================================================
    // Search input
    // ========================================================================

    pub fn append_to_search(&mut self, c: char) {
        self.ui_state.search_query.push(c);
    }

    pub fn backspace_search(&mut self) {
        self.ui_state.search_query.pop();
    }

    pub fn clear_search(&mut self) {
        self.ui_state.search_query.clear();
    }

    pub fn cycle_search_kind(&mut self, forward: bool) {
        let kind = self.ui_state.search_kind;
        self.ui_state.search_kind = if forward { kind.next() } else { kind.prev() };
    }

    // ========================================================================
    // Errors & popups
    // ========================================================================

    pub fn set_error(&mut self, message: String) {
        self.ui_state.error_message = Some(message);
        self.ui_state.error_timestamp = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.ui_state.error_message = None;
        self.ui_state.error_timestamp = None;
    }

    pub fn has_error(&self) -> bool {
        self.ui_state.error_message.is_some()
    }

    pub fn auto_clear_old_errors(&mut self) {
        if let Some(timestamp) = self.ui_state.error_timestamp
            && timestamp.elapsed() > ERROR_DISPLAY_TIME
        {
            self.clear_error();
        }
    }

    pub fn show_help_popup(&mut self) {
        self.ui_state.show_help_popup = true;
    }

    pub fn hide_help_popup(&mut self) {
        self.ui_state.show_help_popup = false;
    }

    pub fn is_help_popup_open(&self) -> bool {
        self.ui_state.show_help_popup
    }

    // ========================================================================
    // Content views
    // ========================================================================

    pub fn set_content_loading(&mut self, loading: bool) {
        self.content_state.is_loading = loading;
    }

    /// Show `view` on top of the current one so Back returns to it.
    pub fn push_view(&mut self, view: ContentView) {
        let state = &mut self.content_state;
        if !matches!(state.view, ContentView::Empty) {
            let previous = std::mem::take(&mut state.view);
            state.navigation_stack.push(previous);
        }
        state.view = view;
        state.is_loading = false;
    }

    /// Show `view` as a fresh root, dropping the navigation history.
    pub fn replace_view(&mut self, view: ContentView) {
        let state = &mut self.content_state;
        state.navigation_stack.clear();
        state.view = view;
        state.is_loading = false;
    }

    pub fn show_tracks(&mut self, title: String, tracks: Vec<Track>) {
        self.push_view(ContentView::Tracks {
            title,
            tracks,
            selected_index: 0,
            paging: None,
        });
    }

    pub fn show_albums(&mut self, title: String, albums: Vec<Album>) {
        self.push_view(ContentView::Albums {
            title,
            albums,
            selected_index: 0,
            paging: None,
        });
    }

    /// First page of a new search replaces whatever was shown.
    pub fn set_search_results(&mut self, query: String, results: SearchResults) {
        let paging = Some(SearchPaging {
            kind: match &results {
                SearchResults::Songs(_) => SearchKind::Songs,
                SearchResults::Albums(_) => SearchKind::Albums,
                SearchResults::Artists(_) => SearchKind::Artists,
            },
            query: query.clone(),
            next_page: 1,
            has_more: results.len() >= SEARCH_PAGE_SIZE,
            loading_more: false,
        });
        let title = format!("Results for \"{query}\"");
        let view = match results {
            SearchResults::Songs(tracks) => ContentView::Tracks {
                title,
                tracks,
                selected_index: 0,
                paging,
            },
            SearchResults::Albums(albums) => ContentView::Albums {
                title,
                albums,
                selected_index: 0,
                paging,
            },
            SearchResults::Artists(artists) => ContentView::Artists {
                title,
                artists,
                selected_index: 0,
                paging,
            },
        };
        self.replace_view(view);
    }

    /// Append a follow-up page, but only to the search it belongs to.
    pub fn append_search_page(&mut self, kind: SearchKind, query: &str, page: u32, results: SearchResults) -> bool {
        let count = results.len();
        let appended = match (&mut self.content_state.view, results) {
            (ContentView::Tracks { tracks, paging: Some(p), .. }, SearchResults::Songs(mut more))
                if p.matches(kind, query, page) =>
            {
                tracks.append(&mut more);
                Some(p)
            }
            (ContentView::Albums { albums, paging: Some(p), .. }, SearchResults::Albums(mut more))
                if p.matches(kind, query, page) =>
            {
                albums.append(&mut more);
                Some(p)
            }
            (ContentView::Artists { artists, paging: Some(p), .. }, SearchResults::Artists(mut more))
                if p.matches(kind, query, page) =>
            {
                artists.append(&mut more);
                Some(p)
            }
            _ => None,
        };
        match appended {
            Some(paging) => {
                paging.next_page = page + 1;
                paging.has_more = count >= SEARCH_PAGE_SIZE;
                paging.loading_more = false;
                true
            }
            None => false,
        }
    }

    /// The next search page to request, if the selection is close to the end.
    pub fn should_load_more(&self) -> Option<(SearchKind, String, u32)> {
        let (len, selected, paging) = match &self.content_state.view {
            ContentView::Tracks { tracks, selected_index, paging: Some(p), .. } => (tracks.len(), *selected_index, p),
            ContentView::Albums { albums, selected_index, paging: Some(p), .. } => (albums.len(), *selected_index, p),
            ContentView::Artists { artists, selected_index, paging: Some(p), .. } => (artists.len(), *selected_index, p),
            _ => return None,
        };
        if paging.loading_more || !paging.has_more {
            return None;
        }
        if selected + PAGINATION_THRESHOLD >= len {
            return Some((paging.kind, paging.query.clone(), paging.next_page));
        }
        None
    }

    pub fn set_loading_more(&mut self, loading: bool) {
        if let Some(paging) = self.current_paging_mut() {
            paging.loading_more = loading;
        }
    }

    fn current_paging_mut(&mut self) -> Option<&mut SearchPaging> {
        match &mut self.content_state.view {
            ContentView::Tracks { paging, .. }
            | ContentView::Albums { paging, .. }
            | ContentView::Artists { paging, .. } => paging.as_mut(),
            _ => None,
        }
    }

    pub fn is_queue_view_visible(&self) -> bool {
        matches!(self.content_state.view, ContentView::Queue { .. })
    }

    pub fn toggle_queue_view(&mut self) {
        if self.is_queue_view_visible() {
            self.navigate_back();
            return;
        }
        let selected_index = self.session.queue().current_index().unwrap_or(0);
        self.push_view(ContentView::Queue { selected_index });
    }

    pub fn navigate_back(&mut self) -> bool {
        let state = &mut self.content_state;
        match state.navigation_stack.pop() {
            Some(previous) => {
                state.view = previous;
                true
            }
            None => {
                state.view = ContentView::Empty;
                false
            }
        }
    }

    fn content_len(&self) -> usize {
        match &self.content_state.view {
            ContentView::Empty => 0,
            ContentView::Tracks { tracks, .. } => tracks.len(),
            ContentView::Albums { albums, .. } => albums.len(),
            ContentView::Artists { artists, .. } => artists.len(),
            ContentView::Queue { .. } => self.session.queue().len(),
        }
    }

    fn selected_index_mut(&mut self) -> Option<&mut usize> {
        match &mut self.content_state.view {
            ContentView::Empty => None,
            ContentView::Tracks { selected_index, .. }
            | ContentView::Albums { selected_index, .. }
            | ContentView::Artists { selected_index, .. }
            | ContentView::Queue { selected_index } => Some(selected_index),
        }
    }

    pub fn content_move_up(&mut self) {
        if let Some(index) = self.selected_index_mut() {
            *index = index.saturating_sub(1);
        }
    }

    pub fn content_move_down(&mut self) {
        let len = self.content_len();
        if let Some(index) = self.selected_index_mut()
            && *index + 1 < len
        {
            *index += 1;
        }
    }

    /// Point the queue view at `index`, clamped to the queue.
    pub fn set_queue_selection(&mut self, index: usize) {
        let last = self.session.queue().len().saturating_sub(1);
        if let ContentView::Queue { selected_index } = &mut self.content_state.view {
            *selected_index = index.min(last);
        }
    }

    pub fn selected_queue_index(&self) -> Option<usize> {
        match &self.content_state.view {
            ContentView::Queue { selected_index } if !self.session.queue().is_empty() => Some(*selected_index),
            _ => None,
        }
    }

    pub fn get_selected_content_item(&self) -> Option<SelectedItem> {
        match &self.content_state.view {
            ContentView::Empty => None,
            ContentView::Tracks {
                tracks, selected_index, ..
            } => tracks.get(*selected_index).cloned().map(SelectedItem::Track),
            ContentView::Albums {
                albums, selected_index, ..
            } => albums.get(*selected_index).cloned().map(SelectedItem::Album),
            ContentView::Artists {
                artists, selected_index, ..
            } => artists.get(*selected_index).cloned().map(SelectedItem::Artist),
            ContentView::Queue { selected_index } => self
                .session
                .queue()
                .get(*selected_index)
                .cloned()
                .map(|track| SelectedItem::QueueEntry {
                    index: *selected_index,
                    track,
                }),
        }
    }

    /// The visible track list and the selected position, for "play from here".
    pub fn selected_track_list(&self) -> Option<(Vec<Track>, usize)> {
        match &self.content_state.view {
            ContentView::Tracks { tracks, selected_index, .. } if *selected_index < tracks.len() => {
                Some((tracks.clone(), *selected_index))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Playback summary
    // ========================================================================

    pub fn get_playback_info(&self) -> PlaybackInfo {
        let queue = self.session.queue();
        let track = queue.current_track().cloned();
        let is_starred = track
            .as_ref()
            .is_some_and(|t| self.session.favorites().is_starred(&t.id));
        PlaybackInfo {
            track,
            status: self.session.status().clone(),
            loop_mode: self.session.loop_mode(),
            is_starred,
            queue_position: queue.current_index().map(|i| (i + 1, queue.len())),
        }
    }

    pub fn window_title(&self) -> String {
        match self.session.current_track() {
            Some(track) if !track.artist.is_empty() => format!("{} - {}", track.title, track.artist),
            Some(track) => track.title.clone(),
            None => "subsonic-tui".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::track;

    fn songs(prefix: &str, count: usize) -> Vec<Track> {
        (0..count).map(|i| track(&format!("{prefix}{i}"))).collect()
    }

    #[test]
    fn push_and_navigate_back_restore_previous_view() {
        let mut model = AppModel::new();
        model.show_tracks("First".into(), songs("a", 3));
        model.content_move_down();
        model.show_albums("Albums".into(), vec![]);

        assert!(model.navigate_back());
        match &model.content_state.view {
            ContentView::Tracks { title, selected_index, .. } => {
                assert_eq!(title, "First");
                assert_eq!(*selected_index, 1);
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert!(!model.navigate_back());
        assert!(matches!(model.content_state.view, ContentView::Empty));
    }

    #[test]
    fn new_search_drops_history() {
        let mut model = AppModel::new();
        model.show_tracks("Playlist".into(), songs("p", 2));
        model.show_albums("Albums".into(), vec![]);
        model.set_search_results("abc".into(), SearchResults::Songs(songs("s", 3)));
        assert!(model.content_state.navigation_stack.is_empty());
    }

    #[test]
    fn full_search_page_requests_more_near_the_end() {
        let mut model = AppModel::new();
        model.set_search_results("abc".into(), SearchResults::Songs(songs("s", SEARCH_PAGE_SIZE)));
        assert_eq!(model.should_load_more(), None);

        for _ in 0..15 {
            model.content_move_down();
        }
        assert_eq!(model.should_load_more(), Some((SearchKind::Songs, "abc".to_string(), 1)));

        model.set_loading_more(true);
        assert_eq!(model.should_load_more(), None);

        assert!(model.append_search_page(SearchKind::Songs, "abc", 1, SearchResults::Songs(songs("t", 4))));
        assert_eq!(model.content_len(), SEARCH_PAGE_SIZE + 4);
        assert_eq!(model.should_load_more(), None);
    }

    #[test]
    fn stale_search_page_is_not_appended() {
        let mut model = AppModel::new();
        model.set_search_results("new".into(), SearchResults::Songs(songs("s", SEARCH_PAGE_SIZE)));
        assert!(!model.append_search_page(SearchKind::Songs, "old", 1, SearchResults::Songs(songs("t", 4))));
        assert!(!model.append_search_page(SearchKind::Songs, "new", 3, SearchResults::Songs(songs("t", 4))));
        assert_eq!(model.content_len(), SEARCH_PAGE_SIZE);
    }

    #[test]
    fn queue_view_selects_queue_entries() {
        let mut model = AppModel::new();
        model.session.play_list(songs("q", 3), 1);
        model.toggle_queue_view();
        assert_eq!(model.selected_queue_index(), Some(1));

        model.content_move_down();
        model.content_move_down();
        match model.get_selected_content_item() {
            Some(SelectedItem::QueueEntry { index, track }) => {
                assert_eq!(index, 2);
                assert_eq!(track.id, "q2");
            }
            other => panic!("unexpected selection {other:?}"),
        }

        model.toggle_queue_view();
        assert!(!model.is_queue_view_visible());
    }

    #[test]
    fn queue_selection_is_clamped() {
        let mut model = AppModel::new();
        model.session.play_list(songs("q", 2), 0);
        model.toggle_queue_view();
        model.set_queue_selection(9);
        assert_eq!(model.selected_queue_index(), Some(1));
    }

    #[test]
    fn top_and_bottom_follow_the_focused_list() {
        let mut model = AppModel::new();
        model.show_tracks("Songs".to_string(), songs("t", 4));
        model.set_active_section(ActiveSection::MainContent);
        model.move_to_bottom();
        assert!(matches!(model.get_selected_content_item(), Some(SelectedItem::Track(t)) if t.id == "t3"));
        model.move_to_top();
        assert!(matches!(model.get_selected_content_item(), Some(SelectedItem::Track(t)) if t.id == "t0"));

        model.set_active_section(ActiveSection::Library);
        model.move_to_bottom();
        assert_eq!(model.ui_state.library_selected, model.ui_state.library_items.len() - 1);
    }

    #[test]
    fn old_errors_are_cleared() {
        let mut model = AppModel::new();
        model.set_error("boom".into());
        model.auto_clear_old_errors();
        assert!(model.has_error());

        model.ui_state.error_timestamp = Instant::now().checked_sub(Duration::from_secs(6));
        model.auto_clear_old_errors();
        assert!(!model.has_error());
    }

    #[test]
    fn playback_info_reflects_session() {
        let mut model = AppModel::new();
        model.session.play_list(songs("x", 2), 1);
        model.session.favorites_mut().toggle("x1");

        let info = model.get_playback_info();
        assert_eq!(info.display_title(), "Title x1");
        assert!(info.is_starred);
        assert_eq!(info.queue_position, Some((2, 2)));
        assert_eq!(model.window_title(), "Title x1 - Artist x1");
    }
}
