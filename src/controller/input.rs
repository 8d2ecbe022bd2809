//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{AppController, AppEvent, UserCommand};
use crate::model::ActiveSection;

/// Keys that mean the same thing in every section except the search box.
pub(crate) fn command_for_key(key: &KeyEvent) -> Option<UserCommand> {
    let command = match key.code {
        KeyCode::Char('p') | KeyCode::Char(' ') => UserCommand::TogglePause,
        KeyCode::Char('n') => UserCommand::NextTrack,
        KeyCode::Char('b') => UserCommand::PreviousTrack,
        KeyCode::Char('N') => UserCommand::InsertNext,
        KeyCode::Char('a') => UserCommand::Append,
        KeyCode::Char('w') => UserCommand::RestartTrack,
        KeyCode::Char(',') => UserCommand::SeekBackward,
        KeyCode::Char(';') => UserCommand::SeekForward,
        KeyCode::Char('+') | KeyCode::Char('=') => UserCommand::VolumeUp,
        KeyCode::Char('-') => UserCommand::VolumeDown,
        KeyCode::Char('S') => UserCommand::ShuffleQueue,
        KeyCode::Char('L') => UserCommand::CycleLoopMode,
        KeyCode::Char('f') => UserCommand::ToggleFavorite,
        KeyCode::Char('F') => UserCommand::ShowFavorites,
        KeyCode::Char('Q') => UserCommand::ToggleQueueView,
        KeyCode::Char('A') => UserCommand::JumpToAlbum,
        KeyCode::Char('R') => UserCommand::JumpToArtist,
        KeyCode::Char('h') | KeyCode::Char('?') => UserCommand::ShowHelp,
        KeyCode::Char('q') => UserCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Queue editing keys, only meaningful while the queue view is shown.
fn queue_command_for_key(key: &KeyEvent) -> Option<UserCommand> {
    match key.code {
        KeyCode::Char('d') => Some(UserCommand::RemoveFromQueue),
        KeyCode::Char('D') => Some(UserCommand::ClearQueue),
        KeyCode::Char('K') => Some(UserCommand::MoveUp),
        KeyCode::Char('J') => Some(UserCommand::MoveDown),
        _ => None,
    }
}

impl AppController {
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.model.set_should_quit(true);
            return;
        }

        // Handle error message first (blocks all other interactions)
        if self.model.has_error() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error();
            }
            return;
        }

        if self.model.is_help_popup_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                self.model.hide_help_popup();
            }
            return;
        }

        let section = self.model.ui_state.active_section;
        if section != ActiveSection::Search && self.handle_g_chord(&key) {
            return;
        }

        match section {
            ActiveSection::Search => self.handle_search_key(key),
            ActiveSection::MainContent => self.handle_content_key(key),
            ActiveSection::Library | ActiveSection::Playlists => self.handle_global_key(key),
        }
    }

    /// `gg` jumps to the top, `ga`/`gr` to the selected song's album/artist.
    /// Returns whether the key was consumed.
    fn handle_g_chord(&mut self, key: &KeyEvent) -> bool {
        if !self.model.ui_state.pending_g {
            self.model.ui_state.pending_g = key.code == KeyCode::Char('g');
            return self.model.ui_state.pending_g;
        }

        self.model.ui_state.pending_g = false;
        match key.code {
            KeyCode::Char('g') => self.model.move_to_top(),
            KeyCode::Char('a') => self.dispatch(UserCommand::JumpToAlbum),
            KeyCode::Char('r') => self.dispatch(UserCommand::JumpToArtist),
            _ => return false,
        }
        true
    }

    /// Queue a command behind the events already waiting.
    fn dispatch(&self, command: UserCommand) {
        // A closed channel means the app is shutting down.
        let _ = self.events.send(AppEvent::Command(command));
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.model.cycle_search_kind(true),
                KeyCode::Char('b') => self.model.cycle_search_kind(false),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.model.cycle_section_forward(),
            KeyCode::BackTab => self.model.cycle_section_backward(),
            KeyCode::Enter => self.perform_search(),
            KeyCode::Esc => self.model.clear_search(),
            KeyCode::Backspace => self.model.backspace_search(),
            KeyCode::Char(c) => self.model.append_to_search(c),
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.model.content_move_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.model.content_move_down();
                self.load_more_if_needed();
            }
            KeyCode::Char('G') => {
                self.model.move_to_bottom();
                self.load_more_if_needed();
            }
            KeyCode::Enter => self.activate_selected(),
            KeyCode::Backspace | KeyCode::Esc => {
                self.model.navigate_back();
            }
            _ => {
                let queue_command = self
                    .model
                    .is_queue_view_visible()
                    .then(|| queue_command_for_key(&key))
                    .flatten();
                match queue_command {
                    Some(command) => self.dispatch(command),
                    None => self.handle_global_key(key),
                }
            }
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.model.cycle_section_forward(),
            KeyCode::BackTab => self.model.cycle_section_backward(),
            KeyCode::Char('/') => self.model.set_active_section(ActiveSection::Search),
            KeyCode::Up | KeyCode::Char('k') => self.model.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.model.move_selection_down(),
            KeyCode::Char('G') => self.model.move_to_bottom(),
            KeyCode::Enter => match self.model.ui_state.active_section {
                ActiveSection::Library => self.open_selected_album_list(),
                ActiveSection::Playlists => self.open_selected_playlist(),
                _ => {}
            },
            _ => {
                if let Some(command) = command_for_key(&key) {
                    self.dispatch(command);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeCatalog, Harness};
    use super::*;
    use crate::model::SearchKind;
    use crate::model::test_support::track;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn global_keys_map_to_commands() {
        assert_eq!(command_for_key(&press(KeyCode::Char(' '))), Some(UserCommand::TogglePause));
        assert_eq!(command_for_key(&press(KeyCode::Char('N'))), Some(UserCommand::InsertNext));
        assert_eq!(command_for_key(&press(KeyCode::Char(';'))), Some(UserCommand::SeekForward));
        assert_eq!(command_for_key(&press(KeyCode::Char('L'))), Some(UserCommand::CycleLoopMode));
        assert_eq!(command_for_key(&press(KeyCode::Char('x'))), None);
    }

    #[tokio::test]
    async fn typing_in_search_does_not_trigger_commands() {
        let mut harness = Harness::new(FakeCatalog::default());
        for c in "quit".chars() {
            harness.controller.handle_key_event(press(KeyCode::Char(c)));
        }
        assert_eq!(harness.controller.model.ui_state.search_query, "quit");
        assert!(!harness.controller.should_quit());

        harness.controller.handle_key_event(ctrl('n'));
        assert_eq!(harness.controller.model.ui_state.search_kind, SearchKind::Albums);

        harness.controller.handle_key_event(ctrl('c'));
        assert!(harness.controller.should_quit());
    }

    #[tokio::test]
    async fn error_popup_swallows_keys_until_dismissed() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.model.set_active_section(ActiveSection::Library);
        harness.controller.model.set_error("boom".to_string());

        harness.controller.handle_key_event(press(KeyCode::Char('q')));
        assert!(!harness.controller.should_quit());

        harness.controller.handle_key_event(press(KeyCode::Esc));
        harness.controller.handle_key_event(press(KeyCode::Char('q')));
        harness.pump().await;
        assert!(harness.controller.should_quit());
    }

    fn selected_id(harness: &Harness) -> Option<String> {
        harness
            .controller
            .model
            .get_selected_content_item()
            .and_then(|item| item.track().map(|t| t.id.clone()))
    }

    #[tokio::test]
    async fn vim_keys_move_through_the_content_list() {
        let mut harness = Harness::new(FakeCatalog::default());
        let tracks = ["a", "b", "c", "d"].map(track).to_vec();
        harness.controller.model.show_tracks("Songs".to_string(), tracks);
        harness.controller.model.set_active_section(ActiveSection::MainContent);

        harness.controller.handle_key_event(press(KeyCode::Char('j')));
        harness.controller.handle_key_event(press(KeyCode::Char('j')));
        assert_eq!(selected_id(&harness).as_deref(), Some("c"));
        harness.controller.handle_key_event(press(KeyCode::Char('k')));
        assert_eq!(selected_id(&harness).as_deref(), Some("b"));

        harness.controller.handle_key_event(press(KeyCode::Char('G')));
        assert_eq!(selected_id(&harness).as_deref(), Some("d"));

        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        assert!(harness.controller.model.ui_state.pending_g);
        assert_eq!(selected_id(&harness).as_deref(), Some("d"));
        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        assert!(!harness.controller.model.ui_state.pending_g);
        assert_eq!(selected_id(&harness).as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn g_prefix_is_dropped_by_an_unrelated_key() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.model.set_active_section(ActiveSection::Library);

        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        harness.controller.handle_key_event(press(KeyCode::Char('j')));
        assert!(!harness.controller.model.ui_state.pending_g);
        assert_eq!(harness.controller.model.ui_state.library_selected, 1);

        harness.controller.handle_key_event(press(KeyCode::Char('G')));
        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        assert_eq!(harness.controller.model.ui_state.library_selected, 0);
    }

    #[tokio::test]
    async fn g_a_jumps_to_the_album_of_the_selected_song() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.model.show_tracks("Songs".to_string(), vec![track("a")]);
        harness.controller.model.set_active_section(ActiveSection::MainContent);

        harness.controller.handle_key_event(press(KeyCode::Char('g')));
        harness.controller.handle_key_event(press(KeyCode::Char('a')));
        // the command, then the album result
        harness.pump_n(2).await;

        assert!(harness.catalog.calls().contains(&"getAlbum al-a".to_string()));
        assert!(harness.controller.model.session.queue().is_empty());
    }

    #[tokio::test]
    async fn slash_focuses_search_from_the_sidebar() {
        let mut harness = Harness::new(FakeCatalog::default());
        harness.controller.model.set_active_section(ActiveSection::Playlists);
        harness.controller.handle_key_event(press(KeyCode::Char('/')));
        assert_eq!(harness.controller.model.ui_state.active_section, ActiveSection::Search);
    }
}
