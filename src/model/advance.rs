//! End-of-track detection and loop-mode resolution

use super::playback::PlaybackStatus;
use super::queue::Queue;
use super::types::LoopMode;

/// What the session should do once a track has ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceDecision {
    /// Run the regular play-next step from the (possibly adjusted) cursor.
    PlayNext,
    /// End of the queue without looping; leave the player idle.
    Stop,
}

/// Whether `status` means the loaded track is over.
///
/// Either the position reached the end of a known duration, or the player went
/// idle while the queue still has something after the cursor. The idle case only
/// counts once a track has been loaded this session. Nothing ends while paused.
pub fn track_ended(status: &PlaybackStatus, queue: &Queue, has_loaded: bool) -> bool {
    if status.paused {
        return false;
    }
    if status.reached_end() {
        return true;
    }
    has_loaded && status.is_idle() && has_entry_after_cursor(queue)
}

fn has_entry_after_cursor(queue: &Queue) -> bool {
    match queue.current_index() {
        Some(i) => i + 1 < queue.len(),
        None => !queue.is_empty(),
    }
}

/// Adjust the cursor for `loop_mode` so that the following play-next step lands
/// on the right entry.
pub fn resolve_next(queue: &mut Queue, loop_mode: LoopMode) -> AdvanceDecision {
    match loop_mode {
        LoopMode::One => {
            queue.rewind();
            AdvanceDecision::PlayNext
        }
        LoopMode::All => {
            if queue.is_at_last() {
                queue.reset_cursor();
            }
            AdvanceDecision::PlayNext
        }
        LoopMode::None => {
            if queue.is_at_last() {
                AdvanceDecision::Stop
            } else {
                AdvanceDecision::PlayNext
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::track;

    fn queue_at(len: usize, current: usize) -> Queue {
        let mut queue = Queue::new();
        let tracks = (0..len).map(|i| track(&format!("t{i}"))).collect();
        queue.set_queue(tracks, current);
        queue
    }

    fn at_end(paused: bool) -> PlaybackStatus {
        PlaybackStatus {
            title: "Song".to_string(),
            position_secs: 199.8,
            duration_secs: 200.0,
            paused,
            ..Default::default()
        }
    }

    #[test]
    fn end_position_triggers_when_playing() {
        let queue = queue_at(2, 0);
        assert!(track_ended(&at_end(false), &queue, true));
    }

    #[test]
    fn paused_at_boundary_never_triggers() {
        let queue = queue_at(2, 0);
        assert!(!track_ended(&at_end(true), &queue, true));

        let mut idle = PlaybackStatus::idle();
        idle.paused = true;
        assert!(!track_ended(&idle, &queue, true));
    }

    #[test]
    fn idle_player_triggers_only_with_a_following_entry() {
        let idle = PlaybackStatus::idle();
        assert!(track_ended(&idle, &queue_at(3, 1), true));
        assert!(!track_ended(&idle, &queue_at(3, 2), true));
    }

    #[test]
    fn idle_player_before_first_load_is_ignored() {
        assert!(!track_ended(&PlaybackStatus::idle(), &queue_at(3, 0), false));
    }

    #[test]
    fn empty_title_is_not_the_idle_sentinel() {
        let status = PlaybackStatus::default();
        assert!(!track_ended(&status, &queue_at(3, 0), true));
    }

    #[test]
    fn loop_one_replays_the_same_track() {
        let mut queue = queue_at(2, 1);
        assert_eq!(resolve_next(&mut queue, LoopMode::One), AdvanceDecision::PlayNext);
        assert_eq!(queue.current_index(), Some(0));

        let next = queue.advance().map(|t| t.id.clone());
        assert_eq!(next.as_deref(), Some("t1"));
    }

    #[test]
    fn loop_one_on_first_entry_replays_it() {
        let mut queue = queue_at(2, 0);
        resolve_next(&mut queue, LoopMode::One);
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.advance().map(|t| t.id.clone()).as_deref(), Some("t0"));
    }

    #[test]
    fn loop_all_at_last_entry_wraps_to_first() {
        let mut queue = queue_at(2, 1);
        assert_eq!(resolve_next(&mut queue, LoopMode::All), AdvanceDecision::PlayNext);
        assert_eq!(queue.current_index(), None);
        assert_eq!(queue.advance().map(|t| t.id.clone()).as_deref(), Some("t0"));
    }

    #[test]
    fn loop_all_mid_queue_moves_on() {
        let mut queue = queue_at(3, 0);
        resolve_next(&mut queue, LoopMode::All);
        assert_eq!(queue.advance().map(|t| t.id.clone()).as_deref(), Some("t1"));
    }

    #[test]
    fn no_loop_stops_at_the_last_entry() {
        let mut queue = queue_at(2, 1);
        assert_eq!(resolve_next(&mut queue, LoopMode::None), AdvanceDecision::Stop);
        assert_eq!(queue.current_index(), Some(1));

        let mut queue = queue_at(2, 0);
        assert_eq!(resolve_next(&mut queue, LoopMode::None), AdvanceDecision::PlayNext);
    }
}
