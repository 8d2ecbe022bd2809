//! Ordered play queue with a cursor pointing at the current entry

use rand::Rng;
use rand::seq::SliceRandom;

use super::content::Track;

/// The play queue. `current` is `None` when nothing is selected, which also
/// acts as the "before the first entry" position used by loop handling.
#[derive(Clone, Debug, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.current == Some(index)
    }

    pub fn is_at_last(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 == self.tracks.len())
    }

    /// Replace the whole queue and point at `start_index` (clamped).
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.tracks = tracks;
        self.current = if self.tracks.is_empty() {
            None
        } else {
            Some(start_index.min(self.tracks.len() - 1))
        };
    }

    /// Insert right after the current entry. Returns the index the track landed at.
    pub fn insert_next(&mut self, track: Track) -> usize {
        if self.tracks.is_empty() {
            self.tracks.push(track);
            self.current = Some(0);
            return 0;
        }
        let index = self.current.map(|i| i + 1).unwrap_or(0);
        self.tracks.insert(index, track);
        index
    }

    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove a non-current entry. The current entry and out-of-range
    /// indexes are refused with `None`.
    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() || self.is_current(index) {
            return None;
        }
        let removed = self.tracks.remove(index);
        if let Some(current) = self.current {
            let current = if index < current { current - 1 } else { current };
            self.current = if self.tracks.is_empty() {
                None
            } else {
                Some(current.min(self.tracks.len() - 1))
            };
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    /// Swap `index` with the entry above it. The cursor follows the track it was on.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.tracks.len() {
            return false;
        }
        self.swap_entries(index - 1, index);
        true
    }

    /// Swap `index` with the entry below it. The cursor follows the track it was on.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.tracks.len() {
            return false;
        }
        self.swap_entries(index, index + 1);
        true
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.tracks.swap(a, b);
        self.current = match self.current {
            Some(c) if c == a => Some(b),
            Some(c) if c == b => Some(a),
            other => other,
        };
    }

    pub fn shuffle(&mut self) -> bool {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Randomize the order, then put the current entry (if any) first and point at it.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.tracks.len() < 2 {
            return false;
        }

        let mut order: Vec<usize> = (0..self.tracks.len()).collect();
        order.shuffle(rng);

        if let Some(current) = self.current
            && let Some(pos) = order.iter().position(|&i| i == current)
        {
            order.swap(0, pos);
            self.current = Some(0);
        }

        let mut slots: Vec<Option<Track>> =
            std::mem::take(&mut self.tracks).into_iter().map(Some).collect();
        self.tracks = order.iter().filter_map(|&i| slots[i].take()).collect();
        true
    }

    /// Point at `index` if it exists.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.tracks.get(index)
    }

    /// Move the cursor forward, wrapping past the last entry.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.current = Some(next);
        self.tracks.get(next)
    }

    /// Move the cursor backward, wrapping to the last entry.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => self.tracks.len() - 1,
        };
        self.current = Some(prev);
        self.tracks.get(prev)
    }

    /// Step the cursor back by one without loading anything; index 0 becomes `None`.
    pub fn rewind(&mut self) {
        self.current = match self.current {
            Some(i) if i > 0 => Some(i - 1),
            _ => None,
        };
    }

    pub fn reset_cursor(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::track;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn queue_of(ids: &[&str], current: Option<usize>) -> Queue {
        let mut queue = Queue::new();
        queue.set_queue(ids.iter().map(|id| track(id)).collect(), 0);
        queue.current = current;
        queue
    }

    fn ids(queue: &Queue) -> Vec<&str> {
        queue.tracks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn set_queue_clamps_start_index() {
        let mut queue = Queue::new();
        queue.set_queue(vec![track("a"), track("b")], 9);
        assert_eq!(queue.current_index(), Some(1));

        queue.set_queue(vec![], 3);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn insert_next_on_empty_queue_becomes_current() {
        let mut queue = Queue::new();
        assert_eq!(queue.insert_next(track("x")), 0);
        assert_eq!(ids(&queue), vec!["x"]);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn insert_next_lands_after_current() {
        let mut queue = queue_of(&["a", "b", "c"], Some(1));
        assert_eq!(queue.insert_next(track("x")), 2);
        assert_eq!(ids(&queue), vec!["a", "b", "x", "c"]);
        assert_eq!(queue.current_track().map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn repeated_insert_next_always_follows_current() {
        let mut queue = queue_of(&["a", "b", "c"], Some(1));
        for id in ["x", "y", "z"] {
            assert_eq!(queue.insert_next(track(id)), 2);
            assert_eq!(queue.current_index(), Some(1));
            assert_eq!(queue.get(2).map(|t| t.id.as_str()), Some(id));
        }
        assert_eq!(ids(&queue), vec!["a", "b", "z", "y", "x", "c"]);
    }

    #[test]
    fn insert_next_without_cursor_goes_first() {
        let mut queue = queue_of(&["a", "b"], None);
        assert_eq!(queue.insert_next(track("x")), 0);
        assert_eq!(ids(&queue), vec!["x", "a", "b"]);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn append_keeps_cursor() {
        let mut queue = queue_of(&["a"], Some(0));
        queue.append(track("b"));
        assert_eq!(ids(&queue), vec!["a", "b"]);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn remove_before_current_shifts_cursor() {
        let mut queue = queue_of(&["a", "b", "c", "d"], Some(2));
        let removed = queue.remove_at(0).expect("entry removed");
        assert_eq!(removed.id, "a");
        assert_eq!(ids(&queue), vec!["b", "c", "d"]);
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn remove_after_current_keeps_cursor() {
        let mut queue = queue_of(&["a", "b", "c"], Some(0));
        assert!(queue.remove_at(2).is_some());
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn remove_refuses_current_and_out_of_range() {
        let mut queue = queue_of(&["a", "b", "c"], Some(1));
        assert!(queue.remove_at(1).is_none());
        assert!(queue.remove_at(3).is_none());
        assert_eq!(ids(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn remove_without_cursor_leaves_it_unset() {
        let mut queue = queue_of(&["a", "b"], None);
        assert!(queue.remove_at(0).is_some());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn clear_empties_and_resets_cursor() {
        let mut queue = queue_of(&["a", "b"], Some(1));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn move_up_cursor_follows_current_track() {
        let mut queue = queue_of(&["a", "b", "c"], Some(1));
        assert!(queue.move_up(1));
        assert_eq!(ids(&queue), vec!["b", "a", "c"]);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn move_up_over_current_pushes_cursor_down() {
        let mut queue = queue_of(&["a", "b", "c"], Some(1));
        assert!(queue.move_up(2));
        assert_eq!(ids(&queue), vec!["a", "c", "b"]);
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn move_down_cursor_follows_current_track() {
        let mut queue = queue_of(&["a", "b", "c"], Some(0));
        assert!(queue.move_down(0));
        assert_eq!(ids(&queue), vec!["b", "a", "c"]);
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn moves_refuse_at_boundaries() {
        let mut queue = queue_of(&["a", "b"], Some(0));
        assert!(!queue.move_up(0));
        assert!(!queue.move_down(1));
        assert!(!queue.move_down(5));
        assert_eq!(ids(&queue), vec!["a", "b"]);
    }

    #[test]
    fn shuffle_puts_current_first() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut queue = queue_of(&["a", "b", "c", "d", "e"], Some(3));
            assert!(queue.shuffle_with(&mut rng));

            assert_eq!(queue.current_index(), Some(0));
            assert_eq!(queue.tracks()[0].id, "d");

            let mut sorted = ids(&queue);
            sorted.sort();
            assert_eq!(sorted, vec!["a", "b", "c", "d", "e"]);
        }
    }

    #[test]
    fn shuffle_is_noop_for_short_queues() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut queue = queue_of(&["a"], Some(0));
        assert!(!queue.shuffle_with(&mut rng));
        assert_eq!(ids(&queue), vec!["a"]);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn shuffle_without_cursor_keeps_it_unset() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut queue = queue_of(&["a", "b", "c"], None);
        assert!(queue.shuffle_with(&mut rng));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn advance_and_retreat_wrap() {
        let mut queue = queue_of(&["a", "b", "c"], Some(2));
        assert_eq!(queue.advance().map(|t| t.id.clone()), Some("a".to_string()));
        assert_eq!(queue.retreat().map(|t| t.id.clone()), Some("c".to_string()));

        queue.reset_cursor();
        assert_eq!(queue.advance().map(|t| t.id.clone()), Some("a".to_string()));
    }

    #[test]
    fn rewind_from_first_entry_unsets_cursor() {
        let mut queue = queue_of(&["a", "b"], Some(1));
        queue.rewind();
        assert_eq!(queue.current_index(), Some(0));
        queue.rewind();
        assert_eq!(queue.current_index(), None);
    }
}
