use crate::classifier::Label;
use crate::detection::TrackId;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Recent raw labels for one track
#[derive(Debug, Clone)]
struct TrackHistory {
    labels: VecDeque<Label>,
    last_seen: u64,
}

/// Bounded per-track label history.
///
/// Every track keeps at most `window` labels, oldest evicted first. Tracks not
/// touched for more than `max_idle_frames` frames are dropped by
/// [`ClassificationHistory::evict_stale`].
#[derive(Debug, Clone)]
pub struct ClassificationHistory {
    tracks: HashMap<TrackId, TrackHistory>,
    window: usize,
    max_idle_frames: u64,
    frame: u64,
}

impl ClassificationHistory {
    /// Create a new empty history; a zero window is treated as one
    pub fn new(window: usize, max_idle_frames: u64) -> Self {
        Self {
            tracks: HashMap::new(),
            window: window.max(1),
            max_idle_frames,
            frame: 0,
        }
    }

    /// Moves the frame clock forward by one
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Appends a label to the track's window, evicting the oldest if full
    pub fn push(&mut self, id: TrackId, label: Label) {
        let frame = self.frame;
        let window = self.window;
        let track = self.tracks.entry(id).or_insert_with(|| TrackHistory {
            labels: VecDeque::with_capacity(window),
            last_seen: frame,
        });
        track.labels.push_back(label);
        if track.labels.len() > window {
            track.labels.pop_front();
        }
        track.last_seen = frame;
    }

    /// Marks a track as seen this frame without adding a label
    pub fn touch(&mut self, id: TrackId) {
        if let Some(track) = self.tracks.get_mut(&id) {
            track.last_seen = self.frame;
        }
    }

    /// Number of labels currently held for a track
    pub fn len_of(&self, id: TrackId) -> usize {
        self.tracks.get(&id).map_or(0, |t| t.labels.len())
    }

    pub fn labels(&self, id: TrackId) -> Option<impl Iterator<Item = &Label>> {
        self.tracks.get(&id).map(|t| t.labels.iter())
    }

    /// Most frequent label in the track's window.
    ///
    /// Ties go to the label whose latest occurrence is the most recent.
    pub fn majority(&self, id: TrackId) -> Option<Label> {
        let track = self.tracks.get(&id)?;
        let mut tally: HashMap<&Label, (usize, usize)> = HashMap::new();
        for (index, label) in track.labels.iter().enumerate() {
            let entry = tally.entry(label).or_insert((0, index));
            entry.0 += 1;
            entry.1 = index;
        }
        tally
            .into_iter()
            .max_by_key(|(_, (count, last))| (*count, *last))
            .map(|(label, _)| label.clone())
    }

    /// Drops tracks idle for more than `max_idle_frames`, returning their ids
    pub fn evict_stale(&mut self) -> Vec<TrackId> {
        let frame = self.frame;
        let max_idle = self.max_idle_frames;
        let stale: Vec<TrackId> = self
            .tracks
            .iter()
            .filter(|(_, t)| frame - t.last_seen > max_idle)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            self.tracks.remove(id);
        }
        if !stale.is_empty() {
            debug!("evicted stale classification history for tracks {:?}", stale);
        }
        stale
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    /// Number of tracks with history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Label {
        Label::team("X")
    }

    fn y() -> Label {
        Label::team("Y")
    }

    #[test]
    fn test_majority_vote() {
        let mut history = ClassificationHistory::new(10, 30);
        for label in [x(), x(), y(), x()] {
            history.push(1, label);
        }
        assert_eq!(history.majority(1), Some(x()));
    }

    #[test]
    fn test_tie_goes_to_most_recent_label() {
        let mut history = ClassificationHistory::new(10, 30);
        history.push(1, x());
        history.push(1, y());
        assert_eq!(history.majority(1), Some(y()));

        history.push(1, y());
        history.push(1, x());
        assert_eq!(history.majority(1), Some(x()));
    }

    #[test]
    fn test_window_is_bounded() {
        let mut history = ClassificationHistory::new(3, 30);
        for label in [x(), x(), x(), y(), y()] {
            history.push(4, label);
        }
        assert_eq!(history.len_of(4), 3);
        assert_eq!(history.labels(4).unwrap().cloned().collect::<Vec<_>>(), vec![x(), y(), y()]);
        assert_eq!(history.majority(4), Some(y()));
    }

    #[test]
    fn test_unknown_track_has_no_majority() {
        let history = ClassificationHistory::new(3, 30);
        assert_eq!(history.majority(99), None);
        assert_eq!(history.len_of(99), 0);
    }

    #[test]
    fn test_evict_stale_tracks() {
        let mut history = ClassificationHistory::new(5, 2);
        history.push(1, x());
        history.push(2, y());

        for _ in 0..2 {
            history.advance_frame();
            history.push(2, y());
        }
        assert!(history.evict_stale().is_empty());

        history.advance_frame();
        history.touch(2);
        assert_eq!(history.evict_stale(), vec![1]);
        assert!(!history.contains(1));
        assert!(history.contains(2));
        assert_eq!(history.len(), 1);
    }
}
