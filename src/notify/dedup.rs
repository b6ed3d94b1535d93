use std::collections::HashSet;

use crate::feed::PlayerId;

use super::format::EventType;

/// Remembers which (game, player, category) moments were already sent in
/// this process. Off unless `scan.dedup_per_category` is set.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<(u64, PlayerId, EventType)>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a key is seen.
    pub fn first_time(&mut self, game_id: u64, player: PlayerId, event: EventType) -> bool {
        self.seen.insert((game_id, player, event))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_insert_is_rejected() {
        let mut d = DedupSet::new();
        assert!(d.first_time(1, 660271, EventType::Homerun));
        assert!(!d.first_time(1, 660271, EventType::Homerun));
        assert!(d.first_time(1, 660271, EventType::Timely));
        assert!(d.first_time(2, 660271, EventType::Homerun));
        assert_eq!(d.len(), 3);
    }
}
