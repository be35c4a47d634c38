//! Cache sets: a fixed arena of lines plus FIFO install order.

use super::fifo::SlotRing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheLine {
    pub tag: u64,
    pub valid: bool,
}

/// Where a missed tag was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Install {
    pub slot: usize,
    /// Tag that previously occupied the slot, if the set was full.
    pub evicted: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CacheSet {
    lines: Box<[CacheLine]>,
    fifo: SlotRing,
}

impl CacheSet {
    /// All lines start invalid.
    pub fn new(associativity: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); associativity].into_boxed_slice(),
            fifo: SlotRing::new(associativity),
        }
    }

    /// True if a valid line holds `tag`. Does not touch install order.
    pub fn contains(&self, tag: u64) -> bool {
        self.lines.iter().any(|line| line.valid && line.tag == tag)
    }

    /// Install `tag`, taking the next unused slot or evicting the oldest.
    pub fn install(&mut self, tag: u64) -> Install {
        let slot = if self.fifo.is_full() {
            self.fifo.pop_front()
        } else {
            None
        }
        .unwrap_or(self.fifo.len());

        let line = &mut self.lines[slot];
        let evicted = line.valid.then_some(line.tag);
        *line = CacheLine { tag, valid: true };
        self.fifo.push_back(slot);
        Install { slot, evicted }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Slots from oldest to newest install.
    pub fn install_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.fifo.iter()
    }

    pub fn valid_tags(&self) -> impl Iterator<Item = u64> + '_ {
        self.lines.iter().filter(|l| l.valid).map(|l| l.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_slots_in_order() {
        let mut set = CacheSet::new(3);
        assert_eq!(set.install(7).slot, 0);
        assert_eq!(set.install(8).slot, 1);
        assert_eq!(set.install(9).slot, 2);
        assert!(set.contains(8));
        assert!(!set.contains(10));
    }

    #[test]
    fn test_evicts_oldest_install() {
        let mut set = CacheSet::new(2);
        set.install(1);
        set.install(2);
        let install = set.install(3);
        assert_eq!(install, Install { slot: 0, evicted: Some(1) });
        assert!(!set.contains(1));
        assert_eq!(set.install_order().collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_new_set_is_invalid() {
        let set = CacheSet::new(4);
        assert!(set.lines().iter().all(|l| !l.valid));
        assert!(!set.contains(0));
    }
}
