//! Bounded ring of line slots in install order.

/// Fixed-capacity FIFO of slot indices.
///
/// Storage is allocated once at the set's associativity and never grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRing {
    slots: Box<[usize]>,
    head: usize,
    len: usize,
}

impl SlotRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Oldest slot, if any.
    pub fn front(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.head])
    }

    /// Append a slot. Returns false if the ring is already full.
    pub fn push_back(&mut self, slot: usize) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = (self.head + self.len) % self.capacity();
        self.slots[tail] = slot;
        self.len += 1;
        true
    }

    pub fn pop_front(&mut self) -> Option<usize> {
        let out = self.front()?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(out)
    }

    /// Slots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.capacity()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut ring = SlotRing::new(2);
        assert!(ring.push_back(0));
        assert!(ring.push_back(1));
        assert!(ring.is_full());
        assert!(!ring.push_back(2));
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_wraps_around() {
        let mut ring = SlotRing::new(3);
        for slot in 0..3 {
            ring.push_back(slot);
        }
        assert_eq!(ring.pop_front(), Some(0));
        ring.push_back(0);
        assert_eq!(ring.pop_front(), Some(1));
        ring.push_back(1);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![2, 0, 1]);
        assert_eq!(ring.front(), Some(2));
    }

    #[test]
    fn test_empty_and_zero_capacity() {
        let mut ring = SlotRing::new(0);
        assert!(ring.is_empty());
        assert!(ring.is_full());
        assert_eq!(ring.pop_front(), None);
        assert!(!ring.push_back(0));
    }
}
