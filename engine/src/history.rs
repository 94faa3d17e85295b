use std::collections::VecDeque;

/// Bounded history keeping the most recent items; pushing into a full
/// history evicts the oldest one. Iteration runs oldest to newest.
#[derive(Debug, Clone)]
pub struct History<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_evicts_oldest_first() {
        let mut h = History::new(3);
        assert_eq!(0, h.len());
        assert!(h.is_empty());

        h.push("a");
        h.push("b");
        h.push("c");
        assert_eq!(3, h.len());
        assert_eq!(vec!["a", "b", "c"], h.iter().copied().collect::<Vec<_>>());

        h.push("d");
        assert_eq!(3, h.len());
        assert_eq!(vec!["b", "c", "d"], h.iter().copied().collect::<Vec<_>>());

        h.push("e");
        h.push("f");
        assert_eq!(vec!["d", "e", "f"], h.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn clear_empties_the_history() {
        let mut h = History::new(2);
        h.push(1);
        h.push(2);
        h.clear();
        assert!(h.is_empty());
        h.push(3);
        assert_eq!(vec![3], h.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut h = History::new(0);
        h.push(1);
        assert!(h.is_empty());
    }
}
