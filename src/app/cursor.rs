//! Bidirectional cursor over a fixed sequence that wraps at both ends.
//!
//! The details view pages through the list with this cursor; when it closes,
//! the screen compares the cursor's index with the selection it started from.

/// A cursor over a fixed sequence that can move both ways and wraps around.
///
/// # Example
///
/// ```rust
/// use reclist::app::CyclingBidiIterator;
///
/// let mut cursor = CyclingBidiIterator::new(vec!['a', 'b', 'c'], 2);
/// assert_eq!(cursor.next(), Some(&'a'));
/// assert_eq!(cursor.previous(), Some(&'c'));
/// assert_eq!(cursor.index(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CyclingBidiIterator<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> CyclingBidiIterator<T> {
    /// Creates a cursor positioned at `index`, clamped to the last item.
    #[must_use]
    pub fn new(items: Vec<T>, index: usize) -> Self {
        let index = index.min(items.len().saturating_sub(1));
        Self { items, index }
    }

    /// Returns the item under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Advances to the next item, wrapping to the first after the last.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.items.len();
        self.current()
    }

    /// Steps back to the previous item, wrapping to the last before the first.
    pub fn previous(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.index = if self.index == 0 {
            self.items.len() - 1
        } else {
            self.index - 1
        };
        self.current()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there is nothing to iterate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_forward_and_backward() {
        let mut cursor = CyclingBidiIterator::new(vec![1, 2, 3], 0);
        assert_eq!(cursor.previous(), Some(&3));
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.next(), Some(&2));
    }

    #[test]
    fn out_of_range_start_is_clamped() {
        let cursor = CyclingBidiIterator::new(vec!["a", "b"], 9);
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.current(), Some(&"b"));
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        let mut cursor: CyclingBidiIterator<u8> = CyclingBidiIterator::new(vec![], 3);
        assert!(cursor.is_empty());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.previous(), None);
        assert_eq!(cursor.index(), 0);
    }
}
