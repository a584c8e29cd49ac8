use std::slice;

/// A last-in-first-out sequence that pops several items at once.
///
/// Iteration runs oldest first. Popping never fails: asking for more items than the stack holds
/// returns what there is.
///
/// ```rust
/// # use waypoint_router::Stack;
/// let mut stack = Stack::new();
/// stack.push(["a", "b", "c"]);
///
/// assert_eq!(stack.pop(2), vec!["c", "b"]);
/// assert_eq!(stack.pop(5), vec!["a"]);
/// assert!(stack.pop(1).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Stack<T> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `items` to the tail, in iteration order.
    pub fn push(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Remove up to `count` items from the tail, most recently pushed first.
    pub fn pop(&mut self, count: usize) -> Vec<T> {
        let keep = self.items.len().saturating_sub(count);
        let mut popped = self.items.split_off(keep);
        popped.reverse();
        popped
    }

    /// The item at `index`, counting from the oldest.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// The most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.items.last()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Clone> Stack<T> {
    /// A copy of the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_call_order() {
        let mut stack = Stack::new();
        stack.push([1, 2]);
        stack.push([3]);
        assert_eq!(stack.to_vec(), vec![1, 2, 3]);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(stack.latest(), Some(&3));
        assert_eq!(stack.get(0), Some(&1));
        assert_eq!(stack.get(3), None);
    }

    #[test]
    fn pop_is_bounded() {
        let mut stack: Stack<i32> = (1..=3).collect();
        assert_eq!(stack.pop(0), Vec::<i32>::new());
        assert_eq!(stack.pop(2), vec![3, 2]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop(usize::MAX), vec![1]);
        assert!(stack.is_empty());
        assert_eq!(stack.latest(), None);
    }

    #[test]
    fn popped_items_push_back_in_reverse() {
        let mut history: Stack<&str> = ["/a", "/b", "/c"].into_iter().collect();
        let mut redo = Stack::new();

        redo.push(history.pop(2));
        assert_eq!(redo.to_vec(), vec!["/c", "/b"]);

        history.push(redo.pop(1));
        assert_eq!(history.to_vec(), vec!["/a", "/b"]);
        assert_eq!(redo.to_vec(), vec!["/c"]);
    }

    #[test]
    fn copies_do_not_alias() {
        let mut stack: Stack<String> = ["x".to_string()].into_iter().collect();
        let mut copy = stack.to_vec();
        copy.push("y".to_string());
        stack.clear();
        assert_eq!(copy.len(), 2);
        assert!(stack.is_empty());
    }
}
