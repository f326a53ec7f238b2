/// Selection index over a fixed, non-empty list of menu items.
///
/// Moving past either end wraps around.
#[derive(Debug, Clone)]
pub struct MenuCursor<T, const N: usize> {
    items: [T; N],
    selected: usize,
}

impl<T, const N: usize> MenuCursor<T, N> {
    const NON_EMPTY: () = assert!(N > 0, "a menu needs at least one item");

    pub fn new(items: [T; N]) -> Self {
        let () = Self::NON_EMPTY;
        Self { items, selected: 0 }
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + N - 1) % N;
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % N;
    }

    pub fn current(&self) -> &T {
        &self.items[self.selected]
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items paired with whether they are the current selection.
    pub fn iter(&self) -> impl Iterator<Item = (&T, bool)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (item, i == self.selected))
    }
}
