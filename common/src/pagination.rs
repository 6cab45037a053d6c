//! Abstractions for windowed pagination.

/// Growing prefix of a filtered and sorted list, rendered to a client.
///
/// A [`Window`] never stores the items themselves, only the length of the
/// visible prefix. It's always clamped to the length of the list it's applied
/// to, so extending past the end is a no-op rather than an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// Number of items visible right after a [`reset()`].
    ///
    /// [`reset()`]: Window::reset
    initial: usize,

    /// Number of items every [`extend()`] adds.
    ///
    /// [`extend()`]: Window::extend
    step: usize,

    /// Length of the currently visible prefix.
    visible: usize,

    /// Number of [`extend()`]s performed since the last [`reset()`].
    ///
    /// [`extend()`]: Window::extend
    /// [`reset()`]: Window::reset
    load_more_count: usize,
}

impl Window {
    /// Default number of items visible after a [`reset()`].
    ///
    /// [`reset()`]: Window::reset
    pub const DEFAULT_INITIAL: usize = 20;

    /// Default number of items every [`extend()`] adds.
    ///
    /// [`extend()`]: Window::extend
    pub const DEFAULT_STEP: usize = 20;

    /// Creates a new [`Window`] with the provided sizes, visible prefix being
    /// empty until the first [`reset()`].
    ///
    /// [`reset()`]: Window::reset
    #[must_use]
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            initial,
            step,
            visible: 0,
            load_more_count: 0,
        }
    }

    /// Resets this [`Window`] against a list of the provided length.
    ///
    /// Performed whenever the underlying filtered and sorted list changes its
    /// identity (new fetch, new search term, new filter). An empty list
    /// yields an empty visible prefix.
    pub fn reset(&mut self, available: usize) {
        self.visible = self.initial.min(available);
        self.load_more_count = 0;
    }

    /// Extends the visible prefix by one step, clamped to the provided list
    /// length.
    ///
    /// Counts as an extension even when fully clamped, mirroring a load-more
    /// interaction happening at the very end of the list.
    pub fn extend(&mut self, available: usize) {
        self.visible = (self.visible + self.step).min(available);
        self.load_more_count += 1;
    }

    /// Returns the length of the currently visible prefix.
    #[must_use]
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Returns the number of [`extend()`]s performed since the last
    /// [`reset()`].
    ///
    /// [`extend()`]: Window::extend
    /// [`reset()`]: Window::reset
    #[must_use]
    pub fn load_more_count(&self) -> usize {
        self.load_more_count
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL, Self::DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::Window;

    #[test]
    fn resets_to_initial_size() {
        let mut window = Window::new(20, 20);

        window.reset(45);
        assert_eq!(window.visible(), 20);
        assert_eq!(window.load_more_count(), 0);

        window.reset(7);
        assert_eq!(window.visible(), 7);

        window.reset(0);
        assert_eq!(window.visible(), 0);
    }

    #[test]
    fn extends_and_clamps() {
        let mut window = Window::new(20, 20);
        window.reset(45);

        window.extend(45);
        assert_eq!(window.visible(), 40);
        assert_eq!(window.load_more_count(), 1);

        window.extend(45);
        assert_eq!(window.visible(), 45);
        assert_eq!(window.load_more_count(), 2);

        // Past the end: clamped, not an error.
        window.extend(45);
        assert_eq!(window.visible(), 45);
        assert_eq!(window.load_more_count(), 3);
    }

    #[test]
    fn never_shrinks_until_reset() {
        let mut window = Window::new(20, 20);
        window.reset(100);

        let mut previous = window.visible();
        for _ in 0..10 {
            window.extend(100);
            assert!(window.visible() >= previous);
            previous = window.visible();
        }

        window.reset(100);
        assert_eq!(window.visible(), 20);
        assert_eq!(window.load_more_count(), 0);
    }
}
