//! [`Listing`] feed aggregation.

use common::Window;

use crate::{
    domain::{listing::CreationDateTime, Listing, Variant},
    read::Criteria,
};

/// Sorts the given [`Listing`]s by recency, newest first.
///
/// [`Listing`]s without a creation time order as the Unix epoch, landing at
/// the end. Ties keep their relative order, so re-sorting an already-sorted
/// list is a no-op.
pub fn sort_by_recency(listings: &mut [Listing]) {
    listings.sort_by_key(|l| {
        std::cmp::Reverse(l.created_at.unwrap_or(CreationDateTime::UNIX_EPOCH))
    });
}

/// Token tying a fetch completion to the [`Feed`] state that started it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Generation(u64);

/// Feed of [`Listing`]s of a single [`Variant`].
///
/// Holds the canonical fetched list and derives the visible page from it:
/// sort, filter, sort again, then cut the [`Window`] prefix. Fetches are
/// guarded by a [`Generation`] counter, so a response arriving after the
/// [`Variant`] switched is dropped instead of clobbering the newer state.
#[derive(Debug)]
pub struct Feed {
    /// [`Variant`] the feed is currently showing.
    variant: Variant,

    /// [`Criteria`] the canonical list is filtered by.
    criteria: Criteria,

    /// Canonical fetched list, sorted by recency.
    all: Vec<Listing>,

    /// [`Criteria`]-filtered projection of the canonical list.
    filtered: Vec<Listing>,

    /// [`Window`] cutting the visible prefix of the filtered list.
    window: Window,

    /// [`Generation`] of the most recent fetch.
    generation: u64,

    /// Indicator whether a fetch is in flight.
    fetching: bool,

    /// Indicator whether an auto-extension is still settling.
    extending: bool,
}

impl Feed {
    /// Number of manual extensions after which scrolling near the bottom
    /// starts extending the feed automatically.
    pub const AUTO_EXTEND_THRESHOLD: usize = 2;

    /// Creates a new empty [`Feed`] of the given [`Variant`].
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            criteria: Criteria::default(),
            all: vec![],
            filtered: vec![],
            window: Window::default(),
            generation: 0,
            fetching: false,
            extending: false,
        }
    }

    /// Returns the [`Variant`] this [`Feed`] is showing.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the [`Criteria`] this [`Feed`] is filtered by.
    #[must_use]
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Indicates whether a fetch is in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Starts a fetch for the given [`Variant`], invalidating any fetch
    /// still in flight.
    ///
    /// The returned [`Generation`] must be handed back to
    /// [`Feed::apply_fetched()`] along with the fetched [`Listing`]s.
    pub fn begin_fetch(&mut self, variant: Variant) -> Generation {
        self.variant = variant;
        self.generation += 1;
        self.fetching = true;
        Generation(self.generation)
    }

    /// Applies the result of a fetch started by [`Feed::begin_fetch()`].
    ///
    /// Returns `false` if the `generation` is stale, leaving the state
    /// untouched.
    pub fn apply_fetched(
        &mut self,
        generation: Generation,
        listings: Vec<Listing>,
    ) -> bool {
        if generation.0 != self.generation {
            return false;
        }
        self.fetching = false;
        self.all = listings;
        sort_by_recency(&mut self.all);
        self.refilter();
        true
    }

    /// Replaces the [`Criteria`], re-deriving the visible list and resetting
    /// the [`Window`].
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// Extends the visible prefix by one [`Window`] step.
    pub fn load_more(&mut self) {
        self.window.extend(self.filtered.len());
    }

    /// Reacts to the viewport nearing the bottom of the visible list.
    ///
    /// Extends the prefix only once enough manual extensions happened and
    /// neither a fetch nor a previous auto-extension is still in flight.
    /// Returns whether an extension took place; when it does,
    /// [`Feed::settle_extension()`] re-arms the guard.
    pub fn near_bottom(&mut self) -> bool {
        if self.window.load_more_count() < Self::AUTO_EXTEND_THRESHOLD
            || self.fetching
            || self.extending
        {
            return false;
        }
        self.extending = true;
        self.window.extend(self.filtered.len());
        true
    }

    /// Marks the auto-extension started by [`Feed::near_bottom()`] as
    /// settled.
    pub fn settle_extension(&mut self) {
        self.extending = false;
    }

    /// Returns the visible prefix of this [`Feed`].
    #[must_use]
    pub fn visible(&self) -> &[Listing] {
        &self.filtered[..self.window.visible()]
    }

    /// Total number of [`Listing`]s passing the current [`Criteria`].
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Re-derives the filtered list from the canonical one and resets the
    /// [`Window`] onto it.
    ///
    /// Empty [`Criteria`] short-circuit to the canonical list, which is
    /// already sorted.
    fn refilter(&mut self) {
        self.filtered = if self.criteria.is_empty() {
            self.all.clone()
        } else {
            let mut filtered: Vec<_> = self
                .all
                .iter()
                .filter(|l| self.criteria.matches(l))
                .cloned()
                .collect();
            sort_by_recency(&mut filtered);
            filtered
        };
        self.window.reset(self.filtered.len());
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            listing::{City, CreationDateTime, Id, Title},
            Listing, Variant,
        },
        read::Criteria,
    };

    use super::{sort_by_recency, Feed};

    fn listing(
        title: &str,
        city: Option<&str>,
        created_at: Option<i64>,
    ) -> Listing {
        Listing {
            id: Id::generate(),
            variant: Variant::EquipmentOffer,
            title: Title::new(title).unwrap(),
            city: city.map(|c| City::new(c).unwrap()),
            district: None,
            location: None,
            description: None,
            extra_info: None,
            phone: None,
            photo_urls: vec![],
            is_active: true,
            equipment_count: 0,
            equipment: vec![],
            project: None,
            created_at: created_at
                .map(|ts| CreationDateTime::from_unix_timestamp(ts).unwrap()),
            owner: None,
        }
    }

    fn titles(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.title.as_ref()).collect()
    }

    #[test]
    fn sorts_newest_first_with_timestampless_last() {
        let mut listings = vec![
            listing("old", None, Some(100)),
            listing("no-date-1", None, None),
            listing("new", None, Some(300)),
            listing("no-date-2", None, None),
            listing("mid", None, Some(200)),
        ];
        sort_by_recency(&mut listings);
        assert_eq!(
            titles(&listings),
            ["new", "mid", "old", "no-date-1", "no-date-2"],
        );
    }

    #[test]
    fn sorting_twice_keeps_tie_order() {
        let mut listings = vec![
            listing("tie-a", None, Some(100)),
            listing("tie-b", None, Some(100)),
            listing("tie-c", None, Some(100)),
        ];
        sort_by_recency(&mut listings);
        sort_by_recency(&mut listings);
        assert_eq!(titles(&listings), ["tie-a", "tie-b", "tie-c"]);
    }

    #[test]
    fn window_grows_in_steps_and_clamps() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        let fetched =
            (0..45).map(|i| listing(&format!("l{i}"), None, Some(i))).collect();
        assert!(feed.apply_fetched(generation, fetched));

        assert_eq!(feed.visible().len(), 20);
        feed.load_more();
        assert_eq!(feed.visible().len(), 40);
        feed.load_more();
        assert_eq!(feed.visible().len(), 45);
        feed.load_more();
        assert_eq!(feed.visible().len(), 45);
    }

    #[test]
    fn criteria_change_resets_window() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        let fetched = (0..60)
            .map(|i| {
                let city = if i % 2 == 0 { "Riyadh" } else { "Jeddah" };
                listing(&format!("l{i}"), Some(city), Some(i))
            })
            .collect();
        assert!(feed.apply_fetched(generation, fetched));

        feed.load_more();
        assert_eq!(feed.visible().len(), 40);

        feed.set_criteria(Criteria {
            city: Some("riyadh".into()),
            ..Criteria::default()
        });
        assert_eq!(feed.filtered_len(), 30);
        assert_eq!(feed.visible().len(), 20);
        assert!(feed.visible().iter().all(|l| {
            l.city.as_ref().is_some_and(|c| AsRef::<str>::as_ref(c) == "Riyadh")
        }));
    }

    #[test]
    fn clearing_criteria_restores_the_canonical_list() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        let fetched = (0..30)
            .map(|i| {
                let city = if i % 3 == 0 { "Riyadh" } else { "Jeddah" };
                listing(&format!("l{i}"), Some(city), Some(i))
            })
            .collect();
        assert!(feed.apply_fetched(generation, fetched));

        feed.set_criteria(Criteria {
            city: Some("Riyadh".into()),
            ..Criteria::default()
        });
        assert_eq!(feed.filtered_len(), 10);

        feed.set_criteria(Criteria::default());
        assert_eq!(feed.filtered_len(), 30);
        assert_eq!(feed.visible().len(), 20);
        assert_eq!(
            feed.visible().first().map(|l| l.title.as_ref()),
            Some("l29"),
        );
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let stale = feed.begin_fetch(Variant::EquipmentOffer);
        let fresh = feed.begin_fetch(Variant::ProjectRequest);

        assert!(feed.apply_fetched(
            fresh,
            vec![listing("kept", None, Some(1))],
        ));
        assert!(!feed.apply_fetched(
            stale,
            vec![listing("dropped", None, Some(2))],
        ));

        assert_eq!(titles(feed.visible()), ["kept"]);
        assert_eq!(feed.variant(), Variant::ProjectRequest);
    }

    #[test]
    fn auto_extension_requires_threshold_and_settling() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        let fetched =
            (0..100).map(|i| listing(&format!("l{i}"), None, Some(i))).collect();
        assert!(feed.apply_fetched(generation, fetched));

        // Below the threshold scrolling does nothing.
        assert!(!feed.near_bottom());
        assert_eq!(feed.visible().len(), 20);

        feed.load_more();
        feed.load_more();

        assert!(feed.near_bottom());
        assert_eq!(feed.visible().len(), 80);

        // Guarded until the previous extension settles.
        assert!(!feed.near_bottom());
        assert_eq!(feed.visible().len(), 80);

        feed.settle_extension();
        assert!(feed.near_bottom());
        assert_eq!(feed.visible().len(), 100);
    }

    #[test]
    fn refetch_resets_criteria_projection() {
        let mut feed = Feed::new(Variant::EquipmentOffer);
        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        assert!(feed.apply_fetched(
            generation,
            vec![
                listing("crane", Some("Riyadh"), Some(2)),
                listing("loader", Some("Jeddah"), Some(1)),
            ],
        ));

        feed.set_criteria(Criteria {
            search: Some("crane".into()),
            ..Criteria::default()
        });
        assert_eq!(titles(feed.visible()), ["crane"]);

        let generation = feed.begin_fetch(Variant::EquipmentOffer);
        assert!(feed.apply_fetched(
            generation,
            vec![
                listing("crane", Some("Riyadh"), Some(2)),
                listing("another crane", Some("Dammam"), Some(3)),
            ],
        ));
        assert_eq!(titles(feed.visible()), ["another crane", "crane"]);
    }
}
