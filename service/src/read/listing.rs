//! [`Listing`]-related read definitions.

use std::collections::BTreeSet;

use crate::domain::Listing;

/// Filtering criteria of a [`Listing`] feed.
///
/// All the set terms must hold for a [`Listing`] to pass. An empty term
/// constrains nothing. Matching folds case on both sides and does nothing
/// else: no trimming, no diacritic stripping, no stemming.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Criteria {
    /// Free-text term, matching as a substring of the title, the city or the
    /// district.
    pub search: Option<String>,

    /// City the [`Listing`] must be located in.
    pub city: Option<String>,

    /// District the [`Listing`] must be located in.
    pub district: Option<String>,
}

impl Criteria {
    /// Indicates whether these [`Criteria`] constrain nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        term(self.search.as_deref()).is_none()
            && term(self.city.as_deref()).is_none()
            && term(self.district.as_deref()).is_none()
    }

    /// Checks whether the given [`Listing`] satisfies these [`Criteria`].
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let title = AsRef::<str>::as_ref(&listing.title).to_lowercase();
        let city = listing
            .city
            .as_ref()
            .map(|c| AsRef::<str>::as_ref(c).to_lowercase())
            .unwrap_or_default();
        let district = listing
            .district
            .as_ref()
            .map(|d| AsRef::<str>::as_ref(d).to_lowercase())
            .unwrap_or_default();

        if let Some(t) = term(self.search.as_deref()) {
            if !title.contains(&t) && !city.contains(&t) && !district.contains(&t)
            {
                return false;
            }
        }
        if let Some(t) = term(self.city.as_deref()) {
            if city != t {
                return false;
            }
        }
        if let Some(t) = term(self.district.as_deref()) {
            if district != t {
                return false;
            }
        }
        true
    }
}

/// Lowercases the given filter term, treating an empty one as unset.
fn term(raw: Option<&str>) -> Option<String> {
    raw.filter(|t| !t.is_empty()).map(str::to_lowercase)
}

/// Distinct city and district values occurring in a [`Listing`] collection,
/// for populating filter dropdowns.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterValues {
    /// Distinct cities, capitalized for display.
    pub cities: Vec<String>,

    /// Distinct districts, capitalized for display.
    pub districts: Vec<String>,
}

impl FilterValues {
    /// Collects [`FilterValues`] from the given [`Listing`]s.
    ///
    /// Values are deduplicated after trimming and lowercasing, so `"Riyadh"`
    /// and `"riyadh "` collapse into one entry. [`Listing`]s missing a field
    /// simply contribute nothing to it.
    #[must_use]
    pub fn collect<'l>(listings: impl IntoIterator<Item = &'l Listing>) -> Self {
        let mut cities = BTreeSet::new();
        let mut districts = BTreeSet::new();
        for listing in listings {
            if let Some(city) =
                listing.city.as_ref().and_then(|c| normalize(c.as_ref()))
            {
                _ = cities.insert(city);
            }
            if let Some(district) =
                listing.district.as_ref().and_then(|d| normalize(d.as_ref()))
            {
                _ = districts.insert(district);
            }
        }
        Self {
            cities: cities.iter().map(|c| capitalize(c)).collect(),
            districts: districts.iter().map(|d| capitalize(d)).collect(),
        }
    }
}

/// Normalizes a filter value: trims it, drops it if nothing remains, and
/// lowercases the rest.
fn normalize(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_lowercase())
}

/// Uppercases the first character of the given `value` for display.
///
/// A no-op for scripts without case, Arabic included.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        listing::{City, District, Id, Title},
        Listing, Variant,
    };

    use super::{Criteria, FilterValues};

    fn listing(
        title: &str,
        city: Option<&str>,
        district: Option<&str>,
    ) -> Listing {
        Listing {
            id: Id::generate(),
            variant: Variant::EquipmentOffer,
            title: Title::new(title).unwrap(),
            city: city.map(|c| City::new(c).unwrap()),
            district: district.map(|d| District::new(d).unwrap()),
            location: None,
            description: None,
            extra_info: None,
            phone: None,
            photo_urls: vec![],
            is_active: true,
            equipment_count: 0,
            equipment: vec![],
            project: None,
            created_at: None,
            owner: None,
        }
    }

    #[test]
    fn empty_criteria_match_everything() {
        let criteria = Criteria {
            search: Some(String::new()),
            city: Some(String::new()),
            district: None,
        };
        assert!(criteria.is_empty());
        assert!(criteria.matches(&listing("anything", None, None)));
    }

    #[test]
    fn search_spans_title_city_and_district() {
        let l = listing("Excavator for rent", Some("Riyadh"), Some("Olaya"));

        for term in ["excav", "RIYADH", "olaya", "rent"] {
            let criteria = Criteria {
                search: Some(term.into()),
                ..Criteria::default()
            };
            assert!(criteria.matches(&l), "term {term:?} should match");
        }

        let criteria = Criteria {
            search: Some("jeddah".into()),
            ..Criteria::default()
        };
        assert!(!criteria.matches(&l));
    }

    #[test]
    fn search_matches_substring_of_arabic_title() {
        let grader = listing("جرافة الكبرى", None, None);
        let excavator = listing("حفارة", None, None);

        let criteria = Criteria {
            search: Some("جرافة".into()),
            ..Criteria::default()
        };
        assert!(criteria.matches(&grader));
        assert!(!criteria.matches(&excavator));
    }

    #[test]
    fn terms_combine_conjunctively() {
        let l = listing("Crane", Some("Riyadh"), Some("Olaya"));

        let criteria = Criteria {
            search: Some("crane".into()),
            city: Some("riyadh".into()),
            district: Some("olaya".into()),
        };
        assert!(criteria.matches(&l));

        let criteria = Criteria {
            search: Some("crane".into()),
            city: Some("jeddah".into()),
            district: None,
        };
        assert!(!criteria.matches(&l));
    }

    #[test]
    fn city_filter_is_equality_not_substring() {
        let l = listing("Crane", Some("Riyadh"), None);

        let criteria = Criteria {
            city: Some("riya".into()),
            ..Criteria::default()
        };
        assert!(!criteria.matches(&l));
    }

    #[test]
    fn missing_field_fails_its_filter() {
        let l = listing("Crane", None, None);

        let criteria = Criteria {
            city: Some("riyadh".into()),
            ..Criteria::default()
        };
        assert!(!criteria.matches(&l));
    }

    #[test]
    fn filter_values_deduplicate_case_and_whitespace() {
        let listings = [
            listing("a", Some("Riyadh"), Some("Olaya")),
            listing("b", Some("riyadh "), Some("olaya")),
            listing("c", Some("RIYADH"), None),
            listing("d", Some("Jeddah"), Some("Al Hamra")),
        ];

        let values = FilterValues::collect(&listings);
        assert_eq!(values.cities, ["Jeddah", "Riyadh"]);
        assert_eq!(values.districts, ["Al hamra", "Olaya"]);
    }

    #[test]
    fn collection_is_idempotent_over_its_own_output() {
        let listings = [
            listing("a", Some(" Dammam"), None),
            listing("b", Some("dammam"), None),
        ];
        let first = FilterValues::collect(&listings);

        let reparsed = [listing("c", Some(first.cities[0].as_str()), None)];
        let second = FilterValues::collect(&reparsed);
        assert_eq!(first.cities, second.cities);
    }

    #[test]
    fn arabic_values_pass_through_unchanged() {
        let listings = [
            listing("a", Some("الرياض"), Some("العليا")),
            listing("b", Some("الرياض "), None),
        ];
        let values = FilterValues::collect(&listings);
        assert_eq!(values.cities, ["الرياض"]);
        assert_eq!(values.districts, ["العليا"]);
    }
}
