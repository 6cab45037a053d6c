//! [`Listing`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use uuid::Uuid;

use super::{user, Equipment};

/// Classified ad published on the marketplace.
///
/// Both source collections are normalized into this single shape right after
/// decoding, so the per-variant field aliasing of the underlying documents
/// never leaks past the infrastructure layer.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// [`Variant`] of this [`Listing`], derived from the collection it was
    /// read from.
    pub variant: Variant,

    /// [`Title`] of this [`Listing`].
    pub title: Title,

    /// [`City`] this [`Listing`] is located in.
    pub city: Option<City>,

    /// [`District`] this [`Listing`] is located in.
    pub district: Option<District>,

    /// Geographical location of this [`Listing`].
    pub location: Option<GeoPoint>,

    /// [`Description`] of this [`Listing`].
    pub description: Option<Description>,

    /// Additional free-form information.
    pub extra_info: Option<ExtraInfo>,

    /// Contact [`Phone`] of this [`Listing`].
    pub phone: Option<Phone>,

    /// [`PhotoUrl`]s of this [`Listing`].
    pub photo_urls: Vec<PhotoUrl>,

    /// Indicator whether this [`Listing`] is visible on the marketplace.
    pub is_active: bool,

    /// Number of [`Equipment`] child records this [`Listing`] declares.
    ///
    /// Recorded on the parent document; the children themselves live in a
    /// sub-collection and are only loaded by a single-[`Listing`] lookup.
    pub equipment_count: u32,

    /// [`Equipment`] child records of this [`Listing`].
    ///
    /// Empty after a collection scan, populated by a by-ID lookup.
    pub equipment: Vec<Equipment>,

    /// Project-request attributes, present on [`Variant::ProjectRequest`]
    /// only.
    pub project: Option<ProjectDetails>,

    /// [`DateTime`] when this [`Listing`] was created.
    ///
    /// Assigned by the storage layer, so possibly still unresolved right
    /// after creation. Missing values order as the Unix epoch.
    pub created_at: Option<CreationDateTime>,

    /// Weak reference to the [`User`] who published this [`Listing`].
    ///
    /// Resolved lazily by a separate lookup, never embedded.
    ///
    /// [`User`]: super::User
    pub owner: Option<user::Id>,
}

define_kind! {
    #[doc = "Variant of a [`Listing`]."]
    enum Variant {
        #[doc = "Equipment owner offering machinery for rent."]
        EquipmentOffer = 1,

        #[doc = "Contractor requesting machinery for a project."]
        ProjectRequest = 2,
    }
}

impl Variant {
    /// Returns the name of the collection holding [`Listing`]s of this
    /// [`Variant`].
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::EquipmentOffer => "equip_use",
            Self::ProjectRequest => "contractor_use",
        }
    }

    /// Returns the name of the sub-collection holding [`Equipment`] child
    /// records of a [`Listing`] of this [`Variant`].
    #[must_use]
    pub const fn equipment_collection(self) -> &'static str {
        match self {
            Self::EquipmentOffer => "equipment_info",
            Self::ProjectRequest => "contractor_equipment",
        }
    }
}

/// ID of a [`Listing`].
///
/// An opaque document key of the underlying storage.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Id(String);

impl Id {
    /// Generates a new random [`Id`].
    ///
    /// Document keys are pre-generated on the caller side and passed to the
    /// storage on creation, the way document-store SDKs do.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Creates a new [`Id`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `id` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new [`Id`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`Id`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        !id.is_empty() && id.len() <= 128 && !id.contains('/')
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Id`")
    }
}

/// Title of a [`Listing`].
///
/// Limited to 70 characters at creation time. Not re-validated on read, as
/// the storage may hold older, longer titles.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Title(String);

impl Title {
    /// Maximum length of a [`Title`], in characters.
    pub const MAX_LEN: usize = 70;

    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        !title.is_empty() && title.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// City of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        !city.is_empty() && city.len() <= 512
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// District of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct District(String);

impl District {
    /// Creates a new [`District`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `district` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(district: impl Into<String>) -> Self {
        Self(district.into())
    }

    /// Creates a new [`District`] if the given `district` is valid.
    #[must_use]
    pub fn new(district: impl Into<String>) -> Option<Self> {
        let district = district.into();
        Self::check(&district).then_some(Self(district))
    }

    /// Checks whether the given `district` is a valid [`District`].
    fn check(district: impl AsRef<str>) -> bool {
        let district = district.as_ref();
        !district.is_empty() && district.len() <= 512
    }
}

impl FromStr for District {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `District`")
    }
}

/// Geographical point of a [`Listing`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude, in degrees.
    latitude: f64,

    /// Longitude, in degrees.
    longitude: f64,
}

impl GeoPoint {
    /// Creates a new [`GeoPoint`] if the given coordinates are valid.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude))
        .then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude of this [`GeoPoint`], in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude of this [`GeoPoint`], in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Description of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.is_empty() && text.len() <= 5000
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Additional free-form information of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct ExtraInfo(String);

impl ExtraInfo {
    /// Creates a new [`ExtraInfo`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`ExtraInfo`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`ExtraInfo`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.is_empty() && text.len() <= 5000
    }
}

impl FromStr for ExtraInfo {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ExtraInfo`")
    }
}

/// Contact phone of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        !number.is_empty()
            && number.len() <= 32
            && number
                .chars()
                .all(|c| c.is_ascii_digit() || "+-() ".contains(c))
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// URL of a [`Listing`] photo.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct PhotoUrl(String);

impl PhotoUrl {
    /// Creates a new [`PhotoUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        (!url.is_empty() && url.len() <= 2048).then_some(Self(url))
    }
}

impl FromStr for PhotoUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PhotoUrl`")
    }
}

/// Project-request attributes of a [`Listing`].
///
/// Only [`Variant::ProjectRequest`] documents carry these.
#[derive(Clone, Debug, Default)]
pub struct ProjectDetails {
    /// Whether diesel is provided by the contractor.
    pub diesel: Option<String>,

    /// Whether workers are provided by the contractor.
    pub workers: Option<String>,

    /// Area of the project site.
    pub area: Option<String>,
}

impl ProjectDetails {
    /// Indicates whether all the attributes are absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diesel.is_none() && self.workers.is_none() && self.area.is_none()
    }
}

/// Deactivation of a [`Listing`], hiding it from the marketplace.
///
/// The document stays in the store for the owner's records until the
/// retention task purges it.
#[derive(Clone, Debug)]
pub struct Deactivation {
    /// [`Variant`] of the [`Listing`] to deactivate.
    pub variant: Variant,

    /// ID of the [`Listing`] to deactivate.
    pub id: Id,
}

/// [`DateTime`] of a [`Listing`] creation.
pub type CreationDateTime = DateTimeOf<Listing>;

#[cfg(test)]
mod tests {
    use super::{GeoPoint, Title};

    #[test]
    fn title_respects_creation_limit() {
        assert!(Title::new("حفارة للإيجار").is_some());
        assert!(Title::new("a".repeat(70)).is_some());
        assert!(Title::new("a".repeat(71)).is_none());
        assert!(Title::new("").is_none());

        // Limit counts characters, not bytes.
        assert!(Title::new("ج".repeat(70)).is_some());
    }

    #[test]
    fn geo_point_bounds() {
        assert!(GeoPoint::new(24.7136, 46.6753).is_some());
        assert!(GeoPoint::new(-90.0, 180.0).is_some());
        assert!(GeoPoint::new(90.01, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
    }
}
