//! [`Listing`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, read};

use crate::{
    api::{self, scalar},
    Context,
};

/// A classified ad published on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Listing(domain::Listing);

/// A classified ad published on the marketplace.
#[graphql_object(context = Context)]
impl Listing {
    /// Unique identifier of this `Listing`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.clone().into()
    }

    /// Variant of this `Listing`.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.0.variant.into()
    }

    /// Title of this `Listing`.
    #[must_use]
    pub fn title(&self) -> Title {
        self.0.title.clone().into()
    }

    /// City this `Listing` is located in.
    #[must_use]
    pub fn city(&self) -> Option<City> {
        self.0.city.clone().map(Into::into)
    }

    /// District this `Listing` is located in.
    #[must_use]
    pub fn district(&self) -> Option<District> {
        self.0.district.clone().map(Into::into)
    }

    /// Geographical location of this `Listing`.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        self.0.location.map(Into::into)
    }

    /// Description of this `Listing`.
    #[must_use]
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }

    /// Additional free-form information of this `Listing`.
    #[must_use]
    pub fn extra_info(&self) -> Option<ExtraInfo> {
        self.0.extra_info.clone().map(Into::into)
    }

    /// Contact phone of this `Listing`.
    #[must_use]
    pub fn phone(&self) -> Option<Phone> {
        self.0.phone.clone().map(Into::into)
    }

    /// URLs of this `Listing`'s photos.
    #[must_use]
    pub fn photo_urls(&self) -> Vec<PhotoUrl> {
        self.0.photo_urls.iter().cloned().map(Into::into).collect()
    }

    /// Indicator whether this `Listing` is visible on the marketplace.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// Number of `Equipment` line items this `Listing` declares.
    #[must_use]
    pub fn equipment_count(&self) -> i32 {
        self.0.equipment_count.try_into().unwrap_or(i32::MAX)
    }

    /// `Equipment` line items of this `Listing`.
    ///
    /// Empty on feed pages; populated when a single `Listing` is queried.
    #[must_use]
    pub fn equipment(&self) -> Vec<Equipment> {
        self.0.equipment.iter().cloned().map(Into::into).collect()
    }

    /// Project attributes of this `Listing`, present on `PROJECT_REQUEST`s
    /// only.
    #[must_use]
    pub fn project(&self) -> Option<ProjectDetails> {
        self.0.project.clone().map(Into::into)
    }

    /// `DateTime` when this `Listing` was created.
    ///
    /// May be absent right after creation, until the store resolves it.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime> {
        self.0.created_at.map(common::DateTimeOf::coerce)
    }

    /// `User` who published this `Listing`.
    #[must_use]
    pub fn owner(&self) -> Option<api::User> {
        self.0.owner.clone().map(|id| {
            #[expect(
                unsafe_code,
                reason = "listings reference existing owners"
            )]
            unsafe {
                api::User::new_unchecked(id)
            }
        })
    }
}

/// Variant of a `Listing`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ListingVariant")]
pub enum Variant {
    /// Equipment owner offering machinery for rent.
    EquipmentOffer,

    /// Contractor requesting machinery for a project.
    ProjectRequest,
}

impl From<Variant> for domain::Variant {
    fn from(value: Variant) -> Self {
        match value {
            Variant::EquipmentOffer => Self::EquipmentOffer,
            Variant::ProjectRequest => Self::ProjectRequest,
        }
    }
}

impl From<domain::Variant> for Variant {
    fn from(value: domain::Variant) -> Self {
        match value {
            domain::Variant::EquipmentOffer => Self::EquipmentOffer,
            domain::Variant::ProjectRequest => Self::ProjectRequest,
        }
    }
}

/// Unique identifier of a `Listing`.
#[derive(
    AsRef, Clone, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[graphql(
    name = "ListingId",
    with = scalar::Through::<domain::listing::Id>,
)]
pub struct Id(domain::listing::Id);

/// Title of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingTitle",
    with = scalar::Through::<domain::listing::Title>,
)]
pub struct Title(domain::listing::Title);

/// City of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingCity",
    with = scalar::Through::<domain::listing::City>,
)]
pub struct City(domain::listing::City);

/// District of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingDistrict",
    with = scalar::Through::<domain::listing::District>,
)]
pub struct District(domain::listing::District);

/// Description of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingDescription",
    with = scalar::Through::<domain::listing::Description>,
)]
pub struct Description(domain::listing::Description);

/// Additional free-form information of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingExtraInfo",
    with = scalar::Through::<domain::listing::ExtraInfo>,
)]
pub struct ExtraInfo(domain::listing::ExtraInfo);

/// Contact phone of a `Listing`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingPhone",
    with = scalar::Through::<domain::listing::Phone>,
)]
pub struct Phone(domain::listing::Phone);

/// URL of a `Listing` photo.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ListingPhotoUrl",
    with = scalar::Through::<domain::listing::PhotoUrl>,
)]
pub struct PhotoUrl(domain::listing::PhotoUrl);

/// Geographical point of a `Listing`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "ListingGeoPoint")]
pub struct GeoPoint {
    /// Latitude, in degrees.
    pub latitude: f64,

    /// Longitude, in degrees.
    pub longitude: f64,
}

impl From<domain::listing::GeoPoint> for GeoPoint {
    fn from(value: domain::listing::GeoPoint) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

/// Geographical point of a `Listing`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "ListingGeoPointInput")]
pub struct GeoPointInput {
    /// Latitude, in degrees.
    pub latitude: f64,

    /// Longitude, in degrees.
    pub longitude: f64,
}

/// Single machinery line item of a `Listing`.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Equipment {
    /// Kind of this `Equipment` (excavator, loader, etc.).
    pub kind: EquipmentKind,

    /// Model of this `Equipment`.
    pub model: EquipmentModel,

    /// Manufacturing year of this `Equipment`, if specified.
    pub year: Option<i32>,

    /// Spans this `Equipment` may be rented for.
    pub rent_spans: Vec<RentSpan>,
}

impl From<domain::Equipment> for Equipment {
    fn from(value: domain::Equipment) -> Self {
        Self {
            kind: value.kind.clone().into(),
            model: value.model.clone().into(),
            year: value.year.map(|y| i32::from(u16::from(y))),
            rent_spans: value
                .terms
                .spans()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Single machinery line item of a `Listing`.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct EquipmentInput {
    /// Kind of the `Equipment` (excavator, loader, etc.).
    pub kind: EquipmentKind,

    /// Model of the `Equipment`.
    pub model: EquipmentModel,

    /// Manufacturing year of the `Equipment`.
    pub year: Option<i32>,

    /// Spans the `Equipment` may be rented for.
    ///
    /// At least one is required; a `PROJECT_REQUEST` uses the first one only.
    pub rent_spans: Vec<RentSpan>,
}

/// Kind of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentKind",
    with = scalar::Through::<domain::equipment::Kind>,
)]
pub struct EquipmentKind(domain::equipment::Kind);

/// Model of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentModel",
    with = scalar::Through::<domain::equipment::Model>,
)]
pub struct EquipmentModel(domain::equipment::Model);

/// Span an `Equipment` may be rented for.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum RentSpan {
    /// Rented by the day.
    Daily,

    /// Rented by the month.
    Monthly,

    /// Rented by the year.
    Yearly,
}

impl From<RentSpan> for domain::equipment::RentSpan {
    fn from(value: RentSpan) -> Self {
        match value {
            RentSpan::Daily => Self::Daily,
            RentSpan::Monthly => Self::Monthly,
            RentSpan::Yearly => Self::Yearly,
        }
    }
}

impl From<domain::equipment::RentSpan> for RentSpan {
    fn from(value: domain::equipment::RentSpan) -> Self {
        match value {
            domain::equipment::RentSpan::Daily => Self::Daily,
            domain::equipment::RentSpan::Monthly => Self::Monthly,
            domain::equipment::RentSpan::Yearly => Self::Yearly,
        }
    }
}

/// Project attributes of a `PROJECT_REQUEST` `Listing`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ListingProjectDetails")]
pub struct ProjectDetails {
    /// Whether diesel is provided by the contractor.
    pub diesel: Option<String>,

    /// Whether workers are provided by the contractor.
    pub workers: Option<String>,

    /// Area of the project site.
    pub area: Option<String>,
}

impl From<domain::listing::ProjectDetails> for ProjectDetails {
    fn from(value: domain::listing::ProjectDetails) -> Self {
        let domain::listing::ProjectDetails {
            diesel,
            workers,
            area,
        } = value;
        Self {
            diesel,
            workers,
            area,
        }
    }
}

/// Project attributes of a `PROJECT_REQUEST` `Listing`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ListingProjectDetailsInput")]
pub struct ProjectDetailsInput {
    /// Whether diesel is provided by the contractor.
    pub diesel: Option<String>,

    /// Whether workers are provided by the contractor.
    pub workers: Option<String>,

    /// Area of the project site.
    pub area: Option<String>,
}

impl From<ProjectDetailsInput> for domain::listing::ProjectDetails {
    fn from(value: ProjectDetailsInput) -> Self {
        let ProjectDetailsInput {
            diesel,
            workers,
            area,
        } = value;
        Self {
            diesel,
            workers,
            area,
        }
    }
}

/// Page of a `Listing` feed.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "ListingFeedPage")]
pub struct FeedPage {
    /// Visible `Listing`s, newest first.
    pub listings: Vec<Listing>,

    /// Number of `Listing`s in `listings`.
    pub visible_count: i32,

    /// Total number of `Listing`s passing the filter.
    pub total_count: i32,

    /// Indicator whether more `Listing`s can be loaded.
    pub has_more: bool,
}

/// Distinct city and district values occurring in a `Listing` feed.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ListingFilterValues")]
pub struct FilterValues {
    /// Distinct cities, capitalized for display.
    pub cities: Vec<String>,

    /// Distinct districts, capitalized for display.
    pub districts: Vec<String>,
}

impl From<read::FilterValues> for FilterValues {
    fn from(value: read::FilterValues) -> Self {
        let read::FilterValues { cities, districts } = value;
        Self { cities, districts }
    }
}
