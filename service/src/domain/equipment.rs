//! [`Equipment`] definitions.

use std::{collections::BTreeSet, str::FromStr};

use common::define_kind;
use derive_more::{AsRef, Display, From, Into};

use super::{listing, Variant};
#[cfg(doc)]
use super::Listing;

/// Single machinery line item of a [`Listing`].
///
/// Stored as a child record in a per-[`Listing`] sub-collection.
#[derive(Clone, Debug)]
pub struct Equipment {
    /// [`Kind`] of this [`Equipment`].
    pub kind: Kind,

    /// [`Model`] of this [`Equipment`].
    pub model: Model,

    /// Manufacturing year of this [`Equipment`], if specified.
    pub year: Option<Year>,

    /// [`RentTerms`] of this [`Equipment`].
    pub terms: RentTerms,
}

/// [`Equipment`] addressed as a child record of a concrete [`Listing`].
#[derive(Clone, Debug)]
pub struct Record {
    /// [`Variant`] of the parent [`Listing`].
    pub variant: Variant,

    /// ID of the parent [`Listing`].
    pub listing: listing::Id,

    /// The [`Equipment`] itself.
    pub equipment: Equipment,
}

/// Kind of an [`Equipment`] (excavator, loader, etc.).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Kind(String);

impl Kind {
    /// Creates a new [`Kind`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `kind` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// Creates a new [`Kind`] if the given `kind` is valid.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Option<Self> {
        let kind = kind.into();
        Self::check(&kind).then_some(Self(kind))
    }

    /// Checks whether the given `kind` is a valid [`Kind`].
    fn check(kind: impl AsRef<str>) -> bool {
        let kind = kind.as_ref();
        !kind.is_empty() && kind.len() <= 512
    }
}

impl FromStr for Kind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Kind`")
    }
}

/// Model of an [`Equipment`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        !model.is_empty() && model.len() <= 512
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Manufacturing year of an [`Equipment`].
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Year(u16);

impl Year {
    /// Creates a new [`Year`] if the given `year` is plausible.
    #[must_use]
    pub fn new(year: u16) -> Option<Self> {
        (1900..=2100).contains(&year).then_some(Self(year))
    }
}

define_kind! {
    #[doc = "Span an [`Equipment`] may be rented for."]
    enum RentSpan {
        #[doc = "Rented by the day."]
        Daily = 1,

        #[doc = "Rented by the month."]
        Monthly = 2,

        #[doc = "Rented by the year."]
        Yearly = 3,
    }
}

impl RentSpan {
    /// Parses a [`RentSpan`] from its stored Arabic label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "يومي" => Some(Self::Daily),
            "شهري" => Some(Self::Monthly),
            "سنوي" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns the Arabic label this [`RentSpan`] is stored under.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "يومي",
            Self::Monthly => "شهري",
            Self::Yearly => "سنوي",
        }
    }
}

/// Rent terms of an [`Equipment`].
///
/// Equipment-offer line items advertise a set of acceptable [`RentSpan`]s,
/// while project-request line items ask for exactly one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RentTerms {
    /// Set of acceptable [`RentSpan`]s of an equipment offer.
    Spans(BTreeSet<RentSpan>),

    /// Single [`RentSpan`] a project request asks for.
    Single(RentSpan),
}

impl RentTerms {
    /// Returns the [`RentSpan`]s of these [`RentTerms`].
    #[must_use]
    pub fn spans(&self) -> Vec<RentSpan> {
        match self {
            Self::Spans(spans) => spans.iter().copied().collect(),
            Self::Single(span) => vec![*span],
        }
    }
}
