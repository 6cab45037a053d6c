//! [`User`] definitions.

use std::{str::FromStr, sync::LazyLock};

use common::define_kind;
use derive_more::{AsRef, Display, Into};
use regex::Regex;

#[cfg(doc)]
use super::Listing;

/// Registered user of the marketplace.
///
/// Identified by the id the identity provider issued; the profile document
/// is keyed by it and is never deleted by the application.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`], issued by the identity provider.
    pub id: Id,

    /// [`DisplayName`] of this [`User`].
    pub display_name: Option<DisplayName>,

    /// [`Email`] of this [`User`].
    pub email: Option<Email>,

    /// Contact [`Phone`] of this [`User`].
    pub phone: Option<Phone>,

    /// [`CompanyBio`] of this [`User`].
    pub company_bio: Option<CompanyBio>,

    /// [`CompanyLocation`] of this [`User`].
    pub company_location: Option<CompanyLocation>,

    /// [`TradeRegistryNumber`] of this [`User`].
    pub trade_registry_number: Option<TradeRegistryNumber>,

    /// URL of this [`User`]'s profile photo.
    pub photo_url: Option<PhotoUrl>,

    /// [`Role`] of this [`User`], unset until chosen.
    pub role: Option<Role>,

    /// Indicator whether this [`User`] hasn't completed the
    /// profile-completion flow yet.
    pub first_login: bool,
}

impl User {
    /// Creates a blank [`User`] profile for a first sign-in.
    #[must_use]
    pub fn blank(id: Id) -> Self {
        Self {
            id,
            display_name: None,
            email: None,
            phone: None,
            company_bio: None,
            company_location: None,
            trade_registry_number: None,
            photo_url: None,
            role: None,
            first_login: true,
        }
    }
}

define_kind! {
    #[doc = "Role of a [`User`] on the marketplace."]
    enum Role {
        #[doc = "Owner of heavy equipment, publishing offers."]
        EquipmentOwner = 1,

        #[doc = "Contractor, publishing project requests."]
        Contractor = 2,
    }
}

impl Role {
    /// Parses a [`Role`] from the stored `"yes"`/`"no"` equipment-owner
    /// flag.
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "yes" => Some(Self::EquipmentOwner),
            "no" => Some(Self::Contractor),
            _ => None,
        }
    }

    /// Returns the stored `"yes"`/`"no"` equipment-owner flag of this
    /// [`Role`].
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::EquipmentOwner => "yes",
            Self::Contractor => "no",
        }
    }
}

/// ID of a [`User`].
///
/// Opaque identifier issued by the identity provider.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct Id(String);

impl Id {
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

/// Display name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a new [`DisplayName`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`DisplayName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`DisplayName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for DisplayName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DisplayName`")
    }
}

/// Email of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Contact phone of a [`User`].
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

/// Company bio of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct CompanyBio(String);

impl CompanyBio {
    /// Creates a new [`CompanyBio`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `bio` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(bio: impl Into<String>) -> Self {
        Self(bio.into())
    }

    /// Creates a new [`CompanyBio`] if the given `bio` is valid.
    #[must_use]
    pub fn new(bio: impl Into<String>) -> Option<Self> {
        let bio = bio.into();
        Self::check(&bio).then_some(Self(bio))
    }

    /// Checks whether the given `bio` is a valid [`CompanyBio`].
    fn check(bio: impl AsRef<str>) -> bool {
        let bio = bio.as_ref();
        !bio.is_empty() && bio.len() <= 5000
    }
}

impl FromStr for CompanyBio {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `CompanyBio`")
    }
}

/// Company location of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct CompanyLocation(String);

impl CompanyLocation {
    /// Creates a new [`CompanyLocation`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`CompanyLocation`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`CompanyLocation`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        !location.is_empty() && location.len() <= 512
    }
}

impl FromStr for CompanyLocation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `CompanyLocation`")
    }
}

/// Trade registry number of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct TradeRegistryNumber(String);

impl TradeRegistryNumber {
    /// Creates a new [`TradeRegistryNumber`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`TradeRegistryNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`TradeRegistryNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        !number.is_empty() && number.len() <= 64
    }
}

impl FromStr for TradeRegistryNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `TradeRegistryNumber`")
    }
}

/// URL of a [`User`]'s profile photo.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
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

/// Partial update of a [`User`] profile.
///
/// [`None`] fields are left untouched by the update.
#[derive(Clone, Debug)]
pub struct ProfileUpdate {
    /// ID of the [`User`] being updated.
    pub id: Id,

    /// New [`DisplayName`], if any.
    pub display_name: Option<DisplayName>,

    /// New [`Phone`], if any.
    pub phone: Option<Phone>,

    /// New [`CompanyBio`], if any.
    pub company_bio: Option<CompanyBio>,

    /// New [`CompanyLocation`], if any.
    pub company_location: Option<CompanyLocation>,

    /// New [`TradeRegistryNumber`], if any.
    pub trade_registry_number: Option<TradeRegistryNumber>,

    /// New photo URL, if any.
    pub photo_url: Option<PhotoUrl>,

    /// New [`Role`], if any.
    pub role: Option<Role>,

    /// New value of the first-login flag, if it should change.
    pub first_login: Option<bool>,
}

impl ProfileUpdate {
    /// Creates an empty [`ProfileUpdate`] of the provided [`User`].
    #[must_use]
    pub fn of(id: Id) -> Self {
        Self {
            id,
            display_name: None,
            phone: None,
            company_bio: None,
            company_location: None,
            trade_registry_number: None,
            photo_url: None,
            role: None,
            first_login: None,
        }
    }

    /// Indicates whether this [`ProfileUpdate`] changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.phone.is_none()
            && self.company_bio.is_none()
            && self.company_location.is_none()
            && self.trade_registry_number.is_none()
            && self.photo_url.is_none()
            && self.role.is_none()
            && self.first_login.is_none()
    }
}
