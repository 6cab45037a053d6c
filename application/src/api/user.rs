//! [`User`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query};
use tokio::sync::OnceCell;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`User`] of the marketplace.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`domain::User`] representing this [`User`].
    user: OnceCell<domain::User>,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id.clone().into(),
            user: OnceCell::new_with(Some(user)),
        }
    }
}

impl User {
    /// Creates a new [`User`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`User`] with the provided ID exists,
    /// otherwise accessing this [`User`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            user: OnceCell::new(),
        }
    }

    /// Returns the [`domain::User`] representing this [`User`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::User`] doesn't exist.
    async fn user(&self, ctx: &Context) -> Result<&domain::User, Error> {
        let id = self.id.clone().into();
        self.user
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::user::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|u| {
                        future::ready(u.ok_or_else(|| {
                            api::query::UserError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `User` of the marketplace.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id.clone()
    }

    /// Display name of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.displayName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn display_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<DisplayName>, Error> {
        Ok(self.user(ctx).await?.display_name.clone().map(Into::into))
    }

    /// Email of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.user(ctx).await?.email.clone().map(Into::into))
    }

    /// Contact phone of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.user(ctx).await?.phone.clone().map(Into::into))
    }

    /// Company bio of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.companyBio",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn company_bio(
        &self,
        ctx: &Context,
    ) -> Result<Option<CompanyBio>, Error> {
        Ok(self.user(ctx).await?.company_bio.clone().map(Into::into))
    }

    /// Company location of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.companyLocation",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn company_location(
        &self,
        ctx: &Context,
    ) -> Result<Option<CompanyLocation>, Error> {
        Ok(self
            .user(ctx)
            .await?
            .company_location
            .clone()
            .map(Into::into))
    }

    /// Trade registry number of this `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.tradeRegistryNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn trade_registry_number(
        &self,
        ctx: &Context,
    ) -> Result<Option<TradeRegistryNumber>, Error> {
        Ok(self
            .user(ctx)
            .await?
            .trade_registry_number
            .clone()
            .map(Into::into))
    }

    /// URL of this `User`'s profile photo.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.photoUrl",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn photo_url(
        &self,
        ctx: &Context,
    ) -> Result<Option<PhotoUrl>, Error> {
        Ok(self.user(ctx).await?.photo_url.clone().map(Into::into))
    }

    /// Role of this `User`, unset until chosen during onboarding.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.role",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn role(&self, ctx: &Context) -> Result<Option<Role>, Error> {
        Ok(self.user(ctx).await?.role.map(Into::into))
    }

    /// Indicator whether this `User` hasn't completed the onboarding flow
    /// yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "User.firstLogin",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_login(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.user(ctx).await?.first_login)
    }
}

/// Role of a `User` on the marketplace.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "UserRole")]
pub enum Role {
    /// Owner of heavy equipment, publishing offers.
    EquipmentOwner,

    /// Contractor, publishing project requests.
    Contractor,
}

impl From<Role> for domain::user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::EquipmentOwner => Self::EquipmentOwner,
            Role::Contractor => Self::Contractor,
        }
    }
}

impl From<domain::user::Role> for Role {
    fn from(value: domain::user::Role) -> Self {
        match value {
            domain::user::Role::EquipmentOwner => Self::EquipmentOwner,
            domain::user::Role::Contractor => Self::Contractor,
        }
    }
}

/// Unique identifier of a `User`.
#[derive(
    AsRef, Clone, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[graphql(
    name = "UserId",
    with = scalar::Through::<domain::user::Id>,
)]
pub struct Id(domain::user::Id);

/// Display name of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserDisplayName",
    with = scalar::Through::<domain::user::DisplayName>,
)]
pub struct DisplayName(domain::user::DisplayName);

/// Email of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserEmail",
    with = scalar::Through::<domain::user::Email>,
)]
pub struct Email(domain::user::Email);

/// Contact phone of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserPhone",
    with = scalar::Through::<domain::user::Phone>,
)]
pub struct Phone(domain::user::Phone);

/// Company bio of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserCompanyBio",
    with = scalar::Through::<domain::user::CompanyBio>,
)]
pub struct CompanyBio(domain::user::CompanyBio);

/// Company location of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserCompanyLocation",
    with = scalar::Through::<domain::user::CompanyLocation>,
)]
pub struct CompanyLocation(domain::user::CompanyLocation);

/// Trade registry number of a `User`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserTradeRegistryNumber",
    with = scalar::Through::<domain::user::TradeRegistryNumber>,
)]
pub struct TradeRegistryNumber(domain::user::TradeRegistryNumber);

/// URL of a `User`'s profile photo.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "UserPhotoUrl",
    with = scalar::Through::<domain::user::PhotoUrl>,
)]
pub struct PhotoUrl(domain::user::PhotoUrl);
