//! GraphQL [`Mutation`]s definitions.

use std::collections::BTreeSet;

use base64::Engine as _;
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Publishes a new `Listing` owned by the current `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_LOCATION` - provided coordinates are out of range;
    /// - `INVALID_EQUIPMENT_YEAR` - provided manufacturing year is not
    ///                              plausible;
    /// - `NO_RENT_SPANS` - an `Equipment` line item specifies no rent spans.
    #[tracing::instrument(
        skip_all,
        fields(
            city = ?city,
            district = ?district,
            gql.name = "createListing",
            otel.name = Self::SPAN_NAME,
            title = %title,
            variant = ?variant,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_listing(
        variant: api::listing::Variant,
        title: api::listing::Title,
        city: Option<api::listing::City>,
        district: Option<api::listing::District>,
        location: Option<api::listing::GeoPointInput>,
        description: Option<api::listing::Description>,
        extra_info: Option<api::listing::ExtraInfo>,
        phone: Option<api::listing::Phone>,
        photo_urls: Option<Vec<api::listing::PhotoUrl>>,
        equipment: Vec<api::listing::EquipmentInput>,
        project: Option<api::listing::ProjectDetailsInput>,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let location = location
            .map(|l| {
                domain::listing::GeoPoint::new(l.latitude, l.longitude)
                    .ok_or_else(|| ValidationError::InvalidLocation.into())
                    .map_err(ctx.error())
            })
            .transpose()?;
        let equipment = equipment
            .into_iter()
            .map(|input| convert_equipment(input, variant))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateListing {
                variant: variant.into(),
                title: title.into(),
                city: city.map(Into::into),
                district: district.map(Into::into),
                location,
                description: description.map(Into::into),
                extra_info: extra_info.map(Into::into),
                phone: phone.map(Into::into),
                photo_urls: photo_urls
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                equipment,
                project: project.map(Into::into),
                owner: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the current `User`'s profile with the provided fields.
    ///
    /// Omitted fields are left untouched. Passing `firstLogin: false`
    /// completes the onboarding flow.
    #[tracing::instrument(
        skip_all,
        fields(
            display_name = ?display_name,
            first_login = ?first_login,
            gql.name = "updateMyProfile",
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_my_profile(
        display_name: Option<api::user::DisplayName>,
        phone: Option<api::user::Phone>,
        company_bio: Option<api::user::CompanyBio>,
        company_location: Option<api::user::CompanyLocation>,
        trade_registry_number: Option<api::user::TradeRegistryNumber>,
        role: Option<api::user::Role>,
        first_login: Option<bool>,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let mut update = domain::user::ProfileUpdate::of(my_id.into());
        update.display_name = display_name.map(Into::into);
        update.phone = phone.map(Into::into);
        update.company_bio = company_bio.map(Into::into);
        update.company_location = company_location.map(Into::into);
        update.trade_registry_number = trade_registry_number.map(Into::into);
        update.role = role.map(Into::into);
        update.first_login = first_login;

        ctx.service()
            .execute(command::UpdateProfile { update })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Uploads a new profile photo for the current `User`.
    ///
    /// `content` carries the image bytes as standard base64. The resulting
    /// download URL is stored on the profile and returned.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PHOTO_PAYLOAD` - `content` is not valid base64;
    /// - `UPLOAD_FAILED` - the object storage rejected the upload.
    #[tracing::instrument(
        skip_all,
        fields(
            content_type = %content_type,
            file_name = %file_name,
            gql.name = "setMyProfilePhoto",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_my_profile_photo(
        file_name: String,
        content_type: String,
        content: String,
        ctx: &Context,
    ) -> Result<api::user::PhotoUrl, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(content)
            .map_err(|_| ValidationError::InvalidPhotoPayload.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::SetProfilePhoto {
                user_id: my_id.into(),
                file_name,
                content_type,
                bytes,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deactivates the `Listing` with the specified ID, hiding it from the
    /// marketplace.
    ///
    /// Only the owner may deactivate their `Listing`. Deactivating an
    /// already inactive one is a no-op.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified ID does not
    ///                          exist;
    /// - `NOT_LISTING_OWNER` - the current `User` does not own the `Listing`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "deactivateListing",
            otel.name = Self::SPAN_NAME,
            variant = ?variant,
        ),
    )]
    pub async fn deactivate_listing(
        variant: api::listing::Variant,
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeactivateListing {
                variant: variant.into(),
                id: id.into(),
                initiator: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Converts the provided [`api::listing::EquipmentInput`] into a
/// [`domain::Equipment`] line item of the given variant.
fn convert_equipment(
    input: api::listing::EquipmentInput,
    variant: api::listing::Variant,
) -> Result<domain::Equipment, Error> {
    let api::listing::EquipmentInput {
        kind,
        model,
        year,
        rent_spans,
    } = input;

    let year = year
        .map(|y| {
            u16::try_from(y)
                .ok()
                .and_then(domain::equipment::Year::new)
                .ok_or_else(|| Error::from(ValidationError::InvalidYear))
        })
        .transpose()?;

    let mut spans = rent_spans
        .into_iter()
        .map(domain::equipment::RentSpan::from);
    let terms = match variant {
        api::listing::Variant::EquipmentOffer => {
            let spans: BTreeSet<_> = spans.collect();
            if spans.is_empty() {
                return Err(ValidationError::NoRentSpans.into());
            }
            domain::equipment::RentTerms::Spans(spans)
        }
        api::listing::Variant::ProjectRequest => {
            domain::equipment::RentTerms::Single(
                spans
                    .next()
                    .ok_or_else(|| Error::from(ValidationError::NoRentSpans))?,
            )
        }
    };

    Ok(domain::Equipment {
        kind: kind.into(),
        model: model.into(),
        year,
        terms,
    })
}

impl AsError for command::update_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::set_profile_photo::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Storage(_) => Some(UploadError::Failed.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::deactivate_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => {
                Some(api::query::ListingError::NotExists.into())
            }
            Self::NotOwner(_) => Some(OwnershipError::NotOwner.into()),
        }
    }
}

define_error! {
    enum ValidationError {
        #[code = "INVALID_LOCATION"]
        #[status = BAD_REQUEST]
        #[message = "Provided coordinates are out of range"]
        InvalidLocation,

        #[code = "INVALID_EQUIPMENT_YEAR"]
        #[status = BAD_REQUEST]
        #[message = "Provided manufacturing year is not plausible"]
        InvalidYear,

        #[code = "NO_RENT_SPANS"]
        #[status = BAD_REQUEST]
        #[message = "`Equipment` line item must specify at least one rent span"]
        NoRentSpans,

        #[code = "INVALID_PHOTO_PAYLOAD"]
        #[status = BAD_REQUEST]
        #[message = "Photo content is not valid base64"]
        InvalidPhotoPayload,
    }
}

define_error! {
    enum UploadError {
        #[code = "UPLOAD_FAILED"]
        #[status = BAD_GATEWAY]
        #[message = "Failed to upload the photo to the object storage"]
        Failed,
    }
}

define_error! {
    enum OwnershipError {
        #[code = "NOT_LISTING_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Current `User` is not the owner of the `Listing`"]
        NotOwner,
    }
}
