//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{feed::Feed, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches the visible page of the `Listing` feed.
    ///
    /// Runs the whole pipeline: fetches the collection of the specified
    /// variant, sorts it by recency, applies the filters, re-sorts, and cuts
    /// the window. `loadMore` replays that many window extensions, so a
    /// client growing its page keeps passing an incremented value.
    #[tracing::instrument(
        skip_all,
        fields(
            city = ?city,
            district = ?district,
            gql.name = "listings",
            load_more = ?load_more,
            otel.name = Self::SPAN_NAME,
            search = ?search,
            variant = ?variant,
        ),
    )]
    pub async fn listings(
        variant: api::listing::Variant,
        search: Option<String>,
        city: Option<String>,
        district: Option<String>,
        load_more: Option<i32>,
        ctx: &Context,
    ) -> Result<api::listing::FeedPage, Error> {
        let mut feed = Feed::new(variant.into());

        let generation = feed.begin_fetch(variant.into());
        let listings = ctx
            .service()
            .execute(query::listings::All {
                variant: variant.into(),
            })
            .await
            .map_err(|e| -> Error { match e {} })?;
        _ = feed.apply_fetched(generation, listings);

        feed.set_criteria(read::Criteria {
            search,
            city,
            district,
        });
        for _ in 0..load_more.unwrap_or_default().max(0) {
            feed.load_more();
        }

        let visible = feed.visible();
        Ok(api::listing::FeedPage {
            has_more: visible.len() < feed.filtered_len(),
            visible_count: visible.len().try_into().unwrap_or(i32::MAX),
            total_count: feed.filtered_len().try_into().unwrap_or(i32::MAX),
            listings: visible.iter().cloned().map(Into::into).collect(),
        })
    }

    /// Returns the distinct city and district values occurring in the
    /// `Listing`s of the specified variant, for populating filter dropdowns.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "filterValues",
            otel.name = Self::SPAN_NAME,
            variant = ?variant,
        ),
    )]
    pub async fn filter_values(
        variant: api::listing::Variant,
        ctx: &Context,
    ) -> Result<api::listing::FilterValues, Error> {
        ctx.service()
            .execute(query::listings::FilterValues {
                variant: variant.into(),
            })
            .await
            .map_err(|e| -> Error { match e {} })
            .map(Into::into)
    }

    /// Returns the `Listing` with the specified ID, with its `Equipment`
    /// line items loaded.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LISTING_NOT_EXISTS` - the `Listing` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "listing",
            otel.name = Self::SPAN_NAME,
            variant = ?variant,
        ),
    )]
    pub async fn listing(
        variant: api::listing::Variant,
        id: api::listing::Id,
        ctx: &Context,
    ) -> Result<api::Listing, Error> {
        ctx.service()
            .execute(query::listing::ById::by((variant.into(), id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ListingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        ctx.current_session().await.map(|s| s.user.into())
    }
}

define_error! {
    enum ListingError {
        #[code = "LISTING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Listing` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
