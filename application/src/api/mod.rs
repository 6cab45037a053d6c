//! GraphQL API definitions.

pub mod listing;
mod mutation;
mod query;
pub mod scalar;
pub mod user;

use crate::Context;

pub use self::{
    listing::Listing, mutation::Mutation, query::Query, user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;
