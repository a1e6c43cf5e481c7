//! GraphQL API definitions.

pub mod client;
mod mutation;
mod query;
pub mod report;
pub mod scalar;

use juniper::EmptySubscription;

use crate::{define_error, AsError, Context, Error};

pub use self::{client::Client, mutation::Mutation, query::Query};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PaginationError {
        #[code = "PAGINATION_INVALID"]
        #[status = BAD_REQUEST]
        #[message = "`page` and `perPage` must be positive integers"]
        Invalid,
    }
}

/// Converts the provided count into a GraphQL `Int`.
fn count(n: usize) -> Result<i32, Error> {
    i32::try_from(n).map_err(AsError::into_error)
}
