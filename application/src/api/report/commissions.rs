//! [`Commissions`] report definition.

use derive_more::{From, Into};
use juniper::graphql_object;
use service::read::client::summary;

use crate::{
    api::{count, scalar},
    Context, Error,
};

/// Summary of the commissions over all the `Client`s.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct Commissions(summary::Commissions);

/// Summary of the commissions over all the `Client`s.
#[graphql_object(name = "CommissionSummary", context = Context)]
impl Commissions {
    /// Sum of the commissions of approved `Client`s awaiting collection.
    #[must_use]
    pub fn pending_total(&self) -> scalar::Decimal {
        scalar::Decimal::money(self.0.pending_total)
    }

    /// Number of approved `Client`s with a commission awaiting collection.
    pub fn pending_count(&self) -> Result<i32, Error> {
        count(self.0.pending_count)
    }

    /// Sum of the already collected commissions.
    #[must_use]
    pub fn paid_total(&self) -> scalar::Decimal {
        scalar::Decimal::money(self.0.paid_total)
    }
}
