//! [`Monthly`] report definition.

use common::YearMonth;
use derive_more::{From, Into};
use juniper::graphql_object;
use service::read::client::summary;

use crate::{
    api::{self, count, scalar},
    Context, Error,
};

/// Statistics of the `Client`s created in a single month.
#[derive(Clone, Debug, From, Into)]
pub struct Monthly(summary::Monthly);

/// Statistics of the `Client`s created in a single month.
///
/// Rejected `Client`s are counted in `rejectedClients` only, all the others
/// are considered active.
#[graphql_object(name = "MonthlySummary", context = Context)]
impl Monthly {
    /// Month these statistics are about.
    #[must_use]
    pub fn month(&self) -> YearMonth {
        self.0.month
    }

    /// Number of active `Client`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MonthlySummary.totalClients",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total_clients(&self) -> Result<i32, Error> {
        count(self.0.total_clients)
    }

    /// Sum of the credit amounts of active `Client`s, rounded to cents.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MonthlySummary.totalCreditGranted",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_credit_granted(&self) -> scalar::Decimal {
        scalar::Decimal::money(self.0.total_credit_granted)
    }

    /// Sum of the commissions of active `Client`s, rounded to cents.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MonthlySummary.totalCommissionGenerated",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_commission_generated(&self) -> scalar::Decimal {
        scalar::Decimal::money(self.0.total_commission_generated)
    }

    /// Number of approved `Client`s.
    pub fn active_credits(&self) -> Result<i32, Error> {
        count(self.0.active_credits)
    }

    /// Number of approved `Client`s.
    pub fn authorized_clients(&self) -> Result<i32, Error> {
        count(self.0.authorized_clients)
    }

    /// Number of rejected `Client`s.
    pub fn rejected_clients(&self) -> Result<i32, Error> {
        count(self.0.rejected_clients)
    }

    /// Active `Client` with the largest credit amount, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MonthlySummary.maxCreditClient",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn max_credit_client(&self) -> Option<api::Client> {
        self.0.max_credit_client.clone().map(Into::into)
    }
}
