//! [`Client`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, define_error, error, Context, Error};

/// A credit applicant.
#[derive(Clone, Debug, From, Into)]
pub struct Client(domain::Client);

/// A credit applicant.
#[graphql_object(context = Context)]
impl Client {
    /// Unique identifier of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name.as_ref()
    }

    /// Company this `Client` represents.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.company",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn company(&self) -> &str {
        self.0.company.as_ref()
    }

    /// Credit amount granted to this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.creditAmount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn credit_amount(&self) -> scalar::Decimal {
        self.0.credit_amount.get().into()
    }

    /// Term of the credit, in months.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.termMonths",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn term_months(&self) -> i32 {
        self.0.term.months().into()
    }

    /// Approval status of the credit.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Client` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// Commission earned on the credit of this `Client`.
    ///
    /// Zero for a rejected `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.commission",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn commission(&self) -> scalar::Decimal {
        self.0.commission.get().into()
    }

    /// Indicator whether the commission has been collected.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.commissionPaid",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn commission_paid(&self) -> bool {
        self.0.commission_paid
    }

    /// Indicator whether the commission can be collected now, meaning this
    /// `Client` is approved and the commission is not collected yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.commissionPayable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn commission_payable(&self) -> bool {
        self.0.is_commission_payable()
    }
}

/// Unique identifier of a `Client`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::client::Id)]
#[into(domain::client::Id)]
#[graphql(name = "ClientId", transparent)]
pub struct Id(Uuid);

/// Approval status of a `Client`'s credit.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ClientStatus")]
pub enum Status {
    /// Awaiting a decision.
    Pending,

    /// The credit is approved.
    Approved,

    /// The credit is rejected.
    Rejected,
}

impl From<domain::client::Status> for Status {
    fn from(status: domain::client::Status) -> Self {
        use domain::client::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
        }
    }
}

impl From<Status> for domain::client::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Approved => Self::Approved,
            Status::Rejected => Self::Rejected,
        }
    }
}

/// Editable fields of a `Client`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ClientInput")]
pub struct Input {
    /// Name of the `Client`, non-empty.
    pub name: String,

    /// Company of the `Client`, non-empty.
    pub company: String,

    /// Credit amount, positive unless the `Client` is pending.
    pub credit_amount: scalar::Decimal,

    /// Term of the credit, one of 6, 12, 18, 24 or 30 months.
    pub term_months: i32,

    /// Approval status of the credit.
    pub status: Status,
}

impl From<Input> for domain::client::Draft {
    fn from(input: Input) -> Self {
        let Input {
            name,
            company,
            credit_amount,
            term_months,
            status,
        } = input;
        Self {
            name,
            company,
            credit_amount: credit_amount.into(),
            term_months,
            status: status.into(),
        }
    }
}

impl From<&domain::client::ValidationError> for Error {
    fn from(err: &domain::client::ValidationError) -> Self {
        Self::from(ClientError::ValidationFailed).with_violations(
            err.violations().iter().map(error::Violation::from),
        )
    }
}

define_error! {
    enum ClientError {
        #[code = "CLIENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Client` with the specified ID does not exist"]
        NotExists,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "`ClientInput` is invalid"]
        ValidationFailed,

        #[code = "INVALID_STATUS_TRANSITION"]
        #[status = CONFLICT]
        #[message = "Only a pending `Client` can be approved or rejected"]
        InvalidTransition,

        #[code = "COMMISSION_NOT_PAYABLE"]
        #[status = CONFLICT]
        #[message = "Commission can only be collected once from an approved \
                     `Client`"]
        CommissionNotPayable,
    }
}

pub mod list {
    //! Definitions related to the [`Client`] list.

    use std::ops::RangeInclusive;

    use common::DateTime;
    use derive_more::{From, Into};
    use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject};
    use service::{domain::client::CreationDateTime, read};

    use super::Client;
    use crate::{api::count, Context, Error};

    /// Status a listed `Client` should have.
    #[derive(Clone, Copy, Debug, Default, Eq, GraphQLEnum, PartialEq)]
    #[graphql(name = "ClientStatusFilter")]
    pub enum StatusFilter {
        /// Any status.
        #[default]
        All,

        /// Approved `Client`s only.
        Approved,

        /// Rejected `Client`s only.
        Rejected,

        /// Pending `Client`s only.
        Pending,
    }

    impl From<StatusFilter> for read::client::list::StatusFilter {
        fn from(filter: StatusFilter) -> Self {
            match filter {
                StatusFilter::All => Self::All,
                StatusFilter::Approved => Self::Approved,
                StatusFilter::Rejected => Self::Rejected,
                StatusFilter::Pending => Self::Pending,
            }
        }
    }

    /// Inclusive range of `DateTime`s.
    #[derive(Clone, Copy, Debug, GraphQLInputObject)]
    pub struct DateRange {
        /// Earliest `DateTime` of the range.
        pub start: DateTime,

        /// Latest `DateTime` of the range.
        pub end: DateTime,
    }

    impl DateRange {
        /// Converts this [`DateRange`] into a range of [`CreationDateTime`]s.
        #[must_use]
        pub fn into_creation_range(self) -> RangeInclusive<CreationDateTime> {
            self.start.coerce()..=self.end.coerce()
        }
    }

    /// Page of the [`Client`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Page(read::client::list::Page);

    /// Page of the `Client` list.
    #[graphql_object(name = "ClientListPage", context = Context)]
    impl Page {
        /// `Client`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Client> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// 1-based number of this page.
        pub fn number(&self) -> Result<i32, Error> {
            count(self.0.number)
        }

        /// Maximum number of `Client`s on a single page.
        pub fn per_page(&self) -> Result<i32, Error> {
            count(self.0.per_page)
        }

        /// Total number of `Client`s passing the filter.
        pub fn total_count(&self) -> Result<i32, Error> {
            count(self.0.total_count)
        }

        /// Total number of pages, `0` if no `Client` passes the filter.
        pub fn total_pages(&self) -> Result<i32, Error> {
            count(self.0.total_pages())
        }

        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.0.has_next_page()
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.0.has_previous_page()
        }
    }
}

pub mod export {
    //! Definitions related to the tabular export of [`Client`]s.
    //!
    //! [`Client`]: super::Client

    use juniper::graphql_object;
    use service::read::client::export;

    use crate::Context;

    /// All the `Client`s rendered as a table.
    #[derive(Clone, Debug)]
    pub struct Table(pub Vec<export::Row>);

    /// All the `Client`s rendered as a table of texts.
    #[graphql_object(name = "ClientsTable", context = Context)]
    impl Table {
        /// Titles of the columns.
        #[must_use]
        pub fn header(&self) -> Vec<String> {
            export::Row::HEADER.map(str::to_owned).to_vec()
        }

        /// Rows of cells, in the `header` order.
        #[must_use]
        pub fn rows(&self) -> Vec<Vec<String>> {
            self.0
                .iter()
                .map(|row| row.cells().map(str::to_owned).to_vec())
                .collect()
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;
    use service::domain::client;

    use crate::Error;

    use super::{Input, Status};

    #[test]
    fn converts_input_into_draft() {
        let draft = client::Draft::from(Input {
            name: " Ana ".to_owned(),
            company: "Acme".to_owned(),
            credit_amount: Decimal::from_str("1000.50").unwrap().into(),
            term_months: 12,
            status: Status::Approved,
        });

        assert_eq!(draft.name, " Ana ");
        assert_eq!(draft.credit_amount, Decimal::from_str("1000.50").unwrap());
        assert_eq!(draft.term_months, 12);
        assert_eq!(draft.status, client::Status::Approved);
    }

    #[test]
    fn reports_every_violation() {
        let err = client::Draft::from(Input {
            name: String::new(),
            company: "Acme".to_owned(),
            credit_amount: Decimal::ZERO.into(),
            term_months: 7,
            status: Status::Approved,
        })
        .validate()
        .unwrap_err();

        let err = Error::from(&err);

        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.violations
                .iter()
                .map(|v| v.field.as_str())
                .collect::<Vec<_>>(),
            ["name", "creditAmount", "termMonths"],
        );
    }
}
