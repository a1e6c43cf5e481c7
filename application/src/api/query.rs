//! GraphQL [`Query`]s definitions.

use common::YearMonth;
use juniper::graphql_object;
use service::{domain::client, query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Client` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "client",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(query::client::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::client::ClientError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Client`s passing the provided filters, in the
    /// order they were created.
    ///
    /// `search` is matched case-insensitively against the name or the
    /// company of a `Client`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_INVALID` - `page` or `perPage` is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            created = ?created,
            gql.name = "clients",
            otel.name = Self::SPAN_NAME,
            page = ?page,
            per_page = ?per_page,
            search = ?search,
            status = ?status,
        ),
    )]
    pub async fn clients(
        status: Option<api::client::list::StatusFilter>,
        search: Option<String>,
        created: Option<api::client::list::DateRange>,
        page: Option<i32>,
        per_page: Option<i32>,
        ctx: &Context,
    ) -> Result<api::client::list::Page, Error> {
        let arguments = read::client::list::Arguments::new(
            page,
            per_page,
            i32::from(ctx.page_size()),
        )
        .ok_or_else(|| api::PaginationError::Invalid.into())
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::clients::List(read::client::list::Selector {
                arguments,
                filter: read::client::list::Filter {
                    status: status.unwrap_or_default().into(),
                    search,
                    created: created.map(
                        api::client::list::DateRange::into_creation_range,
                    ),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Summarizes the `Client`s created in the specified month (UTC).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "monthlySummary",
            month = %month,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn monthly_summary(
        month: YearMonth,
        ctx: &Context,
    ) -> Result<api::report::Monthly, Error> {
        ctx.service()
            .execute(query::report::Monthly { month })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Summarizes the commissions of all the `Client`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "commissionSummary",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn commission_summary(
        ctx: &Context,
    ) -> Result<api::report::Commissions, Error> {
        ctx.service()
            .execute(query::report::Commissions)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Renders all the `Client`s as a table, ready to be written into a
    /// document or a spreadsheet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "clientsTable",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn clients_table(
        ctx: &Context,
    ) -> Result<api::client::export::Table, Error> {
        ctx.service()
            .execute(query::clients::Table)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(api::client::export::Table)
    }

    /// Exports all the `Client`s as a JSON array, accepted back by the
    /// `importClients` mutation.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "exportClients",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn export_clients(ctx: &Context) -> Result<String, Error> {
        let records = ctx
            .service()
            .execute(query::clients::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into_iter()
            .map(client::Record::from)
            .collect::<Vec<_>>();

        serde_json::to_string(&records)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}
