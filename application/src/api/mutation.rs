//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{
    command,
    domain::{client, Client},
    infra::database,
    query, Command as _,
};
use tracerr::Traced;

use crate::{
    api::{self, client::ClientError},
    define_error, error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Client`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_FAILED` - the provided `ClientInput` is invalid, the
    ///                         `violations` extension lists every offending
    ///                         field.
    #[tracing::instrument(
        skip_all,
        fields(
            company = %input.company,
            gql.name = "createClient",
            name = %input.name,
            otel.name = Self::SPAN_NAME,
            status = ?input.status,
        ),
    )]
    pub async fn create_client(
        input: api::client::Input,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::CreateClient {
                draft: input.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the editable fields of the `Client` with the specified ID.
    ///
    /// `commissionPaid` is left untouched unless provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `VALIDATION_FAILED` - the provided `ClientInput` is invalid;
    /// - `INVALID_STATUS_TRANSITION` - the status change is not allowed.
    #[tracing::instrument(
        skip_all,
        fields(
            commission_paid = ?commission_paid,
            gql.name = "updateClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?input.status,
        ),
    )]
    pub async fn update_client(
        id: api::client::Id,
        input: api::client::Input,
        commission_paid: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::UpdateClient {
                client_id: id.into(),
                draft: input.into(),
                commission_paid,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves or rejects the pending `Client` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `INVALID_STATUS_TRANSITION` - the `Client` is not pending anymore,
    ///                                 or `status` is `PENDING`;
    /// - `VALIDATION_FAILED` - the credit amount of the `Client` is zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "transitionClientStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn transition_client_status(
        id: api::client::Id,
        status: api::client::Status,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::TransitionClientStatus {
                client_id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the commission of the `Client` with the specified ID as
    /// collected or not.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `COMMISSION_NOT_PAYABLE` - `paid` is `true`, while the `Client` is
    ///                              not approved or its commission is
    ///                              collected already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "setClientCommissionPaid",
            id = %id,
            otel.name = Self::SPAN_NAME,
            paid = %paid,
        ),
    )]
    pub async fn set_client_commission_paid(
        id: api::client::Id,
        paid: bool,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        set_commission_paid(ctx.service(), id.into(), paid)
            .await
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the commissions of all the `Client`s as collected, regardless
    /// of their status.
    ///
    /// Either every `Client` is updated, or none of them.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markAllCommissionsPaid",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_all_commissions_paid(
        ctx: &Context,
    ) -> Result<Vec<api::Client>, Error> {
        ctx.service()
            .execute(command::MarkAllCommissionsPaid)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|clients| clients.into_iter().map(Into::into).collect())
    }

    /// Removes the `Client` with the specified ID, returning it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::DeleteClient {
                client_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces all the `Client`s with the ones from the provided JSON
    /// array, as produced by the `exportClients` query.
    ///
    /// Nothing is changed if any of the imported `Client`s is invalid.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_IMPORT` - `data` is malformed or contains an invalid
    ///                      `Client`, the `violations` extension points to
    ///                      the offending entries.
    #[tracing::instrument(
        skip_all,
        fields(
            data.len = data.len(),
            gql.name = "importClients",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn import_clients(
        data: String,
        ctx: &Context,
    ) -> Result<Vec<api::Client>, Error> {
        let records = serde_json::from_str::<Vec<client::Record>>(&data)
            .map_err(|e| {
                Error::from(ImportError::Invalid).with_violations([
                    error::Violation {
                        field: "data".to_owned(),
                        message: e.to_string(),
                    },
                ])
            })
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::ImportClients { records })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|clients| clients.into_iter().map(Into::into).collect())
    }
}

/// Marks the commission of the [`Client`] with the provided [`client::Id`]
/// as collected or not, allowing to collect it only once the [`Client`] is
/// approved.
async fn set_commission_paid<Db>(
    service: &service::Service<Db>,
    client_id: client::Id,
    paid: bool,
) -> Result<Client, Error>
where
    service::Service<Db>: service::Query<
            query::client::ById,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + service::Command<
            command::SetClientCommissionPaid,
            Ok = Client,
            Err = Traced<command::set_client_commission_paid::ExecutionError>,
        >,
{
    if paid {
        let client = service
            .execute(query::client::ById::by(client_id))
            .await
            .map_err(AsError::into_error)?
            .ok_or_else(|| Error::from(ClientError::NotExists))?;
        if !client.is_commission_payable() {
            return Err(ClientError::CommissionNotPayable.into());
        }
    }

    service
        .execute(command::SetClientCommissionPaid { client_id, paid })
        .await
        .map_err(AsError::into_error)
}

define_error! {
    enum ImportError {
        #[code = "INVALID_IMPORT"]
        #[status = BAD_REQUEST]
        #[message = "Imported `Client`s are invalid"]
        Invalid,
    }
}

impl AsError for command::create_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Validation(e) => Some(e.into()),
        }
    }
}

impl AsError for command::update_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => Some(ClientError::NotExists.into()),
            Self::InvalidTransition(_) => {
                Some(ClientError::InvalidTransition.into())
            }
            Self::Validation(e) => Some(e.into()),
        }
    }
}

impl AsError for command::transition_client_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => Some(ClientError::NotExists.into()),
            Self::InvalidTransition(_) => {
                Some(ClientError::InvalidTransition.into())
            }
            Self::Validation(e) => Some(e.into()),
        }
    }
}

impl AsError for command::set_client_commission_paid::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => Some(ClientError::NotExists.into()),
        }
    }
}

impl AsError for command::mark_all_commissions_paid::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => Some(ClientError::NotExists.into()),
        }
    }
}

impl AsError for command::import_clients::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidRecord { index, source } => Some(
                Error::from(ImportError::Invalid).with_violations(
                    source.violations().iter().map(|v| error::Violation {
                        field: format!("[{index}].{}", v.field()),
                        message: v.to_string(),
                    }),
                ),
            ),
            Self::DuplicateId(_) => Some(
                Error::from(ImportError::Invalid).with_violations([
                    error::Violation {
                        field: "id".to_owned(),
                        message: self.to_string(),
                    },
                ]),
            ),
        }
    }
}
