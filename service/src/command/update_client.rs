//! [`Command`] for updating a [`Client`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing the mutable fields of a [`Client`].
#[derive(Clone, Debug)]
pub struct UpdateClient {
    /// ID of the [`Client`] to update.
    pub client_id: client::Id,

    /// New [`client::Draft`] of the [`Client`].
    pub draft: client::Draft,

    /// New commission collection indicator, if it should be changed.
    pub commission_paid: Option<bool>,
}

impl<Db> Command<UpdateClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Client, client::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Client>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateClient {
            client_id,
            draft,
            commission_paid,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Client`.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        let details = draft.validate().map_err(tracerr::from_and_wrap!(=> E))?;
        client
            .apply(details)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if let Some(paid) = commission_paid {
            client.commission_paid = paid;
        }

        tx.execute(Update(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(client.id = %client.id, "`Client` updated");
        Ok(client)
    }
}

/// Error of [`UpdateClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`client::Draft`] is invalid.
    #[display("{_0}")]
    Validation(client::ValidationError),

    /// [`client::Status`] cannot be changed this way.
    #[display("{_0}")]
    InvalidTransition(client::InvalidTransition),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{self, CreationDateTime, Draft, Status},
            Client,
        },
        infra::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, UpdateClient};

    fn draft(amount: i64, status: Status) -> Draft {
        Draft {
            name: "Ana".into(),
            company: "Torres SA".into(),
            credit_amount: Decimal::from(amount),
            term_months: 6,
            status,
        }
    }

    fn service(status: Status) -> (Service<Memory>, Client) {
        let details = draft(1000, status).validate().unwrap();
        let mut client = Client::new(details, CreationDateTime::now());
        client.commission_paid = true;
        (Service::new(Memory::with_clients(vec![client.clone()])), client)
    }

    #[tokio::test]
    async fn recalculates_commission_and_keeps_paid() {
        let (svc, client) = service(Status::Pending);

        let updated = svc
            .execute(UpdateClient {
                client_id: client.id,
                draft: draft(2000, Status::Approved),
                commission_paid: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.id, client.id);
        assert_eq!(updated.created_at, client.created_at);
        assert_eq!(updated.status, Status::Approved);
        assert_eq!(updated.commission.get(), Decimal::from(40));
        assert!(updated.commission_paid);
    }

    #[tokio::test]
    async fn overrides_paid_when_provided() {
        let (svc, client) = service(Status::Approved);

        let updated = svc
            .execute(UpdateClient {
                client_id: client.id,
                draft: draft(1000, Status::Approved),
                commission_paid: Some(false),
            })
            .await
            .unwrap();

        assert!(!updated.commission_paid);
    }

    #[tokio::test]
    async fn fails_on_missing_client() {
        let (svc, _) = service(Status::Pending);
        let id = client::Id::new();

        let err = svc
            .execute(UpdateClient {
                client_id: id,
                draft: draft(1000, Status::Pending),
                commission_paid: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ClientNotExists(i) if *i == id,
        ));
    }

    #[tokio::test]
    async fn refuses_reverting_decision() {
        let (svc, client) = service(Status::Rejected);

        let err = svc
            .execute(UpdateClient {
                client_id: client.id,
                draft: draft(1000, Status::Pending),
                commission_paid: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn refuses_invalid_draft() {
        let (svc, client) = service(Status::Pending);

        let err = svc
            .execute(UpdateClient {
                client_id: client.id,
                draft: draft(0, Status::Approved),
                commission_paid: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));
    }
}
