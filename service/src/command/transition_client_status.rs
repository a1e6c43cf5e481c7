//! [`Command`] for deciding on a [`Client`]'s credit.

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

/// [`Command`] for moving a pending [`Client`] to a decided
/// [`client::Status`].
#[derive(Clone, Copy, Debug)]
pub struct TransitionClientStatus {
    /// ID of the [`Client`] to transition.
    pub client_id: client::Id,

    /// [`client::Status`] to transition the [`Client`] to.
    pub status: client::Status,
}

impl<Db> Command<TransitionClientStatus> for Service<Db>
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

    async fn execute(
        &self,
        cmd: TransitionClientStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitionClientStatus { client_id, status } = cmd;

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

        let from = client.status;
        client
            .transition(status)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if client.credit_amount.is_zero() {
            return Err(tracerr::new!(E::Validation(
                client::Violation::ZeroCreditAmount(status).into(),
            )));
        }

        tx.execute(Update(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            client.id = %client.id,
            from = %from,
            to = %client.status,
            "`Client` status changed",
        );
        Ok(client)
    }
}

/// Error of [`TransitionClientStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Client`] is not pending anymore, or the target [`client::Status`] is
    /// not a decision.
    #[display("{_0}")]
    InvalidTransition(client::InvalidTransition),

    /// [`Client`] has no credit amount to decide on.
    #[display("{_0}")]
    Validation(client::ValidationError),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{self, Commission, CreationDateTime, Draft, Status},
            Client,
        },
        infra::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, TransitionClientStatus};

    fn pending(amount: i64) -> Client {
        let details = Draft {
            name: "Ana".into(),
            company: "Torres SA".into(),
            credit_amount: Decimal::from(amount),
            term_months: 30,
            status: Status::Pending,
        }
        .validate()
        .unwrap();
        Client::new(details, CreationDateTime::now())
    }

    #[tokio::test]
    async fn decides_only_once() {
        for decision in [Status::Approved, Status::Rejected] {
            let client = pending(1000);
            let svc = Service::new(Memory::with_clients(vec![client.clone()]));

            let decided = svc
                .execute(TransitionClientStatus {
                    client_id: client.id,
                    status: decision,
                })
                .await
                .unwrap();
            assert_eq!(decided.status, decision);

            for status in [Status::Pending, Status::Approved, Status::Rejected]
            {
                let err = svc
                    .execute(TransitionClientStatus {
                        client_id: client.id,
                        status,
                    })
                    .await
                    .unwrap_err();
                assert!(
                    matches!(
                        err.as_ref(),
                        ExecutionError::InvalidTransition(_),
                    ),
                    "{decision} -> {status}: {err}",
                );
            }
        }
    }

    #[tokio::test]
    async fn rejection_voids_commission() {
        let client = pending(1000);
        let svc = Service::new(Memory::with_clients(vec![client.clone()]));

        let rejected = svc
            .execute(TransitionClientStatus {
                client_id: client.id,
                status: Status::Rejected,
            })
            .await
            .unwrap();

        assert_eq!(rejected.commission, Commission::ZERO);
    }

    #[tokio::test]
    async fn refuses_deciding_zero_credit() {
        let client = pending(0);
        let svc = Service::new(Memory::with_clients(vec![client.clone()]));

        let err = svc
            .execute(TransitionClientStatus {
                client_id: client.id,
                status: Status::Approved,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Validation(_)));
    }

    #[tokio::test]
    async fn fails_on_missing_client() {
        let svc = Service::new(Memory::new());

        let err = svc
            .execute(TransitionClientStatus {
                client_id: client::Id::new(),
                status: Status::Approved,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ClientNotExists(_)));
    }
}
