//! [`Command`] for deleting a [`Client`].

use common::operations::{By, Commit, Delete, Lock, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Client`].
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteClient {
    /// ID of the [`Client`] to delete.
    pub client_id: client::Id,
}

impl<Db> Command<DeleteClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Client, client::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteClient { client_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let client = tx
            .execute(Delete(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(client.id = %client.id, "`Client` deleted");
        Ok(client)
    }
}

/// Error of [`DeleteClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{CreationDateTime, Draft, Status},
            Client,
        },
        infra::{Database as _, Memory},
        Command as _, Service,
    };

    use super::{DeleteClient, ExecutionError};

    #[tokio::test]
    async fn deletes_once() {
        let details = Draft {
            name: "Ana".into(),
            company: "Torres SA".into(),
            credit_amount: Decimal::from(100),
            term_months: 12,
            status: Status::Pending,
        }
        .validate()
        .unwrap();
        let client = Client::new(details, CreationDateTime::now());
        let svc = Service::new(Memory::with_clients(vec![client.clone()]));

        let deleted = svc.execute(DeleteClient::from(client.id)).await.unwrap();
        assert_eq!(deleted, client);
        let stored = svc
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap();
        assert!(stored.is_empty());

        let err = svc
            .execute(DeleteClient::from(client.id))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ClientNotExists(_)));
    }
}
