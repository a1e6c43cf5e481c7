//! [`Command`] for replacing all the [`Client`]s with imported ones.

use std::collections::HashSet;

use common::operations::{By, Commit, Delete, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing all the stored [`Client`]s with the provided
/// [`client::Record`]s.
///
/// The whole batch is validated before anything is written, so an invalid
/// [`client::Record`] leaves the stored [`Client`]s untouched.
#[derive(Clone, Debug, From)]
pub struct ImportClients {
    /// [`client::Record`]s to import, in their order.
    pub records: Vec<client::Record>,
}

impl<Db> Command<ImportClients> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Vec<Client>, ()>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<Client>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<Client>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ImportClients) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let mut ids = HashSet::with_capacity(cmd.records.len());
        let clients = cmd
            .records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let client = record
                    .into_client()
                    .map_err(|source| E::InvalidRecord { index, source })?;
                if !ids.insert(client.id) {
                    return Err(E::DuplicateId(client.id));
                }
                Ok(client)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Delete(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for client in &clients {
            tx.execute(Insert(client.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(count = clients.len(), "`Client`s imported");
        Ok(clients)
    }
}

/// Error of [`ImportClients`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`client::Record`] at the `index` is invalid.
    #[display("`Record` #{index} is invalid: {source}")]
    #[from(ignore)]
    InvalidRecord {
        /// Index of the invalid [`client::Record`] in the batch.
        index: usize,

        /// Violations of the [`client::Record`].
        source: client::ValidationError,
    },

    /// [`client::Id`] is used by several [`client::Record`]s.
    #[display("`Client(id: {_0})` is imported more than once")]
    #[from(ignore)]
    DuplicateId(#[error(not(source))] client::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{CreationDateTime, Draft, Record, Status},
            Client,
        },
        infra::{Database as _, Memory},
        Command as _, Service,
    };

    use super::{ExecutionError, ImportClients};

    fn client(name: &str, status: Status) -> Client {
        let details = Draft {
            name: name.into(),
            company: "Torres SA".into(),
            credit_amount: Decimal::from(1000),
            term_months: 12,
            status,
        }
        .validate()
        .unwrap();
        Client::new(details, CreationDateTime::now())
    }

    async fn stored(svc: &Service<Memory>) -> Vec<Client> {
        svc.database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn replaces_clients_in_order() {
        let existing = client("Old", Status::Pending);
        let svc = Service::new(Memory::with_clients(vec![existing]));
        let imported = vec![
            client("B", Status::Approved),
            client("A", Status::Rejected),
        ];
        let mut records =
            imported.iter().cloned().map(Record::from).collect::<Vec<_>>();
        records[0].commission = Decimal::from(999);

        let clients = svc
            .execute(ImportClients::from(records))
            .await
            .unwrap();

        assert_eq!(clients, imported);
        assert_eq!(stored(&svc).await, imported);
    }

    #[tokio::test]
    async fn rejects_whole_batch_on_invalid_record() {
        let existing = client("Old", Status::Pending);
        let svc = Service::new(Memory::with_clients(vec![existing.clone()]));
        let mut records = vec![
            Record::from(client("A", Status::Approved)),
            Record::from(client("B", Status::Approved)),
        ];
        records[1].term_months = 7;

        let err = svc
            .execute(ImportClients::from(records))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidRecord { index: 1, .. },
        ));
        assert_eq!(stored(&svc).await, [existing]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let svc = Service::new(Memory::new());
        let record = Record::from(client("A", Status::Pending));

        let err = svc
            .execute(ImportClients::from(vec![record.clone(), record]))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::DuplicateId(_)));
        assert!(stored(&svc).await.is_empty());
    }
}
