//! [`Command`] for marking every commission as collected.

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Client,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking the commissions of all the [`Client`]s as
/// collected, whatever their status is.
///
/// Either all the [`Client`]s are updated, or none of them.
#[derive(Clone, Copy, Debug)]
pub struct MarkAllCommissionsPaid;

impl<Db> Command<MarkAllCommissionsPaid> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Client>, ()>>,
            Ok = Vec<Client>,
            Err = Traced<database::Error>,
        > + Database<Update<Client>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<Client>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: MarkAllCommissionsPaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut clients = tx
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut marked = 0_usize;
        for client in clients.iter_mut().filter(|c| !c.commission_paid) {
            client.commission_paid = true;
            tx.execute(Update(client.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            marked += 1;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(marked, "All `Client` commissions marked as paid");
        Ok(clients)
    }
}

/// Error of [`MarkAllCommissionsPaid`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
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

    use super::MarkAllCommissionsPaid;

    #[tokio::test]
    async fn marks_every_client() {
        let clients = [Status::Pending, Status::Approved, Status::Rejected]
            .into_iter()
            .map(|status| {
                let details = Draft {
                    name: status.to_string(),
                    company: "Torres SA".into(),
                    credit_amount: Decimal::from(100),
                    term_months: 12,
                    status,
                }
                .validate()
                .unwrap();
                Client::new(details, CreationDateTime::now())
            })
            .collect::<Vec<_>>();
        let svc = Service::new(Memory::with_clients(clients.clone()));

        let marked = svc.execute(MarkAllCommissionsPaid).await.unwrap();

        assert!(marked.iter().all(|c| c.commission_paid));
        let stored = svc
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap();
        assert_eq!(stored.len(), clients.len());
        assert!(stored.iter().all(|c| c.commission_paid));
        assert_eq!(
            stored.iter().map(|c| c.id).collect::<Vec<_>>(),
            clients.iter().map(|c| c.id).collect::<Vec<_>>(),
        );
    }
}
