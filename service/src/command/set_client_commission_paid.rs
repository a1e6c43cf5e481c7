//! [`Command`] for marking a [`Client`]'s commission as collected or not.

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

/// [`Command`] for setting whether a [`Client`]'s commission is collected.
///
/// No [`client::Status`] is required here, so callers willing to restrict
/// collection to approved [`Client`]s should check
/// [`Client::is_commission_payable()`] on their own.
#[derive(Clone, Copy, Debug)]
pub struct SetClientCommissionPaid {
    /// ID of the [`Client`] to update.
    pub client_id: client::Id,

    /// Indicator whether the commission is collected.
    pub paid: bool,
}

impl<Db> Command<SetClientCommissionPaid> for Service<Db>
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
        cmd: SetClientCommissionPaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetClientCommissionPaid { client_id, paid } = cmd;

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
        if client.commission_paid == paid {
            return Ok(client);
        }

        client.commission_paid = paid;
        tx.execute(Update(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(client.id = %client.id, paid, "`Client` commission marked");
        Ok(client)
    }
}

/// Error of [`SetClientCommissionPaid`] [`Command`] execution.
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
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{self, CreationDateTime, Draft, Status},
            Client,
        },
        infra::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, SetClientCommissionPaid};

    #[tokio::test]
    async fn toggles_regardless_of_status() {
        for status in [Status::Pending, Status::Approved, Status::Rejected] {
            let details = Draft {
                name: "Ana".into(),
                company: "Torres SA".into(),
                credit_amount: Decimal::from(100),
                term_months: 18,
                status,
            }
            .validate()
            .unwrap();
            let client = Client::new(details, CreationDateTime::now());
            let svc = Service::new(Memory::with_clients(vec![client.clone()]));

            let paid = svc
                .execute(SetClientCommissionPaid {
                    client_id: client.id,
                    paid: true,
                })
                .await
                .unwrap();
            assert!(paid.commission_paid, "{status}");

            let unpaid = svc
                .execute(SetClientCommissionPaid {
                    client_id: client.id,
                    paid: false,
                })
                .await
                .unwrap();
            assert!(!unpaid.commission_paid, "{status}");
        }
    }

    #[tokio::test]
    async fn fails_on_missing_client() {
        let svc = Service::new(Memory::new());

        let err = svc
            .execute(SetClientCommissionPaid {
                client_id: client::Id::new(),
                paid: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ClientNotExists(_)));
    }
}
