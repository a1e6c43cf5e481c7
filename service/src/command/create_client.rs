//! [`Command`] for creating a new [`Client`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Client`].
#[derive(Clone, Debug)]
pub struct CreateClient {
    /// [`client::Draft`] of a new [`Client`].
    pub draft: client::Draft,
}

impl<Db> Command<CreateClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Client>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let details = cmd
            .draft
            .validate()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let client = Client::new(details, client::CreationDateTime::now());

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            client.id = %client.id,
            client.status = %client.status,
            "`Client` created",
        );
        Ok(client)
    }
}

/// Error of [`CreateClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`client::Draft`] is invalid.
    #[display("{_0}")]
    Validation(client::ValidationError),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client::{Commission, Draft, Status, Violation},
            Client,
        },
        infra::{Database as _, Memory},
        Command as _, Service,
    };

    use super::{CreateClient, ExecutionError};

    fn draft(name: &str, status: Status) -> Draft {
        Draft {
            name: name.into(),
            company: "Torres SA".into(),
            credit_amount: Decimal::from(1500),
            term_months: 24,
            status,
        }
    }

    #[tokio::test]
    async fn creates_client() {
        let svc = Service::new(Memory::new());

        let client = svc
            .execute(CreateClient {
                draft: draft(" Ana ", Status::Pending),
            })
            .await
            .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&client.name), "Ana");
        assert_eq!(client.commission.get(), Decimal::from(30));
        assert!(!client.commission_paid);
        let stored = svc
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap();
        assert_eq!(stored, [client]);
    }

    #[tokio::test]
    async fn rejected_client_has_no_commission() {
        let svc = Service::new(Memory::new());

        let client = svc
            .execute(CreateClient {
                draft: draft("Ana", Status::Rejected),
            })
            .await
            .unwrap();

        assert_eq!(client.commission, Commission::ZERO);
    }

    #[tokio::test]
    async fn does_not_store_invalid_client() {
        let svc = Service::new(Memory::new());

        let err = svc
            .execute(CreateClient {
                draft: draft("", Status::Pending),
            })
            .await
            .unwrap_err();

        let ExecutionError::Validation(e) = err.as_ref() else {
            panic!("expected validation error, got: {err}");
        };
        assert_eq!(e.violations(), [Violation::InvalidName]);
        let stored = svc
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap();
        assert!(stored.is_empty());
    }
}
