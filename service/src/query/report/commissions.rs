//! [`Commissions`] report definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Client,
    infra::{database, Database},
    read::client::summary,
    Query, Service,
};

/// [`Query`] to summarize pending and collected commissions of all the
/// [`Client`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Commissions;

impl<Db> Query<Commissions> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Client>, ()>>,
        Ok = Vec<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = summary::Commissions;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commissions) -> Result<Self::Ok, Self::Err> {
        let clients = self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(summary::Commissions::compute(&clients))
    }
}
