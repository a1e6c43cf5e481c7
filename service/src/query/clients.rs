//! [`Query`] collection related to the multiple [`Client`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Client,
    infra::{database, Database},
    read::client::{export, list},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries all the [`Client`]s in their insertion order.
pub type All = DatabaseQuery<By<Vec<Client>, ()>>;

/// Queries a [`list::Page`] of the [`Client`]s passing a [`list::Filter`].
#[derive(Clone, Debug)]
pub struct List(pub list::Selector);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Client>, ()>>,
        Ok = Vec<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector { arguments, filter } = selector;

        let clients = self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(arguments
            .paginate(filter.apply(&clients))
            .map(Client::clone))
    }
}

/// Queries all the [`Client`]s rendered as [`export::Row`]s.
#[derive(Clone, Copy, Debug)]
pub struct Table;

impl<Db> Query<Table> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Client>, ()>>,
        Ok = Vec<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<export::Row>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Table) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(export::Row::from)
            .collect())
    }
}
