//! [`Monthly`] report definition.

use common::{
    operations::{By, Select},
    YearMonth,
};
use tracerr::Traced;

use crate::{
    domain::Client,
    infra::{database, Database},
    read::client::summary,
    Query, Service,
};

/// [`Query`] to summarize the [`Client`]s created in a given month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Monthly {
    /// Month to summarize.
    pub month: YearMonth,
}

impl<Db> Query<Monthly> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Client>, ()>>,
        Ok = Vec<Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = summary::Monthly;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Monthly { month }: Monthly,
    ) -> Result<Self::Ok, Self::Err> {
        let clients = self
            .database()
            .execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(summary::Monthly::compute(&clients, month))
    }
}
