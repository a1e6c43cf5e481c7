//! Postgres database client definitions.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Takes a [`connection::Pooled`] connection for every statement.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to take connections from.
    pool: connection::Pool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self { pool }
    }

    /// Takes a [`connection::Pooled`] connection out of the pool.
    pub(crate) async fn connection(
        &self,
    ) -> Result<connection::Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        conn.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}

/// Transactional Postgres database client.
///
/// All its clones share the same [`connection::Tx`].
#[derive(Clone, Debug)]
pub struct Tx {
    /// Open [`connection::Tx`], until committed.
    inner: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Opens a new [`Tx`] client with a connection of the provided [`NonTx`]
    /// client.
    ///
    /// # Errors
    ///
    /// If failed to open a transaction.
    pub async fn begin(
        client: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let conn = client.connection().await.map_err(tracerr::wrap!())?;
        let tx = connection::Tx::begin(conn)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Returns the open [`connection::Tx`] of this [`Tx`] client.
    async fn transaction(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        MutexGuard::try_map(self.inner.lock().await, Option::as_mut)
            .map_err(|_| postgres::Error::Committed)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }

    /// Commits this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already, or failed to commit it.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self
            .inner
            .lock()
            .await
            .take()
            .ok_or(postgres::Error::Committed)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.transaction().await.map_err(tracerr::wrap!())?;
        tx.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.transaction().await.map_err(tracerr::wrap!())?;
        tx.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.transaction().await.map_err(tracerr::wrap!())?;
        tx.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}
