//! In-memory [`Database`] implementation.
//!
//! Keeps all the [`Client`]s in their insertion order. A [`Tx`] holds the
//! write lock for its whole lifetime and works on a staged copy, which is
//! published on [`Commit`] and discarded on drop.

use std::{future::Future, sync::Arc};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Memory`] client pre-populated with the provided
    /// [`Client`]s.
    #[must_use]
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self(NonTx {
            clients: Arc::new(RwLock::new(clients)),
        })
    }
}

/// Non-transactional in-memory storage.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Committed [`Client`]s.
    clients: Arc<RwLock<Vec<Client>>>,
}

/// Transactional in-memory storage.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Staged changes, if this [`Tx`] is not committed yet.
    staged: Arc<Mutex<Option<Staged>>>,
}

/// Staged changes of a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Exclusive access to the committed [`Client`]s.
    committed: OwnedRwLockWriteGuard<Vec<Client>>,

    /// Working copy of the [`Client`]s.
    clients: Vec<Client>,
}

/// In-memory database [`Error`].
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Tx`] is used after being committed.
    #[display("Transaction is already committed")]
    Committed,

    /// [`Client`] with the same ID is stored already.
    #[display("`Client(id: {_0})` already exists")]
    DuplicateId(#[error(not(source))] client::Id),
}

/// Access to the [`Client`]s kept by a [`Memory`] client.
pub trait Storage {
    /// Runs the provided function over the current [`Client`]s.
    ///
    /// # Errors
    ///
    /// If the [`Client`]s cannot be accessed.
    fn read<R>(
        &self,
        f: impl FnOnce(&[Client]) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Runs the provided mutating function over the current [`Client`]s.
    ///
    /// # Errors
    ///
    /// If the [`Client`]s cannot be accessed.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut Vec<Client>) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

impl Storage for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&[Client]) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&self.clients.read().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Vec<Client>) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&mut *self.clients.write().await))
    }
}

impl Storage for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&[Client]) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.write(|clients| f(clients)).await
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Vec<Client>) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut staged = self.staged.lock().await;
        let staged = staged
            .as_mut()
            .ok_or(Error::Committed)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&mut staged.clients))
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let committed = Arc::clone(&self.0.clients).write_owned().await;
        let clients = committed.clone();
        Ok(Memory(Tx {
            staged: Arc::new(Mutex::new(Some(Staged { committed, clients }))),
        }))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let Staged {
            mut committed,
            clients,
        } = self
            .0
            .staged
            .lock()
            .await
            .take()
            .ok_or(Error::Committed)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *committed = clients;
        Ok(())
    }
}

impl<T: Storage> Database<Select<By<Option<Client>, client::Id>>>
    for Memory<T>
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|clients| clients.iter().find(|c| c.id == id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Select<By<Vec<Client>, ()>>> for Memory<T> {
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .read(<[Client]>::to_vec)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Insert<Client>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|clients| {
                if clients.iter().any(|c| c.id == client.id) {
                    return Err(Error::DuplicateId(client.id));
                }
                clients.push(client);
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())?
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<T: Storage> Database<Update<Client>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|clients| {
                match clients.iter_mut().find(|c| c.id == client.id) {
                    Some(existing) => *existing = client,
                    None => clients.push(client),
                }
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Delete<By<Option<Client>, client::Id>>>
    for Memory<T>
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .write(|clients| {
                clients
                    .iter()
                    .position(|c| c.id == id)
                    .map(|idx| clients.remove(idx))
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T: Storage> Database<Delete<By<Vec<Client>, ()>>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Delete<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(Vec::clear)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<T> Database<Lock<By<Client, client::Id>>> for Memory<T> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // `Tx` owns the write lock already.
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{
        By, Commit, Delete, Insert, Select, Transact, Update,
    };

    use crate::{
        domain::{
            client::{self, CreationDateTime, Draft, Status},
            Client,
        },
        infra::Database as _,
    };

    use super::Memory;

    fn client(name: &str) -> Client {
        let details = Draft {
            name: name.into(),
            company: "Acme".into(),
            credit_amount: 1000.into(),
            term_months: 12,
            status: Status::Pending,
        }
        .validate()
        .unwrap();
        Client::new(details, CreationDateTime::now())
    }

    async fn names(db: &Memory) -> Vec<String> {
        db.execute(Select(By::<Vec<Client>, ()>::new(())))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name.into())
            .collect()
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let db = Memory::new();
        for name in ["b", "a", "c"] {
            db.execute(Insert(client(name))).await.unwrap();
        }

        assert_eq!(names(&db).await, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let (a, mut b) = (client("a"), client("b"));
        let db = Memory::with_clients(vec![a, b.clone()]);

        b.status = Status::Approved;
        db.execute(Update(b.clone())).await.unwrap();

        assert_eq!(names(&db).await, ["a", "b"]);
        let stored = db
            .execute(Select(By::<Option<Client>, _>::new(b.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(b));
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let a = client("a");
        let db = Memory::with_clients(vec![a.clone()]);

        assert!(db.execute(Insert(a)).await.is_err());
    }

    #[tokio::test]
    async fn publishes_only_committed() {
        let db = Memory::with_clients(vec![client("a")]);

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(client("b"))).await.unwrap();
        drop(tx);
        assert_eq!(names(&db).await, ["a"]);

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Delete(By::<Vec<Client>, ()>::new(()))).await.unwrap();
        tx.execute(Insert(client("c"))).await.unwrap();
        tx.execute(Commit).await.unwrap();
        assert_eq!(names(&db).await, ["c"]);

        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn deletes_by_id() {
        let (a, b) = (client("a"), client("b"));
        let db = Memory::with_clients(vec![a.clone(), b]);

        let removed = db
            .execute(Delete(By::<Option<Client>, client::Id>::new(a.id)))
            .await
            .unwrap();
        assert_eq!(removed.map(|c| c.id), Some(a.id));

        let removed = db
            .execute(Delete(By::<Option<Client>, client::Id>::new(a.id)))
            .await
            .unwrap();
        assert_eq!(removed, None);
        assert_eq!(names(&db).await, ["b"]);
    }
}
