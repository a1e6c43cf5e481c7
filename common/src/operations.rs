//! Store operations.
//!
//! A store supports an operation by implementing [`Handler`] for it, so
//! every operation a caller needs shows up in its trait bounds.

use std::marker::PhantomData;

use crate::Handler;

/// Stores a new record.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites a stored record having the same identity.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes the records a [`By`] selector points to.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads the records a [`By`] selector points to.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Holds a record exclusively until the end of the current transaction.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Starts a transaction, producing a [`Transacted`] store.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Store produced by [`Transact`]ing the store `T`.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Makes all the changes of a [`Transacted`] store visible at once.
///
/// A [`Transacted`] store dropped without being committed discards its
/// changes.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W`hat to operate on `B`y a key.
///
/// `W` tells the shape of the result, like `Option<T>` for a single record or
/// `Vec<T>` for many of them.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Shape of the result.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector with the provided key.
    #[must_use]
    pub const fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
