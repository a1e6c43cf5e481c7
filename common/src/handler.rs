//! [`Handler`] abstractions.
//!
//! Commands, queries and store operations are all expressed as [`Handler`]s
//! of their argument type.

use std::future::Future;

/// Executable handler of `Args`.
pub trait Handler<Args = ()> {
    /// Type of a successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
