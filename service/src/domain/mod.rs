//! Domain definitions.

pub mod client;

pub use self::client::Client;
