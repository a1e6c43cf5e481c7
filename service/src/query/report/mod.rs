//! Reporting [`Query`]s.
//!
//! [`Query`]: crate::Query

pub mod commissions;
pub mod monthly;

pub use self::{commissions::Commissions, monthly::Monthly};
