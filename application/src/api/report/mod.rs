//! Report definitions.

mod commissions;
mod monthly;

pub use self::{commissions::Commissions, monthly::Monthly};
