//! Read entities definitions.

pub mod client;
