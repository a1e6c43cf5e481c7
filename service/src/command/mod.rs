//! [`Command`] definition.

pub mod create_client;
pub mod delete_client;
pub mod import_clients;
pub mod mark_all_commissions_paid;
pub mod set_client_commission_paid;
pub mod transition_client_status;
pub mod update_client;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_client::CreateClient, delete_client::DeleteClient,
    import_clients::ImportClients,
    mark_all_commissions_paid::MarkAllCommissionsPaid,
    set_client_commission_paid::SetClientCommissionPaid,
    transition_client_status::TransitionClientStatus,
    update_client::UpdateClient,
};
