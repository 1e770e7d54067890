//! Logged-in accounts and the client capabilities they expose.

mod backend;
mod registry;

pub use backend::{AccountClient, AccountConnector, LoggedIn};
pub use registry::AccountRegistry;
