//! Interactive workflow: the menu loop and its operations.

mod controller;
mod menu;

pub use controller::{Workflow, WorkflowError};
pub use menu::{MenuChoice, SessionSelection};
