//! Business logic between the HTTP routes and the collaborators.
//!
//! - [`selection`] - Load, mutate and persist the blocked-country list
//! - [`shortcuts`] - Read and toggle the keyboard shortcut suppression flag

pub mod selection;
pub mod shortcuts;

pub use selection::{MutationReport, SelectionService, SelectionSnapshot};
pub use shortcuts::{ShortcutError, ShortcutService, ShortcutStatus};
