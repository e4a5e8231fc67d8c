//! Quality-management document store.
//!
//! Documents live in three filesystem zones (drafts, active, archive) and the
//! active zone is summarised by numbered registry snapshots. The crate follows
//! a hexagonal layout:
//!
//! - [`domain`] holds the scanner, similarity matcher, publish transaction and
//!   registry service, talking to storage only through [`domain::ports`].
//! - [`outbound`] implements those ports on top of `cap-std`.
//! - [`inbound`] exposes the store as a command-line interface.
//! - [`store`] wires adapters to services and serializes mutations.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod store;

pub use config::{ConfigError, StoreSettings};
pub use store::DocumentStore;
