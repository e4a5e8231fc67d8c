//! Inbound adapters translating operator requests into store calls.
//!
//! The command-line interface in [`cli`] is the only transport; it talks to
//! [`crate::store::DocumentStore`] and never to the filesystem adapters.

pub mod cli;
