//! Driven adapters implementing the domain ports.

pub mod fs;
