//! Structured document filename grammar.
//!
//! Quality-management documents carry their identity in the filename:
//! `{type}.{code}-{version}-{year} {title}.{ext}`. This crate maps between
//! that string form and a typed [`DocumentIdentity`]. It is deliberately free
//! of filesystem access so the grammar can be reused by any store adapter.
//!
//! # Overview
//!
//! - [`decode`] is total: every input yields a [`DecodedName`], falling back to
//!   `is_valid = false` with the raw filename kept as title.
//! - [`encode`] is the exact inverse concatenation for valid identities.
//! - [`DocumentIdentity::validate`] reports why an identity would not survive
//!   a round trip.
//!
//! # Example
//!
//! ```
//! use doc_name::{YearBounds, decode, encode};
//!
//! let decoded = decode(
//!     "ПП.К2-8.3-01-2022 Управление документацией.docx",
//!     YearBounds::default(),
//! );
//! assert!(decoded.is_valid);
//! assert_eq!(decoded.code, "К2-8.3");
//!
//! let identity = decoded.identity().expect("valid name");
//! assert_eq!(encode(&identity), "ПП.К2-8.3-01-2022 Управление документацией");
//! ```

mod codec;
mod error;
mod identity;
mod year;

pub use codec::{DecodedName, decode, decode_stem, encode, file_name, split_extension};
pub use error::IdentityError;
pub use identity::{DocumentIdentity, IdentityField};
pub use year::{DEFAULT_YEAR_MAX, DEFAULT_YEAR_MIN, YearBounds};
