//! Dircast-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across dircast:
//!
//! - **Typed IDs**: The catalog entry identifier newtype
//! - **Error Handling**: Common error types and result aliases
//! - **XML Utilities**: Text escaping for wire documents
//!
//! # Examples
//!
//! ```
//! use dircast_common::{EntryId, Error, Result};
//! use dircast_common::xml::escape_text;
//!
//! let id = EntryId::new(42);
//! assert_eq!(id.to_string(), "42");
//!
//! assert_eq!(escape_text("a & b"), "a &amp; b");
//!
//! fn example() -> Result<()> {
//!     Err(Error::no_such_object(7))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod xml;

pub use error::{Error, Result};
pub use ids::EntryId;
