//! # PatchWise Schema
//!
//! Declarative response shapes and the validation gate that sits between
//! external capability output and the typed stores.
//!
//! ## Overview
//!
//! Everything a capability backend returns arrives as untrusted
//! [`serde_json::Value`]. Each pipeline declares the shape it expects as a
//! `const` [`Shape`] tree and runs [`validate`] before any typed decoding
//! takes place. Validation reports the first violation it finds, with a
//! dotted path into the document, so a malformed reply is rejected as a
//! whole and nothing is committed downstream.
//!
//! Extra fields are always permitted. Shapes describe what must be present,
//! not everything that may be.
//!
//! ## Example
//!
//! ```
//! use patchwise_schema::{validate, Field, Shape};
//! use serde_json::json;
//!
//! const REPLY: Shape = Shape::Object(&[
//!     Field { name: "summary", shape: Shape::String },
//!     Field { name: "open", shape: Shape::Bool },
//! ]);
//!
//! let value = json!({ "summary": "two services exposed", "open": true });
//! assert!(validate(&value, &REPLY).is_ok());
//!
//! let value = json!({ "summary": "missing the flag" });
//! assert!(validate(&value, &REPLY).is_err());
//! ```

pub mod shape;
pub mod validate;

pub use shape::{Field, Shape};
pub use validate::{validate, SchemaViolation};

/// Current version of the schema library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::shape::{Field, Shape};
    pub use crate::validate::{validate, SchemaViolation};
}
