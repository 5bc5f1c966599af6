//! # jsongo Codec
//!
//! Dynamic document values and their JSON representation.
//!
//! This crate provides:
//! - [`Value`], the sum type for any JSON value, with deep structural
//!   equality in which numbers compare by numeric value
//! - [`Map`], the insertion-ordered field map used for objects and documents
//! - [`IndexKey`], a canonical hashable form of a value for grouping
//! - JSON encoding of values and of whole document collections
//!
//! ## Usage
//!
//! ```
//! use jsongo_codec::{decode_collection, encode_collection, Value};
//!
//! let docs = decode_collection(br#"[{"name":"a","age":5}]"#).unwrap();
//! assert_eq!(docs[0].get("age"), Some(&Value::Float(5.0)));
//!
//! let bytes = encode_collection(&docs, false).unwrap();
//! assert_eq!(bytes, br#"[{"name":"a","age":5}]"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;
mod key;
mod value;

pub use error::{CodecError, CodecResult};
pub use json::{decode_collection, encode_collection, from_json, to_json};
pub use key::IndexKey;
pub use value::{Map, Value};
