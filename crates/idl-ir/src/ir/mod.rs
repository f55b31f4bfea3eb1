//! Intermediate representation of IDL definitions.
//!
//! The IR sits between the parser's syntax tree and the downstream code and
//! test generators. Cross references stay names: `parent`, `defined_in` and
//! `Typeref` are keys into name-keyed tables, resolved by whoever owns the
//! whole project.

mod definitions;
mod extended_attributes;
mod interface;
mod literal;
mod members;
mod numeric;
mod types;

pub use definitions::*;
pub use extended_attributes::*;
pub use interface::*;
pub use literal::*;
pub use members::*;
pub use numeric::*;
pub use types::*;

pub mod builder;
