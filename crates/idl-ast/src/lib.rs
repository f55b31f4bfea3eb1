//! `idl-ast`: syntax-tree contract consumed by the `idl-ir` front end.
//!
//! The IDL lexer/parser lives outside this workspace. Whatever produces the
//! tree only has to honour a small contract, which this crate pins down:
//! - every node has a kind label (`class`), e.g. `Interface`, `Type`, `Key`
//! - an optional declared name
//! - named properties whose values are booleans, strings or string lists
//! - an ordered list of child nodes
//!
//! Trees travel between processes in a JSON wire form:
//!
//! ```text
//! { "class": "Interface", "name": "Foo",
//!   "properties": { "PARTIAL": true },
//!   "children": [ { "class": "Attribute", "name": "x", "children": [...] } ] }
//! ```
//!
//! `name`, `properties` and `children` may be omitted.

mod json;
mod node;

pub use json::{from_slice, from_str, AstError};
pub use node::{Node, PropertyValue};
