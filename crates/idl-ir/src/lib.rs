//! idl-ir: Web IDL front end.
//!
//! Turns an IDL syntax tree into a typed, validated intermediate
//! representation, merges partial definitions across translation units and
//! flattens the result into the records the binding generators consume.
//!
//! ```text
//! AST JSON ──[idl_ast::from_slice]──► Node("File")
//!                                        │
//!                          [ir::builder::build_definitions]
//!                                        ▼
//!                                   Definitions ──[validate]──► filename check
//!                                        │
//!                       [merge::merge_units / resolve_inheritance]
//!                                        ▼
//!                                   Definitions ──[projection]──► generator JSON
//! ```

pub mod error;
pub mod ir;
pub mod logging;
pub mod merge;
pub mod projection;
pub mod seed;
pub mod validate;
pub mod visitor;

pub use error::{ErrorKind, IdlError};
pub use ir::builder::build_definitions;
pub use ir::Definitions;
pub use merge::merge_units;
pub use projection::Projection;
pub use seed::{SeedSource, SplitMix64};

use anyhow::{Context, Result};
use std::path::Path;

/// Options for reading a translation unit from disk.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Enforce the one-definition-per-file naming rule.
    pub check_filename: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            check_filename: true,
        }
    }
}

/// Build definitions from the JSON form of a `File` tree.
pub fn parse_definitions(json: &str) -> Result<Definitions> {
    let root = idl_ast::from_str(json).context("failed to decode syntax tree")?;
    build_definitions(&root).context("failed to build definitions")
}

/// Read one AST file and build its definitions.
///
/// The filename rule is checked against the root's `FILENAME` property when
/// the tree carries one, and against `path` otherwise.
///
/// # Example
/// ```no_run
/// use idl_ir::{read_idl_file, ReadOptions};
///
/// let defs = read_idl_file("Node.json", &ReadOptions::default()).unwrap();
/// println!("{} interfaces", defs.interfaces.len());
/// ```
pub fn read_idl_file(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Definitions> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let root = idl_ast::from_slice(&bytes)
        .with_context(|| format!("failed to decode syntax tree in {}", path.display()))?;
    let defs = build_definitions(&root)
        .with_context(|| format!("failed to build definitions from {}", path.display()))?;

    if options.check_filename {
        let source = defs.file_path.as_deref().map(Path::new).unwrap_or(path);
        validate::check_filename_convention(&defs, source)
            .with_context(|| format!("filename convention violated by {}", path.display()))?;
    }
    tracing::debug!(path = %path.display(), interfaces = defs.interfaces.len(), "read unit");
    Ok(defs)
}
