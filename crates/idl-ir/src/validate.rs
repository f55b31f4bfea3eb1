//! Filename convention for translation units read from disk.
//!
//! A file that defines an interface or a dictionary defines exactly one,
//! named after the file (`ReadableStream` in `ReadableStream.idl` or
//! `readable_stream.idl`). Partial definitions may live anywhere. Files
//! holding only enums, typedefs or callbacks have no naming rule.

use crate::error::{IdlError, Result};
use crate::ir::Definitions;
use heck::ToSnakeCase;
use std::path::Path;

pub fn check_filename_convention(defs: &Definitions, path: &Path) -> Result<()> {
    let targets: Vec<(&str, bool)> = defs
        .interfaces
        .values()
        .map(|iface| (iface.name.as_str(), iface.is_partial))
        .chain(
            defs.dictionaries
                .values()
                .map(|dictionary| (dictionary.name.as_str(), dictionary.is_partial)),
        )
        .collect();

    let (name, is_partial) = match targets.as_slice() {
        [] => {
            let others =
                defs.enumerations.len() + defs.typedefs.len() + defs.callback_functions.len();
            if others == 0 {
                return Err(IdlError::FilenameConvention(format!(
                    "No definition found in {}. (Missing semicolon?)",
                    path.display()
                )));
            }
            return Ok(());
        }
        [target] => *target,
        _ => {
            return Err(IdlError::FilenameConvention(format!(
                "Expected exactly 1 definition in file {}, but found {}",
                path.display(),
                targets.len()
            )))
        }
    };
    if is_partial {
        return Ok(());
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    if name != stem && name.to_snake_case() != stem {
        return Err(IdlError::FilenameConvention(format!(
            "Definition name \"{}\" disagrees with IDL file basename \"{}\".",
            name, stem
        )));
    }
    Ok(())
}
