//! Merge and inheritance over already built definitions.
//!
//! ```text
//! unit A ──┐
//! unit B ──┼─[merge_units]──► bases first, then partials in input order
//! unit C ──┘        │
//!                   ▼
//!            Definitions ──[resolve_inheritance]──► parents folded into children
//! ```
//!
//! Everything here mutates in place and is sequential. Interfaces that share
//! a partial group or an inheritance chain must be merged by one caller.

use crate::error::{invariant, Result};
use crate::ir::{Definitions, Interface};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

impl Interface {
    /// Fold a partial fragment into this interface.
    ///
    /// Members are appended in order; attributes with a name already present
    /// are kept alongside the existing one. Extended attributes follow
    /// [`ExtendedAttributes::absorb`](crate::ir::ExtendedAttributes::absorb).
    /// The fragment itself is kept in `partial_interfaces`.
    pub fn merge(&mut self, partial: Interface) {
        trace!(interface = %self.name, attributes = partial.attributes().len(), "merging partial");
        for attr in partial.attributes() {
            self.push_attribute(attr.clone());
        }
        self.constants.extend(partial.constants.iter().cloned());
        self.operations.extend(partial.operations.iter().cloned());
        self.constructors.extend(partial.constructors.iter().cloned());
        self.event_handlers.extend(partial.event_handlers.iter().cloned());
        self.extended_attributes.absorb(&partial.extended_attributes);
        if self.stringifier.is_none() {
            self.stringifier = partial.stringifier.clone();
        }
        self.partial_interfaces.push(partial);
    }

    /// Copy what `parent` provides and this interface does not override.
    ///
    /// Attributes and operations are shadowed by name only; a child `foo`
    /// hides every parent `foo` whatever the signatures. Copied members keep
    /// the parent's `defined_in`.
    pub fn inherit(&mut self, parent: &Interface) {
        self.event_handlers.extend(parent.event_handlers.iter().cloned());

        for attr in parent.attributes() {
            if !self.has_attribute(&attr.name) {
                self.push_attribute(attr.clone());
            }
        }

        let own: HashSet<Option<String>> = self.operations.iter().map(|op| op.name.clone()).collect();
        self.operations.extend(
            parent
                .operations
                .iter()
                .filter(|op| !own.contains(&op.name))
                .cloned(),
        );

        self.constants.extend(parent.constants.iter().cloned());
        self.extended_attributes.absorb(&parent.extended_attributes);
        if self.stringifier.is_none() {
            self.stringifier = parent.stringifier.clone();
        }
    }
}

impl Definitions {
    /// Fold another unit into this one.
    ///
    /// Non-partial interfaces and dictionaries are added (replacing a same
    /// name entry); partial ones merge into an existing base and fail when
    /// there is none. Enumerations and typedefs merge with same-name entries.
    /// Callbacks and includes are copied.
    pub fn update(&mut self, other: Definitions) -> Result<()> {
        for (name, iface) in other.interfaces {
            if !iface.is_partial {
                self.interfaces.insert(name, iface);
                continue;
            }
            match self.interfaces.get_mut(&name) {
                Some(base) => base.merge(iface),
                None => invariant!(
                    "Tried to merge partial interface for {}, but no existing interface by that name",
                    name
                ),
            }
        }

        for (name, dictionary) in other.dictionaries {
            if !dictionary.is_partial {
                self.dictionaries.insert(name, dictionary);
                continue;
            }
            match self.dictionaries.get_mut(&name) {
                Some(base) => base.members.extend(dictionary.members),
                None => invariant!(
                    "Tried to merge partial dictionary for {}, but no existing dictionary by that name",
                    name
                ),
            }
        }

        for (name, enumeration) in other.enumerations {
            match self.enumerations.get_mut(&name) {
                Some(existing) => existing.merge(&enumeration),
                None => {
                    self.enumerations.insert(name, enumeration);
                }
            }
        }

        for (name, typedef) in other.typedefs {
            match self.typedefs.get_mut(&name) {
                Some(existing) => existing.merge(&typedef),
                None => {
                    self.typedefs.insert(name, typedef);
                }
            }
        }

        self.callback_functions.extend(other.callback_functions);
        self.includes.extend(other.includes);
        if self.first_name.is_none() {
            self.first_name = other.first_name;
        }
        Ok(())
    }

    /// Split into (everything else, partial interfaces and dictionaries).
    pub fn split_partials(mut self) -> (Definitions, Definitions) {
        let mut partials = Definitions {
            file_path: self.file_path.clone(),
            ..Definitions::default()
        };
        let (partial_ifaces, bases): (IndexMap<_, _>, IndexMap<_, _>) = self
            .interfaces
            .into_iter()
            .partition(|(_, iface)| iface.is_partial);
        self.interfaces = bases;
        partials.interfaces = partial_ifaces;

        let (partial_dicts, bases): (IndexMap<_, _>, IndexMap<_, _>) = self
            .dictionaries
            .into_iter()
            .partition(|(_, dictionary)| dictionary.is_partial);
        self.dictionaries = bases;
        partials.dictionaries = partial_dicts;
        (self, partials)
    }

    /// Fold each interface's ancestors into it, root first.
    ///
    /// Parents missing from the table are left alone: they belong to a unit
    /// that was not part of this build. A parent cycle is an error.
    pub fn resolve_inheritance(&mut self) -> Result<()> {
        let mut done = HashSet::new();
        let names: Vec<String> = self.interfaces.keys().cloned().collect();
        for name in names {
            let mut chain = Vec::new();
            let mut current = Some(name);
            while let Some(name) = current {
                if done.contains(&name) {
                    break;
                }
                if chain.contains(&name) {
                    invariant!("Inheritance cycle through interface {}", name);
                }
                current = self.interfaces.get(&name).and_then(|i| i.parent.clone());
                chain.push(name);
            }
            // `chain` runs child to root; apply root first.
            for name in chain.into_iter().rev() {
                let parent = self
                    .interfaces
                    .get(&name)
                    .and_then(|i| i.parent.as_ref())
                    .and_then(|p| self.interfaces.get(p))
                    .cloned();
                if let Some(parent) = parent {
                    if let Some(child) = self.interfaces.get_mut(&name) {
                        debug!(interface = %name, parent = %parent.name, "inheriting");
                        child.inherit(&parent);
                    }
                }
                done.insert(name);
            }
        }
        Ok(())
    }
}

/// Merge many units: every base definition first, then partials in the
/// order given.
pub fn merge_units(units: impl IntoIterator<Item = Definitions>) -> Result<Definitions> {
    let mut merged = Definitions::default();
    let mut partials = Vec::new();
    for unit in units {
        let (bases, rest) = unit.split_partials();
        merged.update(bases)?;
        partials.push(rest);
    }
    for rest in partials {
        merged.update(rest)?;
    }
    debug!(interfaces = merged.interfaces.len(), "merged units");
    Ok(merged)
}
