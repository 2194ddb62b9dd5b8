//! Named style templates.
//!
//! A style is a saved set of parameter defaults scoped to one entity kind.
//! Entities copy the values at creation time and keep independent storage
//! afterwards — there is no live binding from entity back to style.

use indexmap::IndexMap;

use super::{schema, ParamSet, ParamValue};
use crate::entity::EntityKind;
use crate::error::Result;

/// A parameter template for one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    name: String,
    kind: EntityKind,
    params: ParamSet,
}

impl Style {
    /// Create a style holding the kind's schema defaults.
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Style {
            name: name.into(),
            kind,
            params: ParamSet::from_schema(schema::schema_for(kind)),
        }
    }

    /// Style name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity kind this style applies to.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The template parameters.
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Override one template parameter (validated against the schema).
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<()> {
        self.params.set(name, value)
    }

    /// Builder-style override.
    pub fn with(mut self, name: &str, value: ParamValue) -> Result<Self> {
        self.params.set(name, value)?;
        Ok(self)
    }

    /// A fresh parameter set for a new entity (copy, not a binding).
    pub fn instantiate(&self) -> ParamSet {
        self.params.clone()
    }
}

/// Ordered, name-keyed style storage.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    entries: IndexMap<String, Style>,
}

impl StyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        StyleTable::default()
    }

    /// Insert or replace a style under its name.
    pub fn insert(&mut self, style: Style) -> Option<Style> {
        self.entries.insert(style.name.clone(), style)
    }

    /// Look up a style by name.
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.entries.get(name)
    }

    /// Remove a style by name.
    pub fn remove(&mut self, name: &str) -> Option<Style> {
        self.entries.shift_remove(name)
    }

    /// Styles applicable to one entity kind, in insertion order.
    pub fn for_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Style> {
        self.entries.values().filter(move |s| s.kind == kind)
    }

    /// All styles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.entries.values()
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
