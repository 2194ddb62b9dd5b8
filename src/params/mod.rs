//! Parameter model: typed values and ordered, schema-backed parameter sets.
//!
//! Every entity kind declares a static schema (see [`schema`]); a
//! [`ParamSet`] is always complete with respect to its schema, so
//! regeneration can read parameters with `?` and never needs fallback logic
//! of its own.

pub mod schema;
pub mod style;

use indexmap::IndexMap;

use crate::error::{DraftError, Result};
use schema::{ParamKind, ParamSpec};

/// A single typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Length / angle / factor, in paper units where applicable
    Real(f64),
    /// Small integer, also carries choice enums by discriminant
    Integer(i16),
    /// Text content
    Text(String),
    /// Boolean switch
    Flag(bool),
}

impl ParamValue {
    /// The kind this value satisfies
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Real(_) => ParamKind::Real,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Flag(_) => ParamKind::Flag,
        }
    }
}

/// Ordered, schema-complete parameter bag of one entity.
///
/// Iteration order is the schema declaration order; the persistence adapter
/// relies on this when writing the positional extended-data record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    schema: &'static [ParamSpec],
    values: IndexMap<&'static str, ParamValue>,
}

impl ParamSet {
    /// Build a set holding every schema default.
    pub fn from_schema(schema: &'static [ParamSpec]) -> Self {
        let values = schema
            .iter()
            .map(|spec| (spec.name, spec.default_value()))
            .collect();
        ParamSet { schema, values }
    }

    /// The schema this set was built from.
    pub fn schema(&self) -> &'static [ParamSpec] {
        self.schema
    }

    /// Raw value lookup.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Read a real parameter.
    pub fn real(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(ParamValue::Real(v)) => Ok(*v),
            Some(_) => Err(DraftError::ParameterType {
                name: name.to_string(),
                expected: "real",
            }),
            None => Err(DraftError::UnknownParameter(name.to_string())),
        }
    }

    /// Read an integer / choice parameter.
    pub fn integer(&self, name: &str) -> Result<i16> {
        match self.get(name) {
            Some(ParamValue::Integer(v)) => Ok(*v),
            Some(_) => Err(DraftError::ParameterType {
                name: name.to_string(),
                expected: "integer",
            }),
            None => Err(DraftError::UnknownParameter(name.to_string())),
        }
    }

    /// Read a text parameter.
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(ParamValue::Text(v)) => Ok(v),
            Some(_) => Err(DraftError::ParameterType {
                name: name.to_string(),
                expected: "text",
            }),
            None => Err(DraftError::UnknownParameter(name.to_string())),
        }
    }

    /// Read a flag parameter.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(ParamValue::Flag(v)) => Ok(*v),
            Some(_) => Err(DraftError::ParameterType {
                name: name.to_string(),
                expected: "flag",
            }),
            None => Err(DraftError::UnknownParameter(name.to_string())),
        }
    }

    /// Write a parameter.
    ///
    /// The name must exist in the schema and the value kind must match.
    /// Numeric values outside the schema range are clamped, not rejected —
    /// the same policy grips apply to geometry.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let spec = self
            .schema
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DraftError::UnknownParameter(name.to_string()))?;
        if value.kind() != spec.kind {
            return Err(DraftError::ParameterType {
                name: name.to_string(),
                expected: spec.kind.as_str(),
            });
        }
        let value = match value {
            ParamValue::Real(v) => {
                if !v.is_finite() {
                    return Err(DraftError::ParameterRange {
                        name: name.to_string(),
                        value: v,
                    });
                }
                ParamValue::Real(spec.clamp_real(v))
            }
            ParamValue::Integer(v) => ParamValue::Integer(spec.clamp_integer(v)),
            other => other,
        };
        self.values.insert(spec.name, value);
        Ok(())
    }

    /// Restore one parameter to its schema default.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let spec = self
            .schema
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DraftError::UnknownParameter(name.to_string()))?;
        self.values.insert(spec.name, spec.default_value());
        Ok(())
    }

    /// Iterate `(name, value)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Number of parameters (always the schema length).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A schema-complete set is never empty unless the schema is.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn ground_line_params() -> ParamSet {
        ParamSet::from_schema(schema::schema_for(EntityKind::GroundLine))
    }

    #[test]
    fn test_defaults_are_complete() {
        let set = ground_line_params();
        assert_eq!(set.len(), set.schema().len());
        assert_eq!(set.real("stroke_length").unwrap(), 8.0);
        assert_eq!(set.real("space").unwrap(), 10.0);
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut set = ground_line_params();
        set.set("stroke_length", ParamValue::Real(1e6)).unwrap();
        let spec = set
            .schema()
            .iter()
            .find(|s| s.name == "stroke_length")
            .unwrap();
        assert_eq!(set.real("stroke_length").unwrap(), spec.max.unwrap());
    }

    #[test]
    fn test_set_rejects_unknown_and_mismatched() {
        let mut set = ground_line_params();
        assert!(matches!(
            set.set("no_such", ParamValue::Real(1.0)),
            Err(DraftError::UnknownParameter(_))
        ));
        assert!(matches!(
            set.set("stroke_length", ParamValue::Text("x".into())),
            Err(DraftError::ParameterType { .. })
        ));
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut set = ground_line_params();
        assert!(matches!(
            set.set("space", ParamValue::Real(f64::NAN)),
            Err(DraftError::ParameterRange { .. })
        ));
    }

    #[test]
    fn test_reset_restores_default() {
        let mut set = ground_line_params();
        set.set("space", ParamValue::Real(20.0)).unwrap();
        set.reset("space").unwrap();
        assert_eq!(set.real("space").unwrap(), 10.0);
    }

    #[test]
    fn test_iteration_follows_schema_order() {
        let set = ground_line_params();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        let schema_names: Vec<&str> = set.schema().iter().map(|s| s.name).collect();
        assert_eq!(names, schema_names);
    }
}
