//! Static parameter schemas.
//!
//! One table per entity kind, declared at compile time: parameter name,
//! type, default, numeric range and palette category.  This replaces the
//! runtime attribute scanning the original design used — the declarative
//! intent survives, the reflection does not.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::ParamValue;
use crate::entity::EntityKind;

/// Parameter value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Real,
    Integer,
    Text,
    Flag,
}

impl ParamKind {
    /// Kind name for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Real => "real",
            ParamKind::Integer => "integer",
            ParamKind::Text => "text",
            ParamKind::Flag => "flag",
        }
    }
}

/// Palette grouping of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCategory {
    /// Lengths, angles, choices controlling shape
    Geometry,
    /// Texts and their sizing
    Content,
}

/// Const-friendly default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Real(f64),
    Integer(i16),
    Text(&'static str),
    Flag(bool),
}

/// One declared parameter of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
    /// Lower bound for numeric kinds
    pub min: Option<f64>,
    /// Upper bound for numeric kinds
    pub max: Option<f64>,
    pub category: ParamCategory,
}

impl ParamSpec {
    /// Materialize the default as a runtime value.
    pub fn default_value(&self) -> ParamValue {
        match self.default {
            ParamDefault::Real(v) => ParamValue::Real(v),
            ParamDefault::Integer(v) => ParamValue::Integer(v),
            ParamDefault::Text(v) => ParamValue::Text(v.to_string()),
            ParamDefault::Flag(v) => ParamValue::Flag(v),
        }
    }

    /// Clamp a real value into the declared range.
    pub fn clamp_real(&self, value: f64) -> f64 {
        let lo = self.min.unwrap_or(f64::NEG_INFINITY);
        let hi = self.max.unwrap_or(f64::INFINITY);
        value.clamp(lo, hi)
    }

    /// Clamp an integer value into the declared range.
    pub fn clamp_integer(&self, value: i16) -> i16 {
        let v = self.clamp_real(value as f64);
        v as i16
    }
}

const fn real(
    name: &'static str,
    default: f64,
    min: f64,
    max: f64,
    category: ParamCategory,
) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Real,
        default: ParamDefault::Real(default),
        min: Some(min),
        max: Some(max),
        category,
    }
}

const fn choice(name: &'static str, default: i16, max: i16) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Integer,
        default: ParamDefault::Integer(default),
        min: Some(0.0),
        max: Some(max as f64),
        category: ParamCategory::Geometry,
    }
}

const fn text(name: &'static str, default: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Text,
        default: ParamDefault::Text(default),
        min: None,
        max: None,
        category: ParamCategory::Content,
    }
}

const fn flag(name: &'static str, default: bool, category: ParamCategory) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Flag,
        default: ParamDefault::Flag(default),
        min: None,
        max: None,
        category,
    }
}

use ParamCategory::{Content, Geometry};

/// Break line: overhang past both ends plus the zigzag break symbol.
pub const BREAK_LINE: &[ParamSpec] = &[
    choice("break_type", 0, 2),
    real("overhang", 2.0, 0.0, 10.0, Geometry),
    real("break_width", 5.0, 1.0, 20.0, Geometry),
    real("break_height", 10.0, 1.0, 13.0, Geometry),
];

/// Ground line: grouped slanted strokes under the main polyline.
pub const GROUND_LINE: &[ParamSpec] = &[
    choice("first_stroke_offset", 0, 2),
    real("stroke_length", 8.0, 1.0, 20.0, Geometry),
    real("stroke_offset", 4.0, 1.0, 20.0, Geometry),
    real("space", 10.0, 1.0, 50.0, Geometry),
    real("stroke_angle", 60.0, 30.0, 90.0, Geometry),
];

/// Water-proofing: offset dash runs with mitered corners.
pub const WATERPROOFING: &[ParamSpec] = &[
    choice("first_stroke_offset", 0, 2),
    real("stroke_length", 8.0, 1.0, 30.0, Geometry),
    real("stroke_offset", 2.0, 0.5, 20.0, Geometry),
    real("space", 6.0, 1.0, 50.0, Geometry),
    real("indent", 3.0, 0.5, 10.0, Geometry),
];

/// Letter line: repeated text runs along the polyline.
pub const LETTER_LINE: &[ParamSpec] = &[
    text("text", "A"),
    real("space", 40.0, 10.0, 200.0, Geometry),
    real("text_height", 3.5, 1.0, 20.0, Content),
    flag("horizontal", false, Content),
];

/// Fragment marker: frame around the marked fragment, leader and shelf.
pub const FRAGMENT_MARKER: &[ParamSpec] = &[
    choice("frame_type", 0, 1),
    real("radius", 10.0, 1.0, 50.0, Geometry),
    choice("shelf_position", 1, 1),
    real("shelf_length", 10.0, 2.0, 50.0, Geometry),
    text("designation", "1"),
    real("text_height", 3.5, 1.0, 20.0, Content),
];

/// Level mark: measurement arrow, riser, shelf and the level value.
pub const LEVEL_MARK: &[ParamSpec] = &[
    text("value", "0,000"),
    flag("show_plus", true, Content),
    real("text_height", 3.5, 1.0, 20.0, Content),
    real("arrow_size", 3.0, 1.0, 10.0, Geometry),
];

/// Node label: circle at the node, leader, shelf, node/sheet numbers.
pub const NODE_LABEL: &[ParamSpec] = &[
    real("radius", 5.0, 1.0, 30.0, Geometry),
    choice("shelf_position", 1, 1),
    real("shelf_length", 10.0, 2.0, 50.0, Geometry),
    text("node_number", "1"),
    text("sheet_number", ""),
    real("text_height", 3.5, 1.0, 20.0, Content),
];

/// View / section label: direction arrow plus designation.
pub const VIEW_LABEL: &[ParamSpec] = &[
    choice("label_type", 0, 1),
    text("designation", "A"),
    real("text_height", 5.0, 1.0, 20.0, Content),
    real("arrow_length", 8.0, 2.0, 20.0, Geometry),
    real("arrow_angle", 20.0, 5.0, 45.0, Geometry),
    choice("alignment", 0, 2),
    real("stroke_length", 8.0, 2.0, 20.0, Geometry),
];

/// Nodal leader: node circle, bent leader, shelf with texts.
pub const NODAL_LEADER: &[ParamSpec] = &[
    real("radius", 5.0, 1.0, 30.0, Geometry),
    real("shelf_length", 10.0, 2.0, 50.0, Geometry),
    text("text_top", "1"),
    text("text_bottom", ""),
    real("text_height", 3.5, 1.0, 20.0, Content),
];

/// Thick arrow: tapered-width polyline.
pub const THICK_ARROW: &[ParamSpec] = &[
    real("width", 0.5, 0.1, 5.0, Geometry),
    real("head_length", 3.0, 0.5, 10.0, Geometry),
    real("head_width", 1.5, 0.2, 10.0, Geometry),
];

/// Registry mapping entity kinds to their schema tables.
static SCHEMAS: Lazy<IndexMap<EntityKind, &'static [ParamSpec]>> = Lazy::new(|| {
    IndexMap::from([
        (EntityKind::BreakLine, BREAK_LINE),
        (EntityKind::GroundLine, GROUND_LINE),
        (EntityKind::Waterproofing, WATERPROOFING),
        (EntityKind::LetterLine, LETTER_LINE),
        (EntityKind::FragmentMarker, FRAGMENT_MARKER),
        (EntityKind::LevelMark, LEVEL_MARK),
        (EntityKind::NodeLabel, NODE_LABEL),
        (EntityKind::ViewLabel, VIEW_LABEL),
        (EntityKind::NodalLeader, NODAL_LEADER),
        (EntityKind::ThickArrow, THICK_ARROW),
    ])
});

/// Schema table of an entity kind.
pub fn schema_for(kind: EntityKind) -> &'static [ParamSpec] {
    SCHEMAS[&kind]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_schema() {
        for kind in EntityKind::ALL {
            assert!(!schema_for(kind).is_empty(), "{kind:?} schema missing");
        }
    }

    #[test]
    fn test_schema_names_are_unique() {
        for kind in EntityKind::ALL {
            let schema = schema_for(kind);
            for (i, a) in schema.iter().enumerate() {
                for b in &schema[i + 1..] {
                    assert_ne!(a.name, b.name, "{kind:?} duplicates {}", a.name);
                }
            }
        }
    }

    #[test]
    fn test_defaults_fit_their_ranges() {
        for kind in EntityKind::ALL {
            for spec in schema_for(kind) {
                if let ParamDefault::Real(v) = spec.default {
                    assert_eq!(spec.clamp_real(v), v, "{} default out of range", spec.name);
                }
                if let ParamDefault::Integer(v) = spec.default {
                    assert_eq!(spec.clamp_integer(v), v, "{} default out of range", spec.name);
                }
            }
        }
    }

    #[test]
    fn test_clamping() {
        let spec = &GROUND_LINE[1]; // stroke_length, 1..20
        assert_eq!(spec.clamp_real(0.0), 1.0);
        assert_eq!(spec.clamp_real(100.0), 20.0);
        assert_eq!(spec.clamp_real(8.0), 8.0);
    }
}
