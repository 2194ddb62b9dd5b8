//! Extended-data persistence adapter.
//!
//! An entity's durable state is one ordered record of typed values under a
//! single application name.  The layout is positional: readers consume
//! fields by position and type, never by name.  A record that runs short or
//! carries a mistyped tail is recovered field by field against the schema
//! defaults; only an unknown kind tag or an unsupported record version is a
//! hard error.
//!
//! Record layout (version 1):
//!
//! 1.  `Integer16` — record version
//! 2.  `String`    — entity kind tag
//! 3.  `Integer16` — direction-reversed flag (0/1)
//! 4.  `Real`      — annotation scale
//! 5.  `String`    — style name
//! 6.  `Point3D`   — insertion point
//! 7.  `Point3D`   — end point
//! 8.  `Integer16` — middle-point count, then that many `Point3D`
//! 9.  `Integer16` — leader-point flag, then a `Point3D` when 1
//! 10. the kind's parameters in schema declaration order, one value each

use crate::entity::{EntityKind, SmartEntity};
use crate::error::{DraftError, Result};
use crate::notification::NotificationType;
use crate::params::schema::ParamKind;
use crate::params::ParamValue;
use crate::types::Vector3;

/// Application name the records are registered under.
pub const XDATA_APP_NAME: &str = "ESKDRAFT";

/// Current record layout version.
pub const XDATA_VERSION: i16 = 1;

/// One typed extended-data value.
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    String(String),
    Integer16(i16),
    Real(f64),
    Point3D(Vector3),
}

/// An ordered extended-data record for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Registered application name.
    pub application_name: String,
    /// Positional typed values.
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    /// An empty record under the crate's application name.
    pub fn new() -> Self {
        ExtendedDataRecord {
            application_name: XDATA_APP_NAME.to_string(),
            values: Vec::new(),
        }
    }
}

impl Default for ExtendedDataRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize an entity's durable state.
///
/// Derived geometry is never written; only control points, flags, scale and
/// parameters go into the record.
pub fn to_xdata(entity: &SmartEntity) -> ExtendedDataRecord {
    let mut record = ExtendedDataRecord::new();
    let v = &mut record.values;
    v.push(XDataValue::Integer16(XDATA_VERSION));
    v.push(XDataValue::String(entity.kind().tag().to_string()));
    v.push(XDataValue::Integer16(entity.direction_reversed as i16));
    v.push(XDataValue::Real(entity.annotation_scale()));
    v.push(XDataValue::String(entity.style_name.clone()));
    v.push(XDataValue::Point3D(entity.insertion_point));
    v.push(XDataValue::Point3D(entity.end_point));
    v.push(XDataValue::Integer16(entity.middle_points.len() as i16));
    for p in &entity.middle_points {
        v.push(XDataValue::Point3D(*p));
    }
    match entity.leader_point {
        Some(p) => {
            v.push(XDataValue::Integer16(1));
            v.push(XDataValue::Point3D(p));
        }
        None => v.push(XDataValue::Integer16(0)),
    }
    for (_, value) in entity.params.iter() {
        v.push(match value {
            ParamValue::Real(x) => XDataValue::Real(*x),
            ParamValue::Integer(x) => XDataValue::Integer16(*x),
            ParamValue::Text(x) => XDataValue::String(x.clone()),
            ParamValue::Flag(x) => XDataValue::Integer16(*x as i16),
        });
    }
    record
}

/// Reconstruct an entity from a record and regenerate its geometry.
///
/// Missing or mistyped fields past the kind tag fall back to their defaults
/// with a [`NotificationType::Recovered`] notification on the entity.
pub fn from_xdata(record: &ExtendedDataRecord) -> Result<SmartEntity> {
    if record.application_name != XDATA_APP_NAME {
        return Err(DraftError::XdataParse(format!(
            "unexpected application name '{}'",
            record.application_name
        )));
    }
    let mut cursor = Cursor::new(&record.values);

    let version = cursor
        .integer()
        .ok_or_else(|| DraftError::XdataParse("missing record version".to_string()))?;
    if version != XDATA_VERSION {
        return Err(DraftError::UnsupportedVersion(version));
    }
    let tag = cursor
        .string()
        .ok_or_else(|| DraftError::XdataParse("missing kind tag".to_string()))?;
    let kind = EntityKind::from_tag(&tag).ok_or(DraftError::UnknownKind(tag))?;

    let mut entity = SmartEntity::new(kind);
    let mut recovered = Vec::new();

    match cursor.integer() {
        Some(flag) => entity.direction_reversed = flag != 0,
        None => recovered.push("direction flag"),
    }
    match cursor.real() {
        Some(scale) => entity.set_annotation_scale(scale),
        None => recovered.push("annotation scale"),
    }
    match cursor.string() {
        Some(name) => entity.style_name = name,
        None => recovered.push("style name"),
    }
    match cursor.point() {
        Some(p) => entity.insertion_point = p,
        None => recovered.push("insertion point"),
    }
    match cursor.point() {
        Some(p) => entity.end_point = p,
        None => recovered.push("end point"),
    }
    match cursor.integer() {
        Some(count) => {
            for _ in 0..count.max(0) {
                match cursor.point() {
                    Some(p) => entity.middle_points.push(p),
                    None => {
                        recovered.push("middle points");
                        break;
                    }
                }
            }
        }
        None => recovered.push("middle-point count"),
    }
    match cursor.integer() {
        Some(1) => match cursor.point() {
            Some(p) => entity.leader_point = Some(p),
            None => recovered.push("leader point"),
        },
        Some(_) => {}
        None => recovered.push("leader flag"),
    }

    // parameters, positional in schema order; defaults already seeded
    for spec in entity.params.schema() {
        let value = match spec.kind {
            ParamKind::Real => cursor.real().map(ParamValue::Real),
            ParamKind::Integer => cursor.integer().map(ParamValue::Integer),
            ParamKind::Text => cursor.string().map(ParamValue::Text),
            ParamKind::Flag => cursor.integer().map(|v| ParamValue::Flag(v != 0)),
        };
        match value {
            // set() still guards range and finiteness; a bad stored value
            // falls back to the default like a missing one
            Some(value) => {
                if entity.params.set(spec.name, value).is_err() {
                    recovered.push(spec.name);
                }
            }
            None => recovered.push(spec.name),
        }
    }

    for field in recovered {
        entity.record(
            NotificationType::Recovered,
            format!("field '{field}' missing or mistyped, default used"),
        );
    }

    entity.update_entities()?;
    Ok(entity)
}

/// Positional reader over a value slice.
///
/// A mistyped value is consumed and reported missing, so the fields after
/// it stay aligned with the layout.
struct Cursor<'a> {
    values: &'a [XDataValue],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(values: &'a [XDataValue]) -> Self {
        Cursor { values, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a XDataValue> {
        let value = self.values.get(self.pos)?;
        self.pos += 1;
        Some(value)
    }

    fn integer(&mut self) -> Option<i16> {
        match self.next()? {
            XDataValue::Integer16(v) => Some(*v),
            _ => None,
        }
    }

    fn real(&mut self) -> Option<f64> {
        match self.next()? {
            XDataValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    fn string(&mut self) -> Option<String> {
        match self.next()? {
            XDataValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn point(&mut self) -> Option<Vector3> {
        match self.next()? {
            XDataValue::Point3D(v) => Some(*v),
            _ => None,
        }
    }
}
