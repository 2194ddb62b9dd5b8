//! # eskdraft
//!
//! A pure Rust library of "smart" parametric drafting primitives complying
//! with ESKD/GOST: break lines, ground lines, water-proofing lines, letter
//! lines, fragment markers, level marks, node labels, view/section labels,
//! nodal leaders and thick arrows.
//!
//! Each primitive is a composite entity whose drawable geometry is a pure
//! function of a few control points, a typed parameter set and the
//! annotation scale.  The geometry is regenerated on every edit and on
//! load; only control points and parameters are persisted, as a positional
//! extended-data record.
//!
//! ## Features
//!
//! - Ten entity families with schema-backed, range-clamped parameters
//! - Deterministic regeneration into plain drawing primitives (polylines
//!   with bulges and widths, lines, text runs, background masks)
//! - Grip enumeration and a drag state machine with snapshot rollback
//! - A creation jig with light-mode preview for polyline families
//! - Named styles (copy-on-create parameter templates)
//! - Extended-data round-trip with best-effort recovery of damaged records
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eskdraft::{EntityKind, SmartEntity, Vector3};
//!
//! // Create a ground line and regenerate its geometry
//! let mut line = SmartEntity::new(EntityKind::GroundLine);
//! line.end_point = Vector3::new(100.0, 0.0, 0.0);
//! line.update_entities()?;
//!
//! // Hand the derived primitives to the host for display
//! for primitive in line.entities() {
//!     println!("{primitive:?}");
//! }
//!
//! // Persist: only the durable state goes into the record
//! let record = eskdraft::xdata::to_xdata(&line);
//! let restored = eskdraft::xdata::from_xdata(&record)?;
//! # Ok::<(), eskdraft::error::DraftError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`SmartEntity`] - control points + parameters + derived primitive cache
//! - [`regen`] - per-family regeneration functions, pure and deterministic
//! - [`grips`] - grip enumeration, drag sessions, toggles, bulk edits
//! - [`jig`] - creation-time point acquisition with live preview
//! - [`xdata`] - positional persistence records
//!
//! The host CAD runtime (rendering, transactions, snapping UI) stays
//! outside; it consumes primitives, offers grips and stores records.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod entity;
pub mod error;
pub mod geometry;
pub mod grips;
pub mod jig;
pub mod notification;
pub mod params;
pub mod primitives;
pub mod regen;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use entity::{EntityCaps, EntityKind, SmartEntity};
pub use error::{DraftError, Result};
pub use types::{Vector2, Vector3};

// Re-export the primitive output model
pub use primitives::{Line, Mask, PlineVertex, Polyline, Primitive, TextRun};

// Re-export parameter and style types
pub use params::style::{Style, StyleTable};
pub use params::{ParamSet, ParamValue};

// Re-export the interaction layer
pub use grips::{grips_for, BulkEdit, Grip, GripDrag, GripKind};
pub use jig::PointJig;
pub use notification::{Notification, NotificationCollection, NotificationType};

// Re-export persistence types
pub use xdata::{ExtendedDataRecord, XDataValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
