//! The smart entity model.
//!
//! A [`SmartEntity`] is a parametric primitive instance: a handful of
//! control points plus a typed parameter set.  Its drawable geometry is a
//! derived cache, rebuilt by [`SmartEntity::update_entities`] and never
//! persisted — on load the entity is reconstructed from extended data and
//! regenerated.

use bitflags::bitflags;

use crate::error::{DraftError, Result};
use crate::geometry::point_at_direction;
use crate::notification::{NotificationCollection, NotificationType};
use crate::params::style::Style;
use crate::params::{schema, ParamSet};
use crate::primitives::Primitive;
use crate::regen::{self, RegenContext, RegenMode};
use crate::types::Vector3;

/// Distance below which the end point counts as "not yet set".
pub(crate) const SENTINEL_EPSILON: f64 = 1e-6;

/// Smallest usable annotation scale.
const MIN_SCALE: f64 = 1e-3;

bitflags! {
    /// Editing capabilities of an entity kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntityCaps: u8 {
        /// Polyline-like: supports middle points and vertex add/remove grips
        const MIDDLE_POINTS = 1;
        /// Supports the reverse operation
        const REVERSIBLE = 2;
        /// Has a shelf side toggle
        const SHELF_TOGGLE = 4;
        /// Has a frame type toggle
        const FRAME_TOGGLE = 8;
        /// Has a text alignment toggle
        const ALIGNMENT_TOGGLE = 16;
        /// Has a free leader/text-position point
        const LEADER_POINT = 32;
    }
}

/// The ten supported entity families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    BreakLine,
    GroundLine,
    Waterproofing,
    LetterLine,
    FragmentMarker,
    LevelMark,
    NodeLabel,
    ViewLabel,
    NodalLeader,
    ThickArrow,
}

impl EntityKind {
    /// All kinds, in persistence-tag order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::BreakLine,
        EntityKind::GroundLine,
        EntityKind::Waterproofing,
        EntityKind::LetterLine,
        EntityKind::FragmentMarker,
        EntityKind::LevelMark,
        EntityKind::NodeLabel,
        EntityKind::ViewLabel,
        EntityKind::NodalLeader,
        EntityKind::ThickArrow,
    ];

    /// Stable tag used by the persistence adapter.
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::BreakLine => "BREAKLINE",
            EntityKind::GroundLine => "GROUNDLINE",
            EntityKind::Waterproofing => "WATERPROOFING",
            EntityKind::LetterLine => "LETTERLINE",
            EntityKind::FragmentMarker => "FRAGMENTMARKER",
            EntityKind::LevelMark => "LEVELMARK",
            EntityKind::NodeLabel => "NODELABEL",
            EntityKind::ViewLabel => "VIEWLABEL",
            EntityKind::NodalLeader => "NODALLEADER",
            EntityKind::ThickArrow => "THICKARROW",
        }
    }

    /// Parse a persistence tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Minimum permitted distance between adjacent control points, in paper
    /// units (multiplied by the entity scale before enforcement).
    pub fn min_distance(&self) -> f64 {
        match self {
            EntityKind::BreakLine => 20.0,
            EntityKind::GroundLine => 2.0,
            EntityKind::Waterproofing => 2.0,
            EntityKind::LetterLine => 2.0,
            EntityKind::FragmentMarker => 5.0,
            EntityKind::LevelMark => 1.0,
            EntityKind::NodeLabel => 5.0,
            EntityKind::ViewLabel => 5.0,
            EntityKind::NodalLeader => 5.0,
            EntityKind::ThickArrow => 0.5,
        }
    }

    /// Editing capabilities of this kind.
    pub fn caps(&self) -> EntityCaps {
        match self {
            EntityKind::BreakLine => EntityCaps::REVERSIBLE,
            EntityKind::GroundLine | EntityKind::Waterproofing | EntityKind::LetterLine => {
                EntityCaps::MIDDLE_POINTS | EntityCaps::REVERSIBLE
            }
            EntityKind::FragmentMarker => {
                EntityCaps::SHELF_TOGGLE | EntityCaps::FRAME_TOGGLE | EntityCaps::LEADER_POINT
            }
            EntityKind::LevelMark => EntityCaps::REVERSIBLE | EntityCaps::LEADER_POINT,
            EntityKind::NodeLabel => EntityCaps::SHELF_TOGGLE,
            EntityKind::ViewLabel => EntityCaps::REVERSIBLE | EntityCaps::ALIGNMENT_TOGGLE,
            EntityKind::NodalLeader => EntityCaps::MIDDLE_POINTS,
            EntityKind::ThickArrow => EntityCaps::REVERSIBLE,
        }
    }
}

/// A parametric drafting primitive.
///
/// Control points are public (like the geometric fields of any drawn
/// entity); mutations that must respect the minimum-distance invariant go
/// through [`SmartEntity::move_control_point`] and friends, and every state
/// change is followed by [`SmartEntity::update_entities`].
#[derive(Debug, Clone)]
pub struct SmartEntity {
    kind: EntityKind,
    /// First control point; doubles as the host block anchor.
    pub insertion_point: Vector3,
    /// Last control point of the primary axis.
    pub end_point: Vector3,
    /// Ordered intermediate control points (geometric order along the path).
    pub middle_points: Vec<Vector3>,
    /// Auxiliary annotation point for kinds with a leader/text grip.
    pub leader_point: Option<Vector3>,
    /// Direction flag flipped by the reverse operation.
    pub direction_reversed: bool,
    /// Style the parameters were copied from (informational only).
    pub style_name: String,
    /// The typed parameter bag.
    pub params: ParamSet,
    annotation_scale: f64,
    entities: Vec<Primitive>,
    decor_cache: Vec<Vec<Primitive>>,
    notifications: NotificationCollection,
}

impl SmartEntity {
    /// Create an empty entity of a kind with schema-default parameters.
    ///
    /// Both axis points start at the origin; the end point counts as unset
    /// until the jig or a caller moves it.
    pub fn new(kind: EntityKind) -> Self {
        SmartEntity {
            kind,
            insertion_point: Vector3::ZERO,
            end_point: Vector3::ZERO,
            middle_points: Vec::new(),
            leader_point: None,
            direction_reversed: false,
            style_name: String::new(),
            params: ParamSet::from_schema(schema::schema_for(kind)),
            annotation_scale: 1.0,
            entities: Vec::new(),
            decor_cache: Vec::new(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Create an entity with parameters copied from a style.
    pub fn from_style(style: &Style) -> Self {
        let mut entity = Self::new(style.kind());
        entity.params = style.instantiate();
        entity.style_name = style.name().to_string();
        entity
    }

    /// Entity kind.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Editing capabilities.
    pub fn caps(&self) -> EntityCaps {
        self.kind.caps()
    }

    /// Annotation scale (paper-to-model factor).
    pub fn annotation_scale(&self) -> f64 {
        self.annotation_scale
    }

    /// Set the annotation scale; values below a small floor are clamped.
    pub fn set_annotation_scale(&mut self, scale: f64) {
        self.annotation_scale = if scale.is_finite() {
            scale.max(MIN_SCALE)
        } else {
            1.0
        };
    }

    /// Effective scale applied to all paper-unit style lengths.
    pub fn full_scale(&self) -> f64 {
        self.annotation_scale
    }

    /// Minimum distance between adjacent control points in model units.
    pub fn min_distance_scaled(&self) -> f64 {
        self.kind.min_distance() * self.full_scale()
    }

    /// Whether the end point is still the creation sentinel.
    pub fn end_is_unset(&self) -> bool {
        self.insertion_point.distance_to(&self.end_point) < SENTINEL_EPSILON
    }

    /// Total number of control points on the primary axis.
    pub fn control_point_count(&self) -> usize {
        2 + self.middle_points.len()
    }

    /// Control point by axis index (0 = insertion, last = end).
    pub fn control_point(&self, index: usize) -> Option<Vector3> {
        let count = self.control_point_count();
        match index {
            0 => Some(self.insertion_point),
            i if i + 1 == count => Some(self.end_point),
            i if i < count => Some(self.middle_points[i - 1]),
            _ => None,
        }
    }

    /// World points offered to the host's snapping subsystem.
    pub fn osnap_points(&self) -> impl Iterator<Item = Vector3> + '_ {
        std::iter::once(self.insertion_point)
            .chain(std::iter::once(self.end_point))
            .chain(self.middle_points.iter().copied())
    }

    /// Derived drawing primitives for the current state.
    pub fn entities(&self) -> &[Primitive] {
        &self.entities
    }

    /// Notifications recorded by the last operations.
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Take and clear the recorded notifications.
    pub fn take_notifications(&mut self) -> NotificationCollection {
        std::mem::take(&mut self.notifications)
    }

    /// Record a notification against this entity.
    pub(crate) fn record(&mut self, kind: NotificationType, message: impl Into<String>) {
        self.notifications.notify(kind, message);
    }

    /// Move one control point to `target`, clamping against both neighbours
    /// so the minimum-distance invariant holds.  Returns the applied
    /// (possibly clamped) position.
    pub fn move_control_point(&mut self, index: usize, target: Vector3) -> Result<Vector3> {
        let count = self.control_point_count();
        if index >= count {
            return Err(DraftError::GripIndex { index, count });
        }
        let min = self.min_distance_scaled();
        let mut applied = target;
        for neighbour_index in [index.checked_sub(1), Some(index + 1)]
            .into_iter()
            .flatten()
        {
            if let Some(neighbour) = self.control_point(neighbour_index) {
                let d = neighbour.distance_to(&applied);
                if d < min {
                    applied = point_at_direction(neighbour, applied, neighbour, min);
                    self.notifications.notify(
                        NotificationType::Clamped,
                        format!("control point {index} clamped to minimum distance"),
                    );
                }
            }
        }
        match index {
            0 => self.insertion_point = applied,
            i if i + 1 == count => self.end_point = applied,
            i => self.middle_points[i - 1] = applied,
        }
        Ok(applied)
    }

    /// Insert a control point at axis `index`, splitting the path there.
    ///
    /// Index 0 promotes the new point to the insertion point (the old one
    /// becomes the first middle point, and the block anchor moves); index
    /// `control_point_count()` promotes it to the new end point.
    pub fn insert_control_point(&mut self, index: usize, point: Vector3) -> Result<()> {
        let count = self.control_point_count();
        if index > count {
            return Err(DraftError::GripIndex { index, count });
        }
        if index == 0 {
            let old = self.insertion_point;
            self.middle_points.insert(0, old);
            self.insertion_point = point;
        } else if index == count {
            let old = self.end_point;
            self.middle_points.push(old);
            self.end_point = point;
        } else {
            self.middle_points.insert(index - 1, point);
        }
        Ok(())
    }

    /// Remove the control point at axis `index`.
    ///
    /// Removing the insertion point promotes the next point (and moves the
    /// block anchor); removing the end point demotes to the previous one.
    /// The insertion and end points are always retained: removal with only
    /// two control points left is rejected.
    pub fn remove_control_point(&mut self, index: usize) -> Result<Vector3> {
        let count = self.control_point_count();
        if index >= count {
            return Err(DraftError::GripIndex { index, count });
        }
        if count <= 2 {
            return Err(DraftError::InvalidState(
                "cannot remove below two control points".to_string(),
            ));
        }
        let removed;
        if index == 0 {
            removed = self.insertion_point;
            self.insertion_point = self.middle_points.remove(0);
        } else if index + 1 == count {
            removed = self.end_point;
            // count > 2 guarantees a middle point exists
            self.end_point = self.middle_points.pop().unwrap_or(self.insertion_point);
        } else {
            removed = self.middle_points.remove(index - 1);
        }
        Ok(removed)
    }

    /// Swap which end is semantically first without changing the visual
    /// geometry.  Applying twice restores the original state.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.insertion_point, &mut self.end_point);
        self.middle_points.reverse();
        self.direction_reversed = !self.direction_reversed;
    }

    /// Rebuild the derived primitives from the current state.
    ///
    /// On failure the previous primitives are kept (stale but visible) and
    /// the error is returned for the caller to surface.  A proxy-entity
    /// condition is swallowed with a notification, matching host behaviour.
    pub fn update_entities(&mut self) -> Result<()> {
        self.update_with_mode(RegenMode::Full)
    }

    /// Regeneration entry point with an explicit mode (the jig uses
    /// [`RegenMode::LastSegmentOnly`] while points are being acquired).
    pub(crate) fn update_with_mode(&mut self, mode: RegenMode) -> Result<()> {
        let min = self.min_distance_scaled();

        // Special case 1: end point not acquired yet; draw a preview shape
        // at the default offset without persisting it.
        let end = if self.end_is_unset() {
            self.insertion_point + Vector3::UNIT_X * min
        } else {
            // Special case 2: end point inside the minimum distance; clamp
            // along the attempted direction and persist the clamped value.
            let d = self.insertion_point.distance_to(&self.end_point);
            if d < min {
                let clamped =
                    point_at_direction(self.insertion_point, self.end_point, self.insertion_point, min);
                self.end_point = clamped;
                self.notifications.notify(
                    NotificationType::Clamped,
                    "end point clamped to minimum distance",
                );
                clamped
            } else {
                self.end_point
            }
        };

        let ctx = RegenContext {
            kind: self.kind,
            insertion: self.insertion_point,
            end,
            middles: &self.middle_points,
            leader: self.leader_point,
            params: &self.params,
            scale: self.full_scale(),
            reversed: self.direction_reversed,
            mode,
            decor_cache: &self.decor_cache,
        };
        match regen::regenerate(&ctx) {
            Ok(output) => {
                self.entities = output.primitives;
                self.decor_cache = output.decor;
                Ok(())
            }
            Err(DraftError::ProxyEntity) => {
                self.notifications.notify(
                    NotificationType::ProxySkipped,
                    "regeneration skipped: proxy entity",
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_line(end_x: f64) -> SmartEntity {
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        e.end_point = Vector3::new(end_x, 0.0, 0.0);
        e
    }

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EntityKind::from_tag("NOPE"), None);
    }

    #[test]
    fn test_end_sentinel() {
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        assert!(e.end_is_unset());
        e.end_point = Vector3::new(50.0, 0.0, 0.0);
        assert!(!e.end_is_unset());
    }

    #[test]
    fn test_minimum_clamp_persists_end_point() {
        let mut e = ground_line(1.0);
        e.update_entities().unwrap();
        assert!((e.end_point.x - 2.0).abs() < 1e-9);
        assert!(e.end_point.y.abs() < 1e-9);
        assert!(e
            .notifications()
            .has_type(NotificationType::Clamped));
    }

    #[test]
    fn test_preview_end_is_not_persisted() {
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        e.update_entities().unwrap();
        assert!(e.end_is_unset());
        assert!(!e.entities().is_empty());
    }

    #[test]
    fn test_control_point_indexing() {
        let mut e = ground_line(100.0);
        e.middle_points.push(Vector3::new(50.0, 10.0, 0.0));
        assert_eq!(e.control_point(0), Some(e.insertion_point));
        assert_eq!(e.control_point(1), Some(Vector3::new(50.0, 10.0, 0.0)));
        assert_eq!(e.control_point(2), Some(e.end_point));
        assert_eq!(e.control_point(3), None);
    }

    #[test]
    fn test_move_control_point_clamps_to_neighbour() {
        let mut e = ground_line(100.0);
        // try to drop the end point onto the insertion point
        let applied = e
            .move_control_point(1, Vector3::new(0.5, 0.0, 0.0))
            .unwrap();
        assert!((applied.x - 2.0).abs() < 1e-9);
        assert_eq!(e.end_point, applied);
    }

    #[test]
    fn test_insert_promotes_insertion_and_end() {
        let mut e = ground_line(100.0);
        e.insert_control_point(0, Vector3::new(-10.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(e.insertion_point, Vector3::new(-10.0, 0.0, 0.0));
        assert_eq!(e.middle_points, vec![Vector3::ZERO]);

        let count = e.control_point_count();
        e.insert_control_point(count, Vector3::new(120.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(e.end_point, Vector3::new(120.0, 0.0, 0.0));
        assert_eq!(e.middle_points.last(), Some(&Vector3::new(100.0, 0.0, 0.0)));
    }

    #[test]
    fn test_remove_promotes_neighbours() {
        let mut e = ground_line(100.0);
        e.middle_points.push(Vector3::new(50.0, 0.0, 0.0));
        e.remove_control_point(0).unwrap();
        assert_eq!(e.insertion_point, Vector3::new(50.0, 0.0, 0.0));
        assert_eq!(e.control_point_count(), 2);
        assert!(matches!(
            e.remove_control_point(0),
            Err(DraftError::InvalidState(_))
        ));
    }

    #[test]
    fn test_reverse_is_involution() {
        let mut e = ground_line(100.0);
        e.middle_points.push(Vector3::new(30.0, 5.0, 0.0));
        e.middle_points.push(Vector3::new(60.0, -5.0, 0.0));
        let original = (e.insertion_point, e.end_point, e.middle_points.clone());

        e.reverse();
        assert!(e.direction_reversed);
        assert_eq!(e.insertion_point, Vector3::new(100.0, 0.0, 0.0));
        assert_eq!(e.middle_points[0], Vector3::new(60.0, -5.0, 0.0));

        e.reverse();
        assert!(!e.direction_reversed);
        assert_eq!(
            (e.insertion_point, e.end_point, e.middle_points.clone()),
            original
        );
    }

    #[test]
    fn test_osnap_points_order() {
        let mut e = ground_line(100.0);
        e.middle_points.push(Vector3::new(50.0, 0.0, 0.0));
        let points: Vec<Vector3> = e.osnap_points().collect();
        assert_eq!(points[0], e.insertion_point);
        assert_eq!(points[1], e.end_point);
        assert_eq!(points[2], Vector3::new(50.0, 0.0, 0.0));
    }

    #[test]
    fn test_scale_floor() {
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        e.set_annotation_scale(0.0);
        assert!(e.full_scale() > 0.0);
        e.set_annotation_scale(f64::NAN);
        assert_eq!(e.full_scale(), 1.0);
    }
}
