//! Creation jig: acquires control points one by one with a live preview.
//!
//! The host feeds every cursor move through [`PointJig::preview`] and every
//! click through [`PointJig::accept`].  Polyline families keep acquiring
//! points until [`PointJig::finish`]; while they do, regeneration runs in
//! light mode so earlier segments' decorations are reused from the cache.

use crate::entity::{EntityCaps, EntityKind, SmartEntity};
use crate::error::{DraftError, Result};
use crate::geometry::point_at_direction;
use crate::notification::NotificationType;
use crate::params::style::Style;
use crate::primitives::Primitive;
use crate::regen::RegenMode;
use crate::types::Vector3;
use crate::xdata::{self, ExtendedDataRecord};

/// Point-acquisition state machine for creating one entity.
pub struct PointJig {
    entity: SmartEntity,
    /// A previewed-but-not-accepted point is currently the end point.
    candidate: Option<Vector3>,
    /// The last accepted point still sits in `end_point`; the next preview
    /// demotes it to a middle point.
    pending_commit: bool,
    complete: bool,
}

impl PointJig {
    /// Start a jig at the first picked point.
    pub fn new(kind: EntityKind, insertion: Vector3) -> Self {
        let mut entity = SmartEntity::new(kind);
        entity.insertion_point = insertion;
        entity.end_point = insertion;
        PointJig {
            entity,
            candidate: None,
            pending_commit: false,
            complete: false,
        }
    }

    /// Start a jig with parameters taken from a style.
    pub fn from_style(style: &Style, insertion: Vector3) -> Self {
        let mut jig = Self::new(style.kind(), insertion);
        jig.entity.params = style.instantiate();
        jig.entity.style_name = style.name().to_string();
        jig
    }

    /// The entity being built (read-only while the jig runs).
    pub fn entity(&self) -> &SmartEntity {
        &self.entity
    }

    /// Update the moving point and regenerate for display.
    ///
    /// Earlier segments of polyline families are not recomputed; only the
    /// segment ending at the candidate is.
    pub fn preview(&mut self, candidate: Vector3) -> Result<&[Primitive]> {
        if self.complete {
            return Err(DraftError::InvalidState(
                "jig already completed".to_string(),
            ));
        }
        if self.pending_commit {
            let fixed = self.entity.end_point;
            self.entity.middle_points.push(fixed);
            self.pending_commit = false;
        }
        self.entity.end_point = candidate;
        self.candidate = Some(candidate);
        let mode = if self.entity.middle_points.is_empty() {
            RegenMode::Full
        } else {
            RegenMode::LastSegmentOnly
        };
        self.entity.update_with_mode(mode)?;
        Ok(self.entity.entities())
    }

    /// Fix the current candidate.  Returns `true` while the jig keeps
    /// acquiring points (polyline families), `false` when it is complete.
    pub fn accept(&mut self) -> Result<bool> {
        if self.complete {
            return Err(DraftError::InvalidState(
                "jig already completed".to_string(),
            ));
        }
        if self.candidate.take().is_none() {
            return Err(DraftError::InvalidState(
                "no previewed point to accept".to_string(),
            ));
        }
        // the fixed point must keep the minimum distance to the previous
        // fixed point, not only to the insertion point
        let prev = self
            .entity
            .middle_points
            .last()
            .copied()
            .unwrap_or(self.entity.insertion_point);
        let min = self.entity.min_distance_scaled();
        if prev.distance_to(&self.entity.end_point) < min {
            self.entity.end_point = point_at_direction(prev, self.entity.end_point, prev, min);
            self.entity.record(
                NotificationType::Clamped,
                "accepted point clamped to minimum distance",
            );
            let mode = if self.entity.middle_points.is_empty() {
                RegenMode::Full
            } else {
                RegenMode::LastSegmentOnly
            };
            self.entity.update_with_mode(mode)?;
        }
        if self.entity.caps().contains(EntityCaps::MIDDLE_POINTS) {
            self.pending_commit = true;
            Ok(true)
        } else {
            self.complete = true;
            Ok(false)
        }
    }

    /// Complete the creation: one full regeneration, then the entity and
    /// its serialized record.
    pub fn finish(mut self) -> Result<(SmartEntity, ExtendedDataRecord)> {
        if self.entity.end_is_unset() {
            return Err(DraftError::InvalidState(
                "jig finished before an end point was acquired".to_string(),
            ));
        }
        self.entity.update_entities()?;
        let record = xdata::to_xdata(&self.entity);
        Ok((self.entity, record))
    }

    /// Abandon the creation; the pending entity is dropped.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_point_creation_flow() {
        let mut jig = PointJig::new(EntityKind::BreakLine, Vector3::ZERO);
        jig.preview(Vector3::new(60.0, 0.0, 0.0)).unwrap();
        jig.preview(Vector3::new(100.0, 0.0, 0.0)).unwrap();
        let more = jig.accept().unwrap();
        assert!(!more, "a break line takes exactly two points");
        let (entity, record) = jig.finish().unwrap();
        assert_eq!(entity.end_point, Vector3::new(100.0, 0.0, 0.0));
        assert!(!entity.entities().is_empty());
        assert!(!record.values.is_empty());
    }

    #[test]
    fn test_preview_without_accept_is_discardable() {
        let mut jig = PointJig::new(EntityKind::BreakLine, Vector3::ZERO);
        jig.preview(Vector3::new(80.0, 0.0, 0.0)).unwrap();
        jig.cancel();
    }

    #[test]
    fn test_finish_without_points_is_rejected() {
        let jig = PointJig::new(EntityKind::GroundLine, Vector3::ZERO);
        assert!(matches!(
            jig.finish(),
            Err(DraftError::InvalidState(_))
        ));
    }

    #[test]
    fn test_polyline_family_keeps_acquiring() {
        let mut jig = PointJig::new(EntityKind::GroundLine, Vector3::ZERO);
        jig.preview(Vector3::new(50.0, 0.0, 0.0)).unwrap();
        assert!(jig.accept().unwrap());
        jig.preview(Vector3::new(50.0, 50.0, 0.0)).unwrap();
        assert!(jig.accept().unwrap());
        jig.preview(Vector3::new(90.0, 50.0, 0.0)).unwrap();
        assert!(jig.accept().unwrap());

        let (entity, _) = jig.finish().unwrap();
        assert_eq!(entity.insertion_point, Vector3::ZERO);
        assert_eq!(
            entity.middle_points,
            vec![
                Vector3::new(50.0, 0.0, 0.0),
                Vector3::new(50.0, 50.0, 0.0)
            ]
        );
        assert_eq!(entity.end_point, Vector3::new(90.0, 50.0, 0.0));
    }

    #[test]
    fn test_light_preview_reuses_first_segment_decorations() {
        let mut jig = PointJig::new(EntityKind::GroundLine, Vector3::ZERO);
        jig.preview(Vector3::new(100.0, 0.0, 0.0)).unwrap();
        jig.accept().unwrap();
        let first_segment_before: Vec<Primitive> = jig
            .entity()
            .entities()
            .iter()
            .filter(|p| matches!(p, Primitive::Line(l) if l.start.y == 0.0))
            .cloned()
            .collect();
        assert!(!first_segment_before.is_empty());

        jig.preview(Vector3::new(100.0, 80.0, 0.0)).unwrap();
        let first_segment_after: Vec<Primitive> = jig
            .entity()
            .entities()
            .iter()
            .filter(|p| matches!(p, Primitive::Line(l) if l.start.y == 0.0))
            .cloned()
            .collect();
        assert_eq!(first_segment_before, first_segment_after);
    }

    #[test]
    fn test_accepted_points_keep_minimum_spacing() {
        let mut jig = PointJig::new(EntityKind::GroundLine, Vector3::ZERO);
        jig.preview(Vector3::new(10.0, 0.0, 0.0)).unwrap();
        jig.accept().unwrap();
        // second click lands 0.5 from the first fixed point (minimum is 2)
        jig.preview(Vector3::new(10.5, 0.0, 0.0)).unwrap();
        jig.accept().unwrap();
        let (entity, _) = jig.finish().unwrap();
        assert_eq!(entity.middle_points, vec![Vector3::new(10.0, 0.0, 0.0)]);
        assert!((entity.end_point.x - 12.0).abs() < 1e-9);
        assert!(entity.notifications().has_type(NotificationType::Clamped));
    }

    #[test]
    fn test_candidate_below_minimum_is_clamped() {
        let mut jig = PointJig::new(EntityKind::GroundLine, Vector3::ZERO);
        jig.preview(Vector3::new(1.0, 0.0, 0.0)).unwrap();
        jig.accept().unwrap();
        let (entity, _) = jig.finish().unwrap();
        assert!((entity.end_point.x - 2.0).abs() < 1e-9);
    }
}
