//! Grip enumeration and the drag state machine.
//!
//! Grips are transient value objects, re-created on every enumeration and
//! referring to the entity by control-point index only.  A drag gesture is
//! a [`GripDrag`] session: `start` snapshots the control state, `moved`
//! applies the (clamped) mutation and regenerates, `end` commits and hands
//! the serialized record back to the host, `abort` restores the snapshot
//! exactly.
//!
//! Mode toggles (shelf side, frame shape, text alignment, reverse) are not
//! drags; they commit immediately through [`apply_toggle`].

use crate::entity::{EntityCaps, SmartEntity};
use crate::error::{DraftError, Result};
use crate::params::ParamValue;
use crate::regen::fragment_marker::FrameType;
use crate::regen::view_label::TextAlignment;
use crate::regen::ShelfPosition;
use crate::types::Vector3;
use crate::xdata::{self, ExtendedDataRecord};

/// What a grip does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripKind {
    /// Drag one axis control point (0 = insertion, last = end).
    Vertex(usize),
    /// Insert a control point at this axis index and drag it.
    AddVertex(usize),
    /// Delete the middle control point at this axis index.
    RemoveVertex(usize),
    /// Drag the free leader / text-position point.
    Leader,
    /// Swap the semantic direction.
    Reverse,
    /// Flip the shelf side.
    ShelfToggle,
    /// Switch the frame shape.
    FrameToggle,
    /// Cycle the text alignment.
    AlignmentToggle,
}

/// A transient grip handle offered to the host UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grip {
    pub kind: GripKind,
    pub position: Vector3,
}

/// Enumerate the grips for the entity's current state and capabilities.
pub fn grips_for(entity: &SmartEntity) -> Vec<Grip> {
    let caps = entity.caps();
    let count = entity.control_point_count();
    let mut grips = Vec::new();

    for index in 0..count {
        if let Some(position) = entity.control_point(index) {
            grips.push(Grip {
                kind: GripKind::Vertex(index),
                position,
            });
        }
    }
    if caps.contains(EntityCaps::MIDDLE_POINTS) {
        // one insertion grip in the middle of every segment
        for index in 1..count {
            let (Some(a), Some(b)) = (entity.control_point(index - 1), entity.control_point(index))
            else {
                continue;
            };
            grips.push(Grip {
                kind: GripKind::AddVertex(index),
                position: a.midpoint(&b),
            });
        }
        // removal handles on the middle points themselves
        for index in 1..count.saturating_sub(1) {
            if let Some(position) = entity.control_point(index) {
                grips.push(Grip {
                    kind: GripKind::RemoveVertex(index),
                    position,
                });
            }
        }
    }
    let mid = entity.insertion_point.midpoint(&entity.end_point);
    if caps.contains(EntityCaps::LEADER_POINT) {
        grips.push(Grip {
            kind: GripKind::Leader,
            position: entity.leader_point.unwrap_or(mid),
        });
    }
    if caps.contains(EntityCaps::REVERSIBLE) {
        grips.push(Grip {
            kind: GripKind::Reverse,
            position: mid,
        });
    }
    if caps.contains(EntityCaps::SHELF_TOGGLE) {
        grips.push(Grip {
            kind: GripKind::ShelfToggle,
            position: entity.end_point,
        });
    }
    if caps.contains(EntityCaps::FRAME_TOGGLE) {
        grips.push(Grip {
            kind: GripKind::FrameToggle,
            position: entity.insertion_point,
        });
    }
    if caps.contains(EntityCaps::ALIGNMENT_TOGGLE) {
        grips.push(Grip {
            kind: GripKind::AlignmentToggle,
            position: entity.insertion_point,
        });
    }
    grips
}

/// Apply an immediate-commit grip (a mode toggle or a vertex removal) and
/// regenerate.  Draggable grips are rejected; they go through [`GripDrag`].
pub fn apply_toggle(entity: &mut SmartEntity, kind: GripKind) -> Result<()> {
    let caps = entity.caps();
    match kind {
        GripKind::RemoveVertex(index) => {
            if !caps.contains(EntityCaps::MIDDLE_POINTS) {
                return Err(DraftError::GripUnsupported("remove vertex".to_string()));
            }
            entity.remove_control_point(index)?;
        }
        GripKind::Reverse => {
            if !caps.contains(EntityCaps::REVERSIBLE) {
                return Err(DraftError::GripUnsupported("reverse".to_string()));
            }
            entity.reverse();
        }
        GripKind::ShelfToggle => {
            if !caps.contains(EntityCaps::SHELF_TOGGLE) {
                return Err(DraftError::GripUnsupported("shelf toggle".to_string()));
            }
            let side = ShelfPosition::from(entity.params.integer("shelf_position")?);
            entity
                .params
                .set("shelf_position", ParamValue::Integer(side.toggled() as i16))?;
        }
        GripKind::FrameToggle => {
            if !caps.contains(EntityCaps::FRAME_TOGGLE) {
                return Err(DraftError::GripUnsupported("frame toggle".to_string()));
            }
            let shape = FrameType::from(entity.params.integer("frame_type")?);
            entity
                .params
                .set("frame_type", ParamValue::Integer(shape.toggled() as i16))?;
        }
        GripKind::AlignmentToggle => {
            if !caps.contains(EntityCaps::ALIGNMENT_TOGGLE) {
                return Err(DraftError::GripUnsupported("alignment toggle".to_string()));
            }
            let alignment = TextAlignment::from(entity.params.integer("alignment")?);
            entity
                .params
                .set("alignment", ParamValue::Integer(alignment.toggled() as i16))?;
        }
        other => {
            return Err(DraftError::GripUnsupported(format!(
                "{other:?} is not an immediate grip"
            )))
        }
    }
    entity.update_entities()
}

/// Remove an axis control point and regenerate.
///
/// The insertion and end points are always retained; removal below two
/// control points is rejected by the entity.
pub fn remove_vertex(entity: &mut SmartEntity, index: usize) -> Result<Vector3> {
    if !entity.caps().contains(EntityCaps::MIDDLE_POINTS) {
        return Err(DraftError::GripUnsupported("remove vertex".to_string()));
    }
    let removed = entity.remove_control_point(index)?;
    entity.update_entities()?;
    Ok(removed)
}

/// Committed result of a finished drag.
#[derive(Debug)]
pub struct GripCommit {
    /// Serialized durable state to write back to the host entity.
    pub record: ExtendedDataRecord,
    /// Block anchor after the gesture (moves with the insertion point).
    pub anchor: Vector3,
}

/// Pre-drag control state for abort rollback.
#[derive(Debug, Clone)]
struct Snapshot {
    insertion: Vector3,
    end: Vector3,
    middles: Vec<Vector3>,
    leader: Option<Vector3>,
    reversed: bool,
}

impl Snapshot {
    fn of(entity: &SmartEntity) -> Self {
        Snapshot {
            insertion: entity.insertion_point,
            end: entity.end_point,
            middles: entity.middle_points.clone(),
            leader: entity.leader_point,
            reversed: entity.direction_reversed,
        }
    }

    fn restore(self, entity: &mut SmartEntity) {
        entity.insertion_point = self.insertion;
        entity.end_point = self.end;
        entity.middle_points = self.middles;
        entity.leader_point = self.leader;
        entity.direction_reversed = self.reversed;
    }
}

enum DragTarget {
    Vertex(usize),
    Leader,
}

/// One in-flight grip drag.
pub struct GripDrag<'a> {
    entity: &'a mut SmartEntity,
    snapshot: Snapshot,
    target: DragTarget,
}

impl<'a> GripDrag<'a> {
    /// Begin a drag on a draggable grip.
    ///
    /// An [`GripKind::AddVertex`] grip inserts its point (seeded at the
    /// segment midpoint) immediately; aborting removes it again via the
    /// snapshot.
    pub fn start(entity: &'a mut SmartEntity, kind: GripKind) -> Result<Self> {
        let snapshot = Snapshot::of(entity);
        let target = match kind {
            GripKind::Vertex(index) => {
                let count = entity.control_point_count();
                if index >= count {
                    return Err(DraftError::GripIndex { index, count });
                }
                DragTarget::Vertex(index)
            }
            GripKind::AddVertex(index) => {
                if !entity.caps().contains(EntityCaps::MIDDLE_POINTS) {
                    return Err(DraftError::GripUnsupported("add vertex".to_string()));
                }
                let seed = seed_point(entity, index)?;
                entity.insert_control_point(index, seed)?;
                // a midpoint seed on a near-minimum segment starts inside
                // the minimum distance of both neighbours
                entity.move_control_point(index, seed)?;
                entity.update_entities()?;
                DragTarget::Vertex(index)
            }
            GripKind::Leader => {
                if !entity.caps().contains(EntityCaps::LEADER_POINT) {
                    return Err(DraftError::GripUnsupported("leader point".to_string()));
                }
                DragTarget::Leader
            }
            other => {
                return Err(DraftError::GripUnsupported(format!(
                    "{other:?} is not draggable"
                )))
            }
        };
        Ok(GripDrag {
            entity,
            snapshot,
            target,
        })
    }

    /// Apply an intermediate (or final) cursor position and regenerate.
    pub fn moved(&mut self, position: Vector3) -> Result<()> {
        match self.target {
            DragTarget::Vertex(index) => {
                self.entity.move_control_point(index, position)?;
            }
            // the leader point has no minimum-distance constraint
            DragTarget::Leader => self.entity.leader_point = Some(position),
        }
        self.entity.update_entities()
    }

    /// Commit the drag: final regeneration, serialized record, new anchor.
    pub fn end(self) -> Result<GripCommit> {
        self.entity.update_entities()?;
        Ok(GripCommit {
            record: xdata::to_xdata(self.entity),
            anchor: self.entity.insertion_point,
        })
    }

    /// Roll back to the pre-drag state and regenerate once.
    pub fn abort(self) -> Result<()> {
        self.snapshot.restore(self.entity);
        self.entity.update_entities()
    }
}

fn seed_point(entity: &SmartEntity, index: usize) -> Result<Vector3> {
    let count = entity.control_point_count();
    if index > count {
        return Err(DraftError::GripIndex { index, count });
    }
    Ok(if index == 0 {
        entity.insertion_point
    } else if index == count {
        entity.end_point
    } else {
        // control_point is total for 0..count
        let a = entity.control_point(index - 1).unwrap_or(entity.insertion_point);
        let b = entity.control_point(index).unwrap_or(entity.end_point);
        a.midpoint(&b)
    })
}

/// Scoped guard that batches several mutations into one regeneration.
///
/// While the guard is alive the entity is mutated freely through
/// [`BulkEdit::entity`]; nothing is regenerated until [`BulkEdit::commit`],
/// which runs exactly one full regeneration.
pub struct BulkEdit<'a> {
    entity: &'a mut SmartEntity,
}

impl<'a> BulkEdit<'a> {
    /// Open a bulk-edit scope.
    pub fn new(entity: &'a mut SmartEntity) -> Self {
        BulkEdit { entity }
    }

    /// The entity under edit; mutations are not regenerated yet.
    pub fn entity(&mut self) -> &mut SmartEntity {
        self.entity
    }

    /// Close the scope with a single regeneration.
    pub fn commit(self) -> Result<()> {
        self.entity.update_entities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn ground_line() -> SmartEntity {
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        e.end_point = Vector3::new(100.0, 0.0, 0.0);
        e.update_entities().unwrap();
        e
    }

    #[test]
    fn test_enumeration_matches_caps() {
        let e = ground_line();
        let grips = grips_for(&e);
        // 2 vertices + 1 segment midpoint + reverse
        assert_eq!(grips.len(), 4);
        assert!(grips.iter().any(|g| g.kind == GripKind::Vertex(0)));
        assert!(grips.iter().any(|g| g.kind == GripKind::AddVertex(1)
            && g.position == Vector3::new(50.0, 0.0, 0.0)));
        assert!(grips.iter().any(|g| g.kind == GripKind::Reverse));
        assert!(!grips.iter().any(|g| g.kind == GripKind::ShelfToggle));
    }

    #[test]
    fn test_fragment_marker_grip_set() {
        let mut e = SmartEntity::new(EntityKind::FragmentMarker);
        e.end_point = Vector3::new(40.0, 0.0, 0.0);
        e.update_entities().unwrap();
        let kinds: Vec<GripKind> = grips_for(&e).iter().map(|g| g.kind).collect();
        assert!(kinds.contains(&GripKind::Leader));
        assert!(kinds.contains(&GripKind::ShelfToggle));
        assert!(kinds.contains(&GripKind::FrameToggle));
        assert!(!kinds.contains(&GripKind::Reverse));
        assert!(!kinds.contains(&GripKind::AddVertex(1)));
    }

    #[test]
    fn test_drag_moves_vertex_and_commits() {
        let mut e = ground_line();
        let mut drag = GripDrag::start(&mut e, GripKind::Vertex(1)).unwrap();
        drag.moved(Vector3::new(120.0, 10.0, 0.0)).unwrap();
        let commit = drag.end().unwrap();
        assert_eq!(e.end_point, Vector3::new(120.0, 10.0, 0.0));
        assert_eq!(commit.anchor, e.insertion_point);
        assert!(!commit.record.values.is_empty());
    }

    #[test]
    fn test_drag_abort_restores_exact_state() {
        let mut e = ground_line();
        e.middle_points.push(Vector3::new(50.0, 5.0, 0.0));
        e.update_entities().unwrap();
        let before = (
            e.insertion_point,
            e.end_point,
            e.middle_points.clone(),
            e.entities().to_vec(),
        );

        let mut drag = GripDrag::start(&mut e, GripKind::Vertex(1)).unwrap();
        drag.moved(Vector3::new(60.0, 40.0, 0.0)).unwrap();
        drag.moved(Vector3::new(70.0, -20.0, 0.0)).unwrap();
        drag.abort().unwrap();

        assert_eq!(e.insertion_point, before.0);
        assert_eq!(e.end_point, before.1);
        assert_eq!(e.middle_points, before.2);
        assert_eq!(e.entities(), before.3.as_slice());
    }

    #[test]
    fn test_add_vertex_drag_inserts_then_moves() {
        let mut e = ground_line();
        let mut drag = GripDrag::start(&mut e, GripKind::AddVertex(1)).unwrap();
        drag.moved(Vector3::new(50.0, 30.0, 0.0)).unwrap();
        drag.end().unwrap();
        assert_eq!(e.middle_points, vec![Vector3::new(50.0, 30.0, 0.0)]);
    }

    #[test]
    fn test_add_vertex_abort_removes_the_point() {
        let mut e = ground_line();
        let drag = GripDrag::start(&mut e, GripKind::AddVertex(1)).unwrap();
        drag.abort().unwrap();
        assert!(e.middle_points.is_empty());
    }

    #[test]
    fn test_insert_then_remove_is_identity() {
        let mut e = ground_line();
        let before = (e.insertion_point, e.end_point, e.middle_points.clone());
        let mut drag = GripDrag::start(&mut e, GripKind::AddVertex(1)).unwrap();
        drag.moved(Vector3::new(50.0, 30.0, 0.0)).unwrap();
        drag.end().unwrap();
        remove_vertex(&mut e, 1).unwrap();
        assert_eq!(
            (e.insertion_point, e.end_point, e.middle_points.clone()),
            before
        );
    }

    #[test]
    fn test_add_vertex_seed_keeps_minimum_spacing() {
        // minimum-length axis: the midpoint seed is only 1 from each
        // neighbour (minimum is 2) and must be pushed out before commit
        let mut e = SmartEntity::new(EntityKind::GroundLine);
        e.end_point = Vector3::new(2.0, 0.0, 0.0);
        e.update_entities().unwrap();
        let drag = GripDrag::start(&mut e, GripKind::AddVertex(1)).unwrap();
        drag.end().unwrap();
        let min = e.min_distance_scaled();
        for index in 1..e.control_point_count() {
            let a = e.control_point(index - 1).unwrap();
            let b = e.control_point(index).unwrap();
            assert!(a.distance_to(&b) >= min - 1e-9);
        }
    }

    #[test]
    fn test_remove_vertex_grip_enumerated_on_middles() {
        let mut e = ground_line();
        e.middle_points.push(Vector3::new(50.0, 5.0, 0.0));
        e.update_entities().unwrap();
        assert!(grips_for(&e).iter().any(|g| {
            g.kind == GripKind::RemoveVertex(1) && g.position == Vector3::new(50.0, 5.0, 0.0)
        }));
        apply_toggle(&mut e, GripKind::RemoveVertex(1)).unwrap();
        assert!(e.middle_points.is_empty());
        assert!(!grips_for(&e)
            .iter()
            .any(|g| matches!(g.kind, GripKind::RemoveVertex(_))));
    }

    #[test]
    fn test_drag_clamps_against_neighbour() {
        let mut e = ground_line();
        let mut drag = GripDrag::start(&mut e, GripKind::Vertex(1)).unwrap();
        drag.moved(Vector3::new(0.5, 0.0, 0.0)).unwrap();
        drag.end().unwrap();
        assert!((e.end_point.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_leader_drag_has_no_minimum() {
        let mut e = SmartEntity::new(EntityKind::LevelMark);
        e.end_point = Vector3::new(20.0, 15.0, 0.0);
        e.update_entities().unwrap();
        let mut drag = GripDrag::start(&mut e, GripKind::Leader).unwrap();
        drag.moved(Vector3::new(0.0, 15.1, 0.0)).unwrap();
        drag.end().unwrap();
        assert_eq!(e.leader_point, Some(Vector3::new(0.0, 15.1, 0.0)));
    }

    #[test]
    fn test_unsupported_grips_are_rejected() {
        let mut e = SmartEntity::new(EntityKind::BreakLine);
        e.end_point = Vector3::new(100.0, 0.0, 0.0);
        e.update_entities().unwrap();
        assert!(matches!(
            GripDrag::start(&mut e, GripKind::AddVertex(1)),
            Err(DraftError::GripUnsupported(_))
        ));
        assert!(matches!(
            GripDrag::start(&mut e, GripKind::Leader),
            Err(DraftError::GripUnsupported(_))
        ));
        assert!(matches!(
            apply_toggle(&mut e, GripKind::ShelfToggle),
            Err(DraftError::GripUnsupported(_))
        ));
    }

    #[test]
    fn test_reverse_toggle_twice_is_identity() {
        let mut e = ground_line();
        let before = (e.insertion_point, e.end_point, e.entities().to_vec());
        apply_toggle(&mut e, GripKind::Reverse).unwrap();
        assert!(e.direction_reversed);
        apply_toggle(&mut e, GripKind::Reverse).unwrap();
        assert_eq!(
            (e.insertion_point, e.end_point, e.entities().to_vec()),
            before
        );
    }

    #[test]
    fn test_shelf_toggle_flips_parameter() {
        let mut e = SmartEntity::new(EntityKind::NodeLabel);
        e.end_point = Vector3::new(30.0, 20.0, 0.0);
        e.update_entities().unwrap();
        assert_eq!(e.params.integer("shelf_position").unwrap(), 1);
        apply_toggle(&mut e, GripKind::ShelfToggle).unwrap();
        assert_eq!(e.params.integer("shelf_position").unwrap(), 0);
    }

    #[test]
    fn test_alignment_toggle_cycles_parameter() {
        let mut e = SmartEntity::new(EntityKind::ViewLabel);
        e.end_point = Vector3::new(50.0, 0.0, 0.0);
        e.update_entities().unwrap();
        for expected in [1, 2, 0] {
            apply_toggle(&mut e, GripKind::AlignmentToggle).unwrap();
            assert_eq!(e.params.integer("alignment").unwrap(), expected);
        }
    }

    #[test]
    fn test_bulk_edit_regenerates_once_on_commit() {
        let mut e = ground_line();
        let before = e.entities().to_vec();
        let mut bulk = BulkEdit::new(&mut e);
        bulk.entity().end_point = Vector3::new(200.0, 0.0, 0.0);
        bulk.entity()
            .params
            .set("space", ParamValue::Real(20.0))
            .unwrap();
        // nothing regenerated yet
        assert_eq!(bulk.entity().entities(), before.as_slice());
        bulk.commit().unwrap();
        assert_ne!(e.entities(), before.as_slice());
    }
}
