//! Geometry regeneration engine.
//!
//! One module per entity family; each maps {control points, parameters,
//! scale} to an ordered list of drawing primitives.  Regeneration is pure:
//! same input, same output, no hidden state.

pub mod break_line;
pub mod fragment_marker;
pub mod ground_line;
pub mod letter_line;
pub mod level_mark;
pub mod nodal_leader;
pub mod node_label;
pub mod thick_arrow;
pub mod view_label;
pub mod waterproofing;

use crate::entity::EntityKind;
use crate::error::Result;
use crate::params::ParamSet;
use crate::primitives::{Polyline, Primitive};
use crate::types::Vector3;

/// Regeneration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenMode {
    /// Recompute everything.
    Full,
    /// Recompute only the last segment's decorations; earlier segments are
    /// reused from the cache.  Used while the creation jig is dragging.
    LastSegmentOnly,
}

/// Immutable view of the entity state a regeneration run needs.
#[derive(Debug)]
pub(crate) struct RegenContext<'a> {
    pub kind: EntityKind,
    pub insertion: Vector3,
    /// Resolved end point (preview or clamped value already applied).
    pub end: Vector3,
    pub middles: &'a [Vector3],
    pub leader: Option<Vector3>,
    pub params: &'a ParamSet,
    pub scale: f64,
    pub reversed: bool,
    pub mode: RegenMode,
    /// Per-segment decoration cache from the previous run.
    pub decor_cache: &'a [Vec<Primitive>],
}

impl RegenContext<'_> {
    /// Axis control points in geometric order.
    pub fn axis_points(&self) -> Vec<Vector3> {
        let mut points = Vec::with_capacity(2 + self.middles.len());
        points.push(self.insertion);
        points.extend_from_slice(self.middles);
        points.push(self.end);
        points
    }

    /// A real parameter converted from paper units to model units.
    pub fn scaled(&self, name: &str) -> Result<f64> {
        Ok(self.params.real(name)? * self.scale)
    }
}

/// Output of one regeneration run.
#[derive(Debug, Default)]
pub(crate) struct RegenOutput {
    /// Ordered drawing primitives for the anonymous block.
    pub primitives: Vec<Primitive>,
    /// Per-segment decorations, kept for light-mode reuse.  Empty for
    /// families without segment decorations.
    pub decor: Vec<Vec<Primitive>>,
}

impl RegenOutput {
    /// Output without a segment cache.
    pub fn flat(primitives: Vec<Primitive>) -> Self {
        RegenOutput {
            primitives,
            decor: Vec::new(),
        }
    }
}

/// Dispatch to the family's regeneration function.
pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    match ctx.kind {
        EntityKind::BreakLine => break_line::regenerate(ctx),
        EntityKind::GroundLine => ground_line::regenerate(ctx),
        EntityKind::Waterproofing => waterproofing::regenerate(ctx),
        EntityKind::LetterLine => letter_line::regenerate(ctx),
        EntityKind::FragmentMarker => fragment_marker::regenerate(ctx),
        EntityKind::LevelMark => level_mark::regenerate(ctx),
        EntityKind::NodeLabel => node_label::regenerate(ctx),
        EntityKind::ViewLabel => view_label::regenerate(ctx),
        EntityKind::NodalLeader => nodal_leader::regenerate(ctx),
        EntityKind::ThickArrow => thick_arrow::regenerate(ctx),
    }
}

/// Shelf side for labels with a toggleable shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum ShelfPosition {
    Left = 0,
    #[default]
    Right = 1,
}

impl From<i16> for ShelfPosition {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::Left,
            _ => Self::Right,
        }
    }
}

impl ShelfPosition {
    /// The opposite side (toggle cycling).
    pub fn toggled(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Horizontal direction multiplier.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Build the main open polyline through the axis points.
pub(crate) fn main_polyline(points: &[Vector3]) -> Polyline {
    Polyline::from_points(points.iter().map(|p| p.to_2d()))
}

/// Walk the axis segments, reusing cached decorations in light mode.
///
/// `decorate` produces the decoration primitives for one segment; in
/// [`RegenMode::LastSegmentOnly`] every segment but the last takes its
/// cached result when one exists.
pub(crate) fn decorate_segments<F>(
    ctx: &RegenContext,
    points: &[Vector3],
    mut decorate: F,
) -> Result<Vec<Vec<Primitive>>>
where
    F: FnMut(usize, Vector3, Vector3) -> Result<Vec<Primitive>>,
{
    let segment_count = points.len().saturating_sub(1);
    let mut decor = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let cached = ctx.mode == RegenMode::LastSegmentOnly
            && i + 1 < segment_count
            && i < ctx.decor_cache.len();
        if cached {
            decor.push(ctx.decor_cache[i].clone());
        } else {
            decor.push(decorate(i, points[i], points[i + 1])?);
        }
    }
    Ok(decor)
}
