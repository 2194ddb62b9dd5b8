//! Segment phase-walker shared by the stroke/hatch generating families.
//!
//! A walk covers one polyline segment with a repeating cycle of phase
//! distances (gap/stroke/gap for three-phase patterns, gap/feature for
//! two-phase ones).  The walker only reports distances; what gets drawn at
//! each step is up to the calling family.

use crate::types::Vector2;

/// Hard bound on walk iterations per segment.
///
/// Guards against runaway loops on degenerate inputs (near-zero phase
/// distances against long segments).  The value is inherited from the
/// original design without a derivation; see DESIGN.md.
pub const MAX_WALK_ITERATIONS: usize = 1000;

/// Policy for the very first increment of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum FirstStrokeOffset {
    /// Half of the inter-group space.
    #[default]
    ByHalfSpace = 0,
    /// The full inter-group space.
    BySpace = 1,
    /// The family's stroke offset distance.
    ByStrokeOffset = 2,
}

impl FirstStrokeOffset {
    /// Resolve the initial step for the given family distances.
    pub fn initial_step(&self, space: f64, stroke_offset: f64) -> f64 {
        match self {
            Self::ByHalfSpace => space / 2.0,
            Self::BySpace => space,
            Self::ByStrokeOffset => stroke_offset,
        }
    }
}

impl From<i16> for FirstStrokeOffset {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::BySpace,
            2 => Self::ByStrokeOffset,
            _ => Self::ByHalfSpace,
        }
    }
}

/// One step of a phase walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    /// Distance along the segment where the step begins.
    pub start: f64,
    /// Distance along the segment where the step ends (the anchor point for
    /// point-like features).
    pub end: f64,
    /// Index into the phase-distance cycle this step consumed.
    pub phase: usize,
}

/// Iterator over the phase steps of one segment.
///
/// A step whose end would pass the segment length is dropped entirely: no
/// partial strokes are drawn at segment ends.
#[derive(Debug, Clone)]
pub struct PhaseWalk<'a> {
    phases: &'a [f64],
    length: f64,
    acc: f64,
    phase: usize,
    first: Option<f64>,
    iterations: usize,
}

impl<'a> PhaseWalk<'a> {
    /// Walk a segment of `length` with the given cyclic phase distances,
    /// replacing the first increment by `first_step`.
    pub fn new(length: f64, phases: &'a [f64], first_step: f64) -> Self {
        PhaseWalk {
            phases,
            length,
            acc: 0.0,
            phase: 0,
            first: Some(first_step),
            iterations: 0,
        }
    }
}

impl Iterator for PhaseWalk<'_> {
    type Item = WalkStep;

    fn next(&mut self) -> Option<WalkStep> {
        if self.phases.is_empty() || self.iterations >= MAX_WALK_ITERATIONS {
            return None;
        }
        self.iterations += 1;

        let step = self.first.take().unwrap_or(self.phases[self.phase]);
        if step <= 0.0 {
            // a non-advancing step would repeat forever; stop here
            return None;
        }
        let start = self.acc;
        let end = start + step;
        if end > self.length {
            return None;
        }
        self.acc = end;
        let phase = self.phase;
        self.phase = (self.phase + 1) % self.phases.len();
        Some(WalkStep { start, end, phase })
    }
}

/// Miter back-offset at the join of two segments for offset stroke runs.
///
/// Dashes drawn at a perpendicular `offset` on the right-hand side of the
/// path pile up at corners: on the inner side of a turn the offset run is
/// shorter than the segment, on the outer side longer.  The returned value
/// is the distance to trim from each adjoining run end (negative values
/// extend).  The cross-product sign of the adjacent tangents decides which
/// case applies.
pub fn miter_back_offset(prev_tangent: Vector2, next_tangent: Vector2, offset: f64) -> f64 {
    let prev = prev_tangent.normalize();
    let next = next_tangent.normalize();
    let cross = prev.cross(&next);
    let dot = prev.dot(&next).clamp(-1.0, 1.0);
    if cross.abs() < 1e-12 {
        // collinear join, nothing to correct
        return 0.0;
    }
    let turn = cross.atan2(dot);
    // right-hand offset: a right turn (negative cross) is convex toward the
    // strokes and the runs must be trimmed; a left turn extends them
    -offset * (turn / 2.0).tan()
}
