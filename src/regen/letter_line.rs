//! Letter line (линия с обозначением): the main polyline with its
//! designation text repeated at intervals, each run sitting on a background
//! mask that hides the line underneath.
//!
//! Text placement uses the two-phase walk `[space, text_advance]`; the run
//! occupies the phase-1 interval, centred on it and rotated to the segment
//! tangent unless the horizontal flag is set.

use super::{decorate_segments, main_polyline, RegenContext, RegenOutput};
use crate::error::Result;
use crate::geometry::walker::PhaseWalk;
use crate::primitives::{Primitive, TextRun, TEXT_WIDTH_FACTOR};
use crate::types::Vector3;

/// Mask margin around each text run, as a fraction of text height.
const MASK_MARGIN_FACTOR: f64 = 0.25;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let text = ctx.params.text("text")?.to_string();
    let space = ctx.scaled("space")?;
    let text_height = ctx.scaled("text_height")?;
    let horizontal = ctx.params.flag("horizontal")?;

    let advance = text.chars().count() as f64 * text_height * TEXT_WIDTH_FACTOR;
    let points = ctx.axis_points();

    let decor = if text.is_empty() {
        vec![Vec::new(); points.len().saturating_sub(1)]
    } else {
        decorate_segments(ctx, &points, |_, a, b| {
            Ok(segment_texts(a, b, &text, space, advance, text_height, horizontal))
        })?
    };

    let mut primitives: Vec<Primitive> = vec![main_polyline(&points).into()];
    for segment in &decor {
        primitives.extend(segment.iter().cloned());
    }
    Ok(RegenOutput { primitives, decor })
}

fn segment_texts(
    a: Vector3,
    b: Vector3,
    text: &str,
    space: f64,
    advance: f64,
    text_height: f64,
    horizontal: bool,
) -> Vec<Primitive> {
    let start = a.to_2d();
    let tangent = crate::geometry::segment_tangent(a, b);
    let length = start.distance_to(&b.to_2d());
    let rotation = if horizontal { 0.0 } else { tangent.angle() };

    let phases = [space, advance];
    let mut out = Vec::new();
    for step in PhaseWalk::new(length, &phases, space) {
        if step.phase != 1 {
            continue;
        }
        let centre = start + tangent * ((step.start + step.end) / 2.0);
        let run = TextRun::new(text, centre, text_height, rotation);
        // mask first so the host draws it under the text
        out.push(run.background_mask(text_height * MASK_MARGIN_FACTOR).into());
        out.push(run.into());
    }
    out
}
