//! Water-proofing line (гидроизоляция): the main polyline with a run of
//! dashes at a perpendicular indent on its right-hand side.
//!
//! Dashes follow the three-phase walk `[space, stroke_length,
//! stroke_offset]` (gap, dash, gap).  At segment joins the dash window is
//! corrected by a miter back-offset so runs from adjacent segments neither
//! overlap on the inner side of a corner nor leave a wedge on the outer
//! side.

use super::{decorate_segments, main_polyline, RegenContext, RegenOutput};
use crate::error::Result;
use crate::geometry::walker::{miter_back_offset, FirstStrokeOffset, PhaseWalk};
use crate::geometry::{perpendicular_offset, segment_tangent};
use crate::primitives::{Line, Primitive};
use crate::types::{Vector2, Vector3};

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let stroke_length = ctx.scaled("stroke_length")?;
    let stroke_offset = ctx.scaled("stroke_offset")?;
    let space = ctx.scaled("space")?;
    let indent = ctx.scaled("indent")?;
    let first = FirstStrokeOffset::from(ctx.params.integer("first_stroke_offset")?);

    let points = ctx.axis_points();
    let tangents: Vec<Vector2> = points
        .windows(2)
        .map(|w| segment_tangent(w[0], w[1]))
        .collect();

    let decor = decorate_segments(ctx, &points, |i, a, b| {
        // window trims from the mitered corners on either side
        let lead = if i > 0 {
            miter_back_offset(tangents[i - 1], tangents[i], indent)
        } else {
            0.0
        };
        let tail = if i + 1 < tangents.len() {
            miter_back_offset(tangents[i], tangents[i + 1], indent)
        } else {
            0.0
        };
        Ok(segment_dashes(
            a,
            b,
            tangents[i],
            stroke_length,
            stroke_offset,
            space,
            indent,
            first,
            lead,
            tail,
        ))
    })?;

    let mut primitives: Vec<Primitive> = vec![main_polyline(&points).into()];
    for segment in &decor {
        primitives.extend(segment.iter().cloned());
    }
    Ok(RegenOutput { primitives, decor })
}

#[allow(clippy::too_many_arguments)]
fn segment_dashes(
    a: Vector3,
    b: Vector3,
    tangent: Vector2,
    stroke_length: f64,
    stroke_offset: f64,
    space: f64,
    indent: f64,
    first: FirstStrokeOffset,
    lead_trim: f64,
    tail_trim: f64,
) -> Vec<Primitive> {
    let start = a.to_2d();
    let length = start.distance_to(&b.to_2d());
    let window_lo = lead_trim;
    let window_hi = length - tail_trim;

    let phases = [space, stroke_length, stroke_offset];
    let first_step = first.initial_step(space, stroke_offset);
    PhaseWalk::new(length, &phases, first_step)
        .filter(|step| step.phase == 1)
        .filter_map(|step| {
            let lo = step.start.max(window_lo);
            let hi = step.end.min(window_hi);
            if hi - lo <= 0.0 {
                return None;
            }
            let p1 = perpendicular_offset(start + tangent * lo, tangent, indent);
            let p2 = perpendicular_offset(start + tangent * hi, tangent, indent);
            Some(Primitive::Line(Line::new(p1, p2)))
        })
        .collect()
}
