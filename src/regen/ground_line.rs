//! Ground line (линия грунта): the main polyline with groups of slanted
//! hatch strokes on its right-hand side.
//!
//! Strokes are placed by the three-phase walk `[space, stroke_offset,
//! stroke_offset]`, producing groups of three separated by `space`; the
//! first increment follows the configured first-stroke policy.

use super::{decorate_segments, main_polyline, RegenContext, RegenOutput};
use crate::error::Result;
use crate::geometry::walker::{FirstStrokeOffset, PhaseWalk};
use crate::primitives::{Line, Primitive};
use crate::types::Vector3;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let stroke_length = ctx.scaled("stroke_length")?;
    let stroke_offset = ctx.scaled("stroke_offset")?;
    let space = ctx.scaled("space")?;
    let stroke_angle = ctx.params.real("stroke_angle")?.to_radians();
    let first = FirstStrokeOffset::from(ctx.params.integer("first_stroke_offset")?);

    let points = ctx.axis_points();
    let decor = decorate_segments(ctx, &points, |_, a, b| {
        Ok(segment_strokes(
            a,
            b,
            stroke_length,
            stroke_offset,
            space,
            stroke_angle,
            first,
        ))
    })?;

    let mut primitives: Vec<Primitive> = vec![main_polyline(&points).into()];
    for segment in &decor {
        primitives.extend(segment.iter().cloned());
    }
    Ok(RegenOutput { primitives, decor })
}

fn segment_strokes(
    a: Vector3,
    b: Vector3,
    stroke_length: f64,
    stroke_offset: f64,
    space: f64,
    stroke_angle: f64,
    first: FirstStrokeOffset,
) -> Vec<Primitive> {
    let start = a.to_2d();
    let tangent = crate::geometry::segment_tangent(a, b);
    let length = start.distance_to(&b.to_2d());
    // trailing slant on the right-hand side of the travel direction
    let stroke_dir = -tangent.rotated(stroke_angle);

    let phases = [space, stroke_offset, stroke_offset];
    let first_step = first.initial_step(space, stroke_offset);
    PhaseWalk::new(length, &phases, first_step)
        .map(|step| {
            let anchor = start + tangent * step.end;
            Primitive::Line(Line::new(anchor, anchor + stroke_dir * stroke_length))
        })
        .collect()
}
