//! Thick arrow (утолщённая стрелка): a single polyline drawn with vertex
//! widths, a constant-width shaft and a head tapering to a point.

use super::{RegenContext, RegenOutput};
use crate::error::Result;
use crate::primitives::{PlineVertex, Polyline, Primitive};

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let width = ctx.scaled("width")?;
    let head_length = ctx.scaled("head_length")?;
    let head_width = ctx.scaled("head_width")?;

    let (tail, tip) = if ctx.reversed {
        (ctx.end.to_2d(), ctx.insertion.to_2d())
    } else {
        (ctx.insertion.to_2d(), ctx.end.to_2d())
    };
    let length = tail.distance_to(&tip);
    let towards_tail = (tail - tip).normalize();

    let mut pl = Polyline::new();
    if length > head_length {
        let head_base = tip + towards_tail * head_length;
        pl.add_vertex(PlineVertex::with_widths(tail, width, width));
        pl.add_vertex(PlineVertex::with_widths(head_base, head_width, 0.0));
        pl.add_vertex(PlineVertex::new(tip));
    } else {
        // too short for a shaft, the head spans the whole axis
        pl.add_vertex(PlineVertex::with_widths(tail, head_width, 0.0));
        pl.add_vertex(PlineVertex::new(tip));
    }
    Ok(RegenOutput::flat(vec![Primitive::Polyline(pl)]))
}
