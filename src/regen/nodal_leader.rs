//! Nodal leader (узловая выноска): a circle around the node, a polyline
//! leader from the circle edge through the intermediate points to the end,
//! and a shelf there carrying the top and bottom texts.

use super::{RegenContext, RegenOutput};
use crate::error::Result;
use crate::primitives::{Line, PlineVertex, Polyline, Primitive, TextRun};
use crate::types::Vector2;

/// Vertical gap between shelf and text, as a fraction of text height.
const TEXT_GAP_FACTOR: f64 = 0.3;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let radius = ctx.scaled("radius")?;
    let shelf_length = ctx.scaled("shelf_length")?;
    let text_top = ctx.params.text("text_top")?.to_string();
    let text_bottom = ctx.params.text("text_bottom")?.to_string();
    let text_height = ctx.scaled("text_height")?;

    let points = ctx.axis_points();
    let centre = points[0].to_2d();
    let end = points[points.len() - 1].to_2d();

    let mut primitives: Vec<Primitive> = vec![circle(centre, radius)];

    // leader leaves the circle towards the first path point
    let first_target = points[1].to_2d();
    let towards = (first_target - centre).normalize();
    let towards = if towards.length() > 0.0 {
        towards
    } else {
        Vector2::UNIT_X
    };
    let mut leader = Polyline::new();
    leader.add_point(centre + towards * radius);
    for p in &points[1..] {
        leader.add_point(p.to_2d());
    }
    primitives.push(leader.into());

    // shelf continues the horizontal sense of the last leader segment
    let prev = points[points.len() - 2].to_2d();
    let sign = if end.x >= prev.x { 1.0 } else { -1.0 };
    let shelf_tip = end + Vector2::UNIT_X * (sign * shelf_length);
    primitives.push(Line::new(end, shelf_tip).into());
    let shelf_mid = (end + shelf_tip) / 2.0;
    let text_offset = text_height / 2.0 + text_height * TEXT_GAP_FACTOR;

    if !text_top.is_empty() {
        let run = TextRun::new(
            text_top,
            shelf_mid + Vector2::UNIT_Y * text_offset,
            text_height,
            0.0,
        );
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }
    if !text_bottom.is_empty() {
        let run = TextRun::new(
            text_bottom,
            shelf_mid - Vector2::UNIT_Y * text_offset,
            text_height,
            0.0,
        );
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }

    Ok(RegenOutput::flat(primitives))
}

fn circle(centre: Vector2, radius: f64) -> Primitive {
    let mut pl = Polyline::new();
    pl.add_vertex(PlineVertex::with_bulge(
        centre - Vector2::UNIT_X * radius,
        1.0,
    ));
    pl.add_vertex(PlineVertex::with_bulge(
        centre + Vector2::UNIT_X * radius,
        1.0,
    ));
    pl.close();
    pl.into()
}
