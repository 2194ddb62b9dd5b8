//! Node label (маркировка узла): a circle around the detailed node, a
//! leader from the circle edge to the label point and a shelf carrying the
//! node number, with the sheet number underneath when present.

use super::{RegenContext, RegenOutput, ShelfPosition};
use crate::error::Result;
use crate::primitives::{Line, PlineVertex, Polyline, Primitive, TextRun};
use crate::types::Vector2;

/// Vertical gap between shelf and text, as a fraction of text height.
const TEXT_GAP_FACTOR: f64 = 0.3;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let radius = ctx.scaled("radius")?;
    let shelf_position = ShelfPosition::from(ctx.params.integer("shelf_position")?);
    let shelf_length = ctx.scaled("shelf_length")?;
    let node_number = ctx.params.text("node_number")?.to_string();
    let sheet_number = ctx.params.text("sheet_number")?.to_string();
    let text_height = ctx.scaled("text_height")?;

    let centre = ctx.insertion.to_2d();
    let end = ctx.end.to_2d();

    let mut primitives: Vec<Primitive> = vec![circle(centre, radius)];

    // leader starts on the circle edge, not at its centre
    let towards = (end - centre).normalize();
    let towards = if towards.length() > 0.0 {
        towards
    } else {
        Vector2::UNIT_X
    };
    primitives.push(Line::new(centre + towards * radius, end).into());

    let shelf_tip = end + Vector2::UNIT_X * (shelf_position.sign() * shelf_length);
    primitives.push(Line::new(end, shelf_tip).into());
    let shelf_mid = (end + shelf_tip) / 2.0;
    let text_offset = text_height / 2.0 + text_height * TEXT_GAP_FACTOR;

    if !node_number.is_empty() {
        let run = TextRun::new(
            node_number,
            shelf_mid + Vector2::UNIT_Y * text_offset,
            text_height,
            0.0,
        );
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }
    if !sheet_number.is_empty() {
        let run = TextRun::new(
            sheet_number,
            shelf_mid - Vector2::UNIT_Y * text_offset,
            text_height,
            0.0,
        );
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }

    Ok(RegenOutput::flat(primitives))
}

/// A full circle as a closed two-vertex polyline of two semicircular arcs.
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
