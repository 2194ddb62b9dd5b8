//! Level mark (отметка уровня): a 45° measurement wedge at the insertion
//! point, a vertical riser up to the shelf level, a horizontal shelf ending
//! at the end point and the elevation value above it.

use super::{RegenContext, RegenOutput};
use crate::error::Result;
use crate::primitives::{Line, Primitive, TextRun};
use crate::types::Vector2;

/// Vertical gap between shelf and text, as a fraction of text height.
const TEXT_GAP_FACTOR: f64 = 0.3;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let value = ctx.params.text("value")?.to_string();
    let show_plus = ctx.params.flag("show_plus")?;
    let text_height = ctx.scaled("text_height")?;
    let arrow_size = ctx.scaled("arrow_size")?;

    let ins = ctx.insertion.to_2d();
    let end = ctx.end.to_2d();
    // shelf sits at the end point's level; wedge opens towards it
    let up = if end.y >= ins.y { 1.0 } else { -1.0 };
    let corner = Vector2::new(ins.x, end.y);

    let leg = arrow_size * std::f64::consts::FRAC_1_SQRT_2;
    let mut primitives: Vec<Primitive> = vec![
        Line::new(ins, ins + Vector2::new(-leg, up * leg)).into(),
        Line::new(ins, ins + Vector2::new(leg, up * leg)).into(),
        Line::new(ins, corner).into(),
        Line::new(corner, end).into(),
    ];

    if !value.is_empty() {
        let display = if show_plus && !value.starts_with('+') && !value.starts_with('-') {
            format!("+{value}")
        } else {
            value
        };
        // reversing drops the value under the shelf
        let side = if ctx.reversed { -1.0 } else { 1.0 };
        let centre = ctx.leader.map(|p| p.to_2d()).unwrap_or_else(|| {
            Vector2::new(
                (corner.x + end.x) / 2.0,
                end.y + side * (text_height / 2.0 + text_height * TEXT_GAP_FACTOR),
            )
        });
        let run = TextRun::new(display, centre, text_height, 0.0);
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }

    Ok(RegenOutput::flat(primitives))
}
