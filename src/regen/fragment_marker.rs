//! Fragment marker (выносной элемент): a frame around the marked fragment
//! of the drawing, a leader to the annotation point, and a shelf carrying
//! the designation text.

use super::{RegenContext, RegenOutput, ShelfPosition};
use crate::error::Result;
use crate::primitives::{Line, PlineVertex, Polyline, Primitive, TextRun};
use crate::types::Vector2;

/// Frame shape around the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum FrameType {
    /// Stadium: straight sides with semicircular caps
    #[default]
    Rounded = 0,
    /// Plain rectangle
    Rectangular = 1,
}

impl From<i16> for FrameType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Rectangular,
            _ => Self::Rounded,
        }
    }
}

impl FrameType {
    /// The other frame shape (toggle cycling).
    pub fn toggled(&self) -> Self {
        match self {
            Self::Rounded => Self::Rectangular,
            Self::Rectangular => Self::Rounded,
        }
    }
}

/// Vertical gap between shelf and text, as a fraction of text height.
const TEXT_GAP_FACTOR: f64 = 0.3;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let frame_type = FrameType::from(ctx.params.integer("frame_type")?);
    let radius = ctx.scaled("radius")?;
    let shelf_position = ShelfPosition::from(ctx.params.integer("shelf_position")?);
    let shelf_length = ctx.scaled("shelf_length")?;
    let designation = ctx.params.text("designation")?.to_string();
    let text_height = ctx.scaled("text_height")?;

    let start = ctx.insertion.to_2d();
    let end = ctx.end.to_2d();
    let tangent = crate::geometry::segment_tangent(ctx.insertion, ctx.end);
    let normal = -tangent.right_normal();
    let mid = (start + end) / 2.0;

    let mut primitives: Vec<Primitive> = vec![frame(frame_type, start, end, normal, radius)];

    // leader from the frame boundary out to the annotation point
    let leader_end = ctx
        .leader
        .map(|p| p.to_2d())
        .unwrap_or_else(|| mid + normal * (radius * 2.0));
    let towards = (leader_end - mid).normalize();
    let towards = if towards.length() > 0.0 { towards } else { normal };
    let leader_start = mid + towards * radius;
    primitives.push(Line::new(leader_start, leader_end).into());

    // shelf and designation
    let shelf_tip = leader_end + Vector2::UNIT_X * (shelf_position.sign() * shelf_length);
    primitives.push(Line::new(leader_end, shelf_tip).into());

    if !designation.is_empty() {
        let shelf_mid = (leader_end + shelf_tip) / 2.0;
        let centre = shelf_mid + Vector2::UNIT_Y * (text_height / 2.0 + text_height * TEXT_GAP_FACTOR);
        let run = TextRun::new(designation, centre, text_height, 0.0);
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }

    Ok(RegenOutput::flat(primitives))
}

fn frame(
    frame_type: FrameType,
    start: Vector2,
    end: Vector2,
    normal: Vector2,
    radius: f64,
) -> Primitive {
    let mut pl = Polyline::new();
    match frame_type {
        FrameType::Rounded => {
            // straight sides at ±radius, semicircular caps over the axis ends
            pl.add_point(start + normal * radius);
            pl.add_vertex(PlineVertex::with_bulge(end + normal * radius, 1.0));
            pl.add_point(end - normal * radius);
            pl.add_vertex(PlineVertex::with_bulge(start - normal * radius, 1.0));
        }
        FrameType::Rectangular => {
            pl.add_point(start + normal * radius);
            pl.add_point(end + normal * radius);
            pl.add_point(end - normal * radius);
            pl.add_point(start - normal * radius);
        }
    }
    pl.close();
    pl.into()
}
