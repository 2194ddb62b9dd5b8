//! View / section label (обозначение вида): a direction arrow with an open
//! head and the designation letter at its tail.  Section labels add the
//! thick trace stroke of the cutting plane at the insertion point.

use super::{RegenContext, RegenOutput};
use crate::error::Result;
use crate::primitives::{Line, PlineVertex, Polyline, Primitive, TextRun};

/// Label flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum LabelType {
    /// View direction arrow only
    #[default]
    View = 0,
    /// Adds the cutting-plane trace stroke
    Section = 1,
}

impl From<i16> for LabelType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Section,
            _ => Self::View,
        }
    }
}

/// Placement of the designation relative to the arrow tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum TextAlignment {
    #[default]
    Centre = 0,
    Left = 1,
    Right = 2,
}

impl From<i16> for TextAlignment {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Left,
            2 => Self::Right,
            _ => Self::Centre,
        }
    }
}

impl TextAlignment {
    /// Next placement in the cycle (toggle grip).
    pub fn toggled(&self) -> Self {
        match self {
            Self::Centre => Self::Left,
            Self::Left => Self::Right,
            Self::Right => Self::Centre,
        }
    }

    fn shift(&self) -> f64 {
        match self {
            Self::Centre => 0.0,
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Cutting-plane trace stroke width in paper units.
const SECTION_STROKE_WIDTH: f64 = 1.0;

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let label_type = LabelType::from(ctx.params.integer("label_type")?);
    let designation = ctx.params.text("designation")?.to_string();
    let text_height = ctx.scaled("text_height")?;
    let arrow_length = ctx.scaled("arrow_length")?;
    let arrow_angle = ctx.params.real("arrow_angle")?.to_radians();
    let alignment = TextAlignment::from(ctx.params.integer("alignment")?);
    let stroke_length = ctx.scaled("stroke_length")?;

    let ins = ctx.insertion.to_2d();
    let end = ctx.end.to_2d();
    let tangent = crate::geometry::segment_tangent(ctx.insertion, ctx.end);
    let side = if ctx.reversed { -1.0 } else { 1.0 };

    let mut primitives: Vec<Primitive> = vec![Line::new(ins, end).into()];

    // open head: two flanks swept back from the tip
    let back = -tangent;
    primitives.push(Line::new(end, end + back.rotated(arrow_angle) * arrow_length).into());
    primitives.push(Line::new(end, end + back.rotated(-arrow_angle) * arrow_length).into());

    if label_type == LabelType::Section {
        let mut stroke = Polyline::new();
        let width = SECTION_STROKE_WIDTH * ctx.scale;
        stroke.add_vertex(PlineVertex::with_widths(ins, width, width));
        stroke.add_vertex(PlineVertex::new(
            ins + tangent.right_normal() * (side * stroke_length),
        ));
        primitives.push(stroke.into());
    }

    if !designation.is_empty() {
        let centre = ins + back * text_height
            + tangent.right_normal() * (alignment.shift() * text_height);
        let run = TextRun::new(designation, centre, text_height, 0.0);
        primitives.push(run.background_mask(text_height * 0.25).into());
        primitives.push(run.into());
    }

    Ok(RegenOutput::flat(primitives))
}
