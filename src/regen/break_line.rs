//! Break line (линия обрыва): the axis between the control points with a
//! standard break symbol at its midpoint, optionally extended past both
//! ends by an overhang.

use super::{RegenContext, RegenOutput};
use crate::error::Result;
use crate::primitives::{PlineVertex, Polyline, Primitive};
use crate::types::Vector2;

/// Shape of the break symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum BreakType {
    /// Straight zigzag crossing the axis
    #[default]
    Linear = 0,
    /// Wave of two opposed arcs
    Curvilinear = 1,
    /// Lens of two arcs, for cylindrical parts
    Cylindrical = 2,
}

impl From<i16> for BreakType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Curvilinear,
            2 => Self::Cylindrical,
            _ => Self::Linear,
        }
    }
}

pub(crate) fn regenerate(ctx: &RegenContext) -> Result<RegenOutput> {
    let break_type = BreakType::from(ctx.params.integer("break_type")?);
    let overhang = ctx.scaled("overhang")?;
    let width = ctx.scaled("break_width")?;
    let height = ctx.scaled("break_height")?;

    let start = ctx.insertion.to_2d();
    let end = ctx.end.to_2d();
    let tangent = crate::geometry::segment_tangent(ctx.insertion, ctx.end);
    // zigzag rises to the left of the travel direction first
    let normal = -tangent.right_normal();
    let mid = (start + end) / 2.0;

    let primitives = match break_type {
        BreakType::Linear => linear(start, end, mid, tangent, normal, overhang, width, height),
        BreakType::Curvilinear => {
            curvilinear(start, end, mid, tangent, overhang, width, height)
        }
        BreakType::Cylindrical => {
            cylindrical(start, end, mid, tangent, normal, overhang, width, height)
        }
    };
    Ok(RegenOutput::flat(primitives))
}

#[allow(clippy::too_many_arguments)]
fn linear(
    start: Vector2,
    end: Vector2,
    mid: Vector2,
    tangent: Vector2,
    normal: Vector2,
    overhang: f64,
    width: f64,
    height: f64,
) -> Vec<Primitive> {
    let mut pl = Polyline::new();
    if overhang > 0.0 {
        pl.add_point(start - tangent * overhang);
    }
    pl.add_point(start);
    pl.add_point(mid - tangent * (width / 2.0));
    pl.add_point(mid - tangent * (width / 4.0) + normal * (height / 2.0));
    pl.add_point(mid);
    pl.add_point(mid + tangent * (width / 4.0) - normal * (height / 2.0));
    pl.add_point(mid + tangent * (width / 2.0));
    pl.add_point(end);
    if overhang > 0.0 {
        pl.add_point(end + tangent * overhang);
    }
    vec![pl.into()]
}

fn curvilinear(
    start: Vector2,
    end: Vector2,
    mid: Vector2,
    tangent: Vector2,
    overhang: f64,
    width: f64,
    height: f64,
) -> Vec<Primitive> {
    // two opposed arcs, each of chord width/2 and sagitta height/2:
    // bulge = 2 * sagitta / chord
    let bulge = if width > 0.0 { 2.0 * height / width } else { 0.0 };
    let mut pl = Polyline::new();
    if overhang > 0.0 {
        pl.add_point(start - tangent * overhang);
    }
    pl.add_point(start);
    pl.add_point_with_bulge(mid - tangent * (width / 2.0), bulge);
    pl.add_point_with_bulge(mid, -bulge);
    pl.add_point(mid + tangent * (width / 2.0));
    pl.add_point(end);
    if overhang > 0.0 {
        pl.add_point(end + tangent * overhang);
    }
    vec![pl.into()]
}

#[allow(clippy::too_many_arguments)]
fn cylindrical(
    start: Vector2,
    end: Vector2,
    mid: Vector2,
    tangent: Vector2,
    normal: Vector2,
    overhang: f64,
    width: f64,
    height: f64,
) -> Vec<Primitive> {
    // axis halves stop at the lens edges
    let mut left = Polyline::new();
    if overhang > 0.0 {
        left.add_point(start - tangent * overhang);
    }
    left.add_point(start);
    left.add_point(mid - tangent * (width / 2.0));

    let mut right = Polyline::new();
    right.add_point(mid + tangent * (width / 2.0));
    right.add_point(end);
    if overhang > 0.0 {
        right.add_point(end + tangent * overhang);
    }

    // the lens: two arcs between the same top and bottom points, one bowing
    // backwards, one forwards; sagitta of each is width/4
    let top = mid + normal * (height / 2.0);
    let bottom = mid - normal * (height / 2.0);
    let bulge = if height > 0.0 { width / (2.0 * height) } else { 0.0 };
    let mut lens = Polyline::new();
    lens.add_vertex(PlineVertex::with_bulge(top, bulge));
    lens.add_vertex(PlineVertex::with_bulge(bottom, bulge));
    lens.close();

    vec![left.into(), lens.into(), right.into()]
}
