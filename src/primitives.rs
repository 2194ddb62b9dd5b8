//! Derived drawable primitives.
//!
//! Regeneration turns a smart entity into an ordered list of these values.
//! They are the contents of the host's anonymous block: plain geometry with
//! no handles, layers or colors (those are inherited "by block" on the host
//! side).  Everything lives in the entity's OCS drawing plane.

use crate::types::Vector2;

/// Average glyph width as a fraction of text height, used to estimate text
/// runs without a font engine.
pub const TEXT_WIDTH_FACTOR: f64 = 0.8;

/// A vertex of a derived polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    /// Vertex location in the drawing plane
    pub point: Vector2,
    /// Bulge of the segment leaving this vertex
    /// (0 = straight, `tan(included_angle / 4)` for arcs)
    pub bulge: f64,
    /// Segment width at this vertex
    pub start_width: f64,
    /// Segment width at the next vertex
    pub end_width: f64,
}

impl PlineVertex {
    /// Straight vertex with zero widths
    pub fn new(point: Vector2) -> Self {
        PlineVertex {
            point,
            bulge: 0.0,
            start_width: 0.0,
            end_width: 0.0,
        }
    }

    /// Vertex whose outgoing segment is an arc
    pub fn with_bulge(point: Vector2, bulge: f64) -> Self {
        PlineVertex { bulge, ..Self::new(point) }
    }

    /// Vertex whose outgoing segment tapers between two widths
    pub fn with_widths(point: Vector2, start_width: f64, end_width: f64) -> Self {
        PlineVertex {
            start_width,
            end_width,
            ..Self::new(point)
        }
    }
}

/// A derived polyline (vertices with bulge and width).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Polyline {
    /// Create an empty open polyline
    pub fn new() -> Self {
        Polyline::default()
    }

    /// Create an open polyline through the given points
    pub fn from_points(points: impl IntoIterator<Item = Vector2>) -> Self {
        Polyline {
            vertices: points.into_iter().map(PlineVertex::new).collect(),
            closed: false,
        }
    }

    /// Append a straight vertex
    pub fn add_point(&mut self, point: Vector2) {
        self.vertices.push(PlineVertex::new(point));
    }

    /// Append a vertex with a bulge on its outgoing segment
    pub fn add_point_with_bulge(&mut self, point: Vector2, bulge: f64) {
        self.vertices.push(PlineVertex::with_bulge(point, bulge));
    }

    /// Append an arbitrary vertex
    pub fn add_vertex(&mut self, vertex: PlineVertex) {
        self.vertices.push(vertex);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Mark the polyline closed
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// A single derived line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vector2,
    pub end: Vector2,
}

impl Line {
    /// Create a line segment
    pub fn new(start: Vector2, end: Vector2) -> Self {
        Line { start, end }
    }

    /// Segment length
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// A derived text run, anchored at its middle-center point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Text content
    pub value: String,
    /// Middle-center anchor in the drawing plane
    pub position: Vector2,
    /// Text height (already scaled to model units)
    pub height: f64,
    /// Rotation in radians (0 = horizontal)
    pub rotation: f64,
}

impl TextRun {
    /// Create a text run
    pub fn new(value: impl Into<String>, position: Vector2, height: f64, rotation: f64) -> Self {
        TextRun {
            value: value.into(),
            position,
            height,
            rotation,
        }
    }

    /// Estimated rendered width (no font engine; see [`TEXT_WIDTH_FACTOR`])
    pub fn estimated_width(&self) -> f64 {
        self.value.chars().count() as f64 * self.height * TEXT_WIDTH_FACTOR
    }

    /// Background mask covering this run plus a margin on every side
    pub fn background_mask(&self, margin: f64) -> Mask {
        let hw = self.estimated_width() / 2.0 + margin;
        let hh = self.height / 2.0 + margin;
        let corners = [
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ];
        Mask {
            corners: corners.map(|c| self.position + c.rotated(self.rotation)),
        }
    }
}

/// A background-masking quad (host wipeout).  Corners run counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    pub corners: [Vector2; 4],
}

/// One derived drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polyline(Polyline),
    Line(Line),
    Text(TextRun),
    Mask(Mask),
}

impl Primitive {
    /// True for primitives that paint geometry (everything but masks)
    pub fn is_geometry(&self) -> bool {
        !matches!(self, Primitive::Mask(_))
    }
}

impl From<Polyline> for Primitive {
    fn from(p: Polyline) -> Self {
        Primitive::Polyline(p)
    }
}

impl From<Line> for Primitive {
    fn from(l: Line) -> Self {
        Primitive::Line(l)
    }
}

impl From<TextRun> for Primitive {
    fn from(t: TextRun) -> Self {
        Primitive::Text(t)
    }
}

impl From<Mask> for Primitive {
    fn from(m: Mask) -> Self {
        Primitive::Mask(m)
    }
}
