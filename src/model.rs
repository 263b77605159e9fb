use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }
}

/// Directed line segment from `a` to `b`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Segment { a, b }
    }

    /// Evaluate the segment at parameter t. Computed in Bézier form so
    /// t = 0 and t = 1 return the endpoints exactly.
    pub fn point_at(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        Vec2 {
            x: mt * self.a.x + t * self.b.x,
            y: mt * self.a.y + t * self.b.y,
        }
    }

    pub fn reversed(&self) -> Segment {
        Segment {
            a: self.b,
            b: self.a,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.a.x.is_finite() && self.a.y.is_finite() && self.b.x.is_finite() && self.b.y.is_finite()
    }
}

/// One intersection between two segments.
///
/// A single crossing is one `Point` record. An overlap is always exactly two
/// `OverlapEndpoint` records bracketing the shared sub-range, each carrying
/// the parameter of that end on segment 1 (`t`) and segment 2 (`s`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SegIntersection {
    #[serde(rename = "point")]
    Point { t: f64, s: f64 },
    #[serde(rename = "overlap_endpoint")]
    OverlapEndpoint { t: f64, s: f64 },
}

impl SegIntersection {
    pub fn t(&self) -> f64 {
        match *self {
            SegIntersection::Point { t, .. } => t,
            SegIntersection::OverlapEndpoint { t, .. } => t,
        }
    }

    pub fn s(&self) -> f64 {
        match *self {
            SegIntersection::Point { s, .. } => s,
            SegIntersection::OverlapEndpoint { s, .. } => s,
        }
    }

    pub fn is_overlap_endpoint(&self) -> bool {
        matches!(self, SegIntersection::OverlapEndpoint { .. })
    }
}
