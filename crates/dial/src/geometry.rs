use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// True when `self` lies in the axis-aligned square of half-size `half_extent` around
    /// `center`.
    pub fn within_box(&self, center: Point, half_extent: f64) -> bool {
        (self.x - center.x).abs() <= half_extent && (self.y - center.y).abs() <= half_extent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Stroke and touch sizes of the dial, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DialStyle {
    pub stroke: f64,
    pub thumb_size: f64,
    pub touch_stroke: f64,
}

impl Default for DialStyle {
    fn default() -> Self {
        Self {
            stroke: 28.0,
            thumb_size: 36.0,
            touch_stroke: 120.0,
        }
    }
}

impl DialStyle {
    pub fn padding(&self) -> f64 {
        self.thumb_size.max(self.stroke)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DialGeometry {
    pub center: Point,
    pub radius: f64,
}

impl DialGeometry {
    pub fn calculate(bounds: Bounds, style: &DialStyle) -> Self {
        let radius =
            bounds.width.min(bounds.height) / 2.0 - style.padding() - style.stroke / 2.0;

        Self {
            center: bounds.center(),
            radius: radius.max(0.0),
        }
    }

    /// Point on the track for an applied angle. Zero sits straight below the center and
    /// angles grow clockwise on a y-down surface.
    pub fn point_at(&self, applied_angle: f64) -> Point {
        let theta = (90.0 + applied_angle).to_radians();
        Point::new(
            self.center.x + self.radius * theta.cos(),
            self.center.y + self.radius * theta.sin(),
        )
    }

    pub fn distance_from_center(&self, p: Point) -> f64 {
        self.center.distance(p)
    }

    /// Direction from the pointer towards the center, in degrees within (-180, 180].
    pub fn pointer_angle(&self, p: Point) -> f64 {
        (self.center.y - p.y).atan2(self.center.x - p.x).to_degrees()
    }

    pub fn on_track(&self, p: Point, tolerance: f64) -> bool {
        let d = self.distance_from_center(p);
        d >= self.radius - tolerance && d <= self.radius + tolerance
    }
}
