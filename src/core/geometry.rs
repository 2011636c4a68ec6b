use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Numeric "nothing under the cursor" value for hosts that cannot take an
/// `Option<f64>` from `nearest_hit_distance`.
pub const NO_HIT: f64 = -1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle in pixel space, `y` growing downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rectangle spanned by two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[must_use]
    pub fn inflate(self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    /// Edges are inclusive so a zero-width rect still contains its own line.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    #[must_use]
    pub fn intersects(self, other: Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Euclidean distance from `point` to the rectangle, zero inside.
    #[must_use]
    pub fn distance_to(self, point: Point) -> f64 {
        let dx = (self.x - point.x).max(point.x - self.right()).max(0.0);
        let dy = (self.y - point.y).max(point.y - self.bottom()).max(0.0);
        dx.hypot(dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Line segment with a hit tolerance used for pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    pub hitbox: f64,
}

impl LineSegment {
    #[must_use]
    pub const fn new(start: Point, end: Point, hitbox: f64) -> Self {
        Self { start, end, hitbox }
    }

    /// Distance from `point` to the closest point of the closed segment.
    #[must_use]
    pub fn distance_to(self, point: Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let length_sq = dx * dx + dy * dy;
        if length_sq == 0.0 {
            return point.distance_to(self.start);
        }

        let t = (((point.x - self.start.x) * dx + (point.y - self.start.y) * dy) / length_sq)
            .clamp(0.0, 1.0);
        point.distance_to(Point::new(self.start.x + t * dx, self.start.y + t * dy))
    }

    #[must_use]
    pub fn hit(self, point: Point) -> bool {
        self.distance_to(point) <= self.hitbox
    }

    #[must_use]
    pub fn bounds(self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }

    /// Culling check: the segment's bounding box grown by the hitbox.
    #[must_use]
    pub fn intersects(self, rect: Rect) -> bool {
        self.bounds().inflate(self.hitbox, self.hitbox).intersects(rect)
    }
}

/// One hit-testable region of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Line(LineSegment),
    /// Square handle of half-size `radius` around `center`.
    Handle { center: Point, radius: f64 },
}

impl Shape {
    /// Distance metric for `point` when it lies in this shape's hit zone.
    ///
    /// Rects report zero inside, lines report their perpendicular distance
    /// and handles their distance to the center.
    #[must_use]
    pub fn hit_distance(self, point: Point) -> Option<f64> {
        match self {
            Shape::Rect(rect) => rect.contains(point).then_some(0.0),
            Shape::Line(line) => {
                let distance = line.distance_to(point);
                (distance <= line.hitbox).then_some(distance)
            }
            Shape::Handle { center, radius } => {
                let inside = (point.x - center.x).abs() <= radius
                    && (point.y - center.y).abs() <= radius;
                inside.then(|| point.distance_to(center))
            }
        }
    }

    #[must_use]
    pub fn bounds(self) -> Rect {
        match self {
            Shape::Rect(rect) => rect,
            Shape::Line(line) => line.bounds().inflate(line.hitbox, line.hitbox),
            Shape::Handle { center, radius } => {
                Rect::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
            }
        }
    }

    #[must_use]
    pub fn intersects(self, rect: Rect) -> bool {
        self.bounds().intersects(rect)
    }
}

/// Smallest hit distance among `shapes`, or `None` when nothing is hit.
pub fn nearest_hit_distance<'a>(
    shapes: impl IntoIterator<Item = &'a Shape>,
    point: Point,
) -> Option<f64> {
    shapes
        .into_iter()
        .filter_map(|shape| shape.hit_distance(point))
        .min_by_key(|distance| OrderedFloat(*distance))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{LineSegment, Point, Rect, Shape, nearest_hit_distance};

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let line = LineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 3.0);
        assert_relative_eq!(line.distance_to(Point::new(5.0, 2.0)), 2.0);
        assert_relative_eq!(line.distance_to(Point::new(13.0, 4.0)), 5.0);
        assert!(line.hit(Point::new(5.0, 3.0)));
        assert!(!line.hit(Point::new(5.0, 3.5)));
    }

    #[test]
    fn degenerate_segment_measures_to_its_point() {
        let line = LineSegment::new(Point::new(2.0, 2.0), Point::new(2.0, 2.0), 1.0);
        assert_relative_eq!(line.distance_to(Point::new(5.0, 6.0)), 5.0);
    }

    #[test]
    fn rect_intersection_is_edge_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert_relative_eq!(a.distance_to(Point::new(13.0, 14.0)), 5.0);
    }

    #[test]
    fn nearest_hit_prefers_smallest_distance() {
        let shapes = [
            Shape::Line(LineSegment::new(
                Point::new(0.0, 10.0),
                Point::new(100.0, 10.0),
                4.0,
            )),
            Shape::Handle {
                center: Point::new(50.0, 12.0),
                radius: 5.0,
            },
        ];
        let distance = nearest_hit_distance(&shapes, Point::new(50.0, 13.0)).expect("hit");
        assert_relative_eq!(distance, 1.0);
        assert_eq!(nearest_hit_distance(&shapes, Point::new(50.0, 40.0)), None);
    }
}
