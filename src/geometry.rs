use iced::{Point, Rectangle};

/// Inclusive on every side, unlike `Rectangle::contains`.
pub fn contains(bounds: &Rectangle, point: Point) -> bool {
    point.x >= bounds.x
        && point.x <= bounds.x + bounds.width
        && point.y >= bounds.y
        && point.y <= bounds.y + bounds.height
}

pub fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

pub fn center(bounds: &Rectangle) -> Point {
    Point::new(bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0)
}

/// The four anchors an edge may attach to, in fixed order:
/// top (one fifth across), bottom center, left middle, right middle.
pub fn connection_points(bounds: &Rectangle) -> [Point; 4] {
    let Rectangle { x, y, width, height } = *bounds;
    [
        Point::new(x + width / 5.0, y),
        Point::new(x + width / 2.0, y + height),
        Point::new(x, y + height / 2.0),
        Point::new(x + width, y + height / 2.0),
    ]
}

/// Point of `points` nearest to `target`. Ties keep the earliest point.
pub fn closest_point(points: &[Point], target: Point) -> Option<Point> {
    points
        .iter()
        .fold(None, |best: Option<(Point, f32)>, &point| {
            let dist = distance(point, target);
            match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((point, dist)),
            }
        })
        .map(|(point, _)| point)
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(point, a);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(point, Point::new(a.x + t * dx, a.y + t * dy))
}
