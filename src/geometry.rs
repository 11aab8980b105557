//! Curve evaluation and arc-length helpers for reaction paths.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector pointing from `self` to `other`.
    pub fn towards(self, other: Point) -> Point {
        Point {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn around(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    /// Grow to contain `point`, optionally padded by `radius` on every side.
    pub fn include(&mut self, point: Point, radius: f64) {
        self.min_x = self.min_x.min(point.x - radius);
        self.max_x = self.max_x.max(point.x + radius);
        self.min_y = self.min_y.min(point.y - radius);
        self.max_y = self.max_y.max(point.y + radius);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Evaluate a cubic Bezier in Bernstein form at `t`.
pub fn evaluate_cubic_bezier(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    Point {
        x: b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        y: b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    }
}

/// Sample `count` points evenly spaced in `t` over `[0, 1]`.
///
/// The endpoints are returned exactly (not re-evaluated) so chained segments meet.
pub fn sample_curve(p0: Point, p1: Point, p2: Point, p3: Point, count: usize) -> Vec<Point> {
    sample_with(p0, p3, count, |t| evaluate_cubic_bezier(t, p0, p1, p2, p3))
}

pub fn sample_line(p0: Point, p3: Point, count: usize) -> Vec<Point> {
    sample_with(p0, p3, count, |t| Point {
        x: p0.x + (p3.x - p0.x) * t,
        y: p0.y + (p3.y - p0.y) * t,
    })
}

fn sample_with<F>(start: Point, end: Point, count: usize, eval: F) -> Vec<Point>
where
    F: Fn(f64) -> Point,
{
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = count - 1;
            (0..count)
                .map(|i| match i {
                    0 => start,
                    i if i == last => end,
                    i => eval(i as f64 / last as f64),
                })
                .collect()
        }
    }
}

/// Cumulative Euclidean length at every vertex; the first entry is always 0.
pub fn cumulative_lengths(polyline: &[Point]) -> Vec<f64> {
    let mut total = 0.0;
    let mut lengths = Vec::with_capacity(polyline.len());
    if let Some(first) = polyline.first() {
        lengths.push(0.0);
        let mut prev = *first;
        for point in &polyline[1..] {
            total += prev.distance(*point);
            lengths.push(total);
            prev = *point;
        }
    }
    lengths
}

/// Index of the first vertex whose cumulative arc length exceeds `fraction` of the total.
///
/// `fraction = 1` (or a degenerate zero-length polyline) yields the last index. Returns `None` for an
/// empty polyline or a fraction outside `[0, 1]`.
pub fn arc_length_index(polyline: &[Point], fraction: f64) -> Option<usize> {
    if polyline.is_empty() || !(0.0..=1.0).contains(&fraction) {
        return None;
    }
    let lengths = cumulative_lengths(polyline);
    let total = lengths[lengths.len() - 1];
    let target = fraction * total;
    let index = lengths
        .iter()
        .position(|&len| len > target)
        .unwrap_or(lengths.len() - 1);
    Some(index)
}
