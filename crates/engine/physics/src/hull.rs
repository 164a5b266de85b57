//! 2D convex hulls and convex polygon queries
//!
//! Hulls are built by gift wrapping and stored counterclockwise. Every
//! inside/outside and nearest-edge query below relies on that winding and
//! on the sign convention of [`orientation`].

use glam::DVec2;
use math::is_close;

/// Turn direction of three points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Counterclockwise,
    Collinear,
}

/// Orientation of the path `p -> q -> r`
///
/// Based on `(q.y-p.y)(r.x-q.x) - (q.x-p.x)(r.y-q.y)`: positive is
/// clockwise, negative counterclockwise, within tolerance of zero collinear.
pub fn orientation(p: DVec2, q: DVec2, r: DVec2) -> Orientation {
    let value = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if is_close(value, 0.0) {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Counterclockwise
    }
}

fn points_close(a: DVec2, b: DVec2) -> bool {
    is_close(a.x, b.x) && is_close(a.y, b.y)
}

/// Whether a counterclockwise convex polygon contains `point`
///
/// With `strict`, points on an edge (collinear with it) are outside.
/// Polygons with fewer than three vertices contain only the points on them,
/// and never contain anything strictly.
pub fn polygon_contains(polygon: &[DVec2], point: DVec2, strict: bool) -> bool {
    match polygon {
        [] => false,
        [single] => !strict && points_close(*single, point),
        [a, b] => !strict && on_segment(*a, *b, point),
        _ => {
            let mut previous = polygon[polygon.len() - 1];
            for &current in polygon {
                match orientation(previous, current, point) {
                    Orientation::Clockwise => return false,
                    Orientation::Collinear if strict => return false,
                    _ => {}
                }
                previous = current;
            }
            true
        }
    }
}

fn on_segment(a: DVec2, b: DVec2, point: DVec2) -> bool {
    if orientation(a, b, point) != Orientation::Collinear {
        return false;
    }
    let (min, max) = (a.min(b), a.max(b));
    (point.x > min.x || is_close(point.x, min.x))
        && (point.x < max.x || is_close(point.x, max.x))
        && (point.y > min.y || is_close(point.y, min.y))
        && (point.y < max.y || is_close(point.y, max.y))
}

/// Closest point to `point` on segment `a-b`, with its parameter in `[0, 1]`
fn project_on_segment(a: DVec2, b: DVec2, point: DVec2) -> (DVec2, f64) {
    let ab = b - a;
    let length_squared = ab.length_squared();
    if length_squared == 0.0 {
        return (a, 0.0);
    }
    let t = ((point - a).dot(ab) / length_squared).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Outward unit normal of the counterclockwise edge `a -> b`
fn edge_normal(a: DVec2, b: DVec2) -> DVec2 {
    let d = b - a;
    DVec2::new(d.y, -d.x).normalize_or_zero()
}

/// Counterclockwise convex hull of a 2D point set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexHull {
    points: Vec<DVec2>,
}

impl ConvexHull {
    /// Gift-wrap the hull of `points`
    ///
    /// Coincident points are merged first. Wrapping starts at the leftmost
    /// point (lowest Y on ties) and always moves to the most
    /// counterclockwise candidate, preferring the farthest of collinear
    /// candidates so intermediate points on an edge are dropped.
    pub fn from_points<I: IntoIterator<Item = DVec2>>(points: I) -> Self {
        let mut unique: Vec<DVec2> = Vec::new();
        for point in points {
            if !unique.iter().any(|p| points_close(*p, point)) {
                unique.push(point);
            }
        }
        let n = unique.len();
        if n < 3 {
            return Self { points: unique };
        }

        let start = (0..n)
            .min_by(|&i, &j| {
                unique[i]
                    .x
                    .total_cmp(&unique[j].x)
                    .then(unique[i].y.total_cmp(&unique[j].y))
            })
            .unwrap_or(0);

        let mut hull = Vec::new();
        let mut p = start;
        loop {
            hull.push(unique[p]);
            let mut q = (p + 1) % n;
            for i in 0..n {
                if i == p || i == q {
                    continue;
                }
                match orientation(unique[p], unique[i], unique[q]) {
                    Orientation::Counterclockwise => q = i,
                    Orientation::Collinear
                        if unique[p].distance_squared(unique[i])
                            > unique[p].distance_squared(unique[q]) =>
                    {
                        q = i
                    }
                    _ => {}
                }
            }
            p = q;
            if p == start || hull.len() >= n {
                break;
            }
        }
        Self { points: hull }
    }

    /// Hull vertices in counterclockwise order
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices; the hull encloses no area
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Inside or on the boundary
    pub fn is_in_bounds(&self, point: DVec2) -> bool {
        polygon_contains(&self.points, point, false)
    }

    /// Inside and not on the boundary
    pub fn is_strictly_in_bounds(&self, point: DVec2) -> bool {
        polygon_contains(&self.points, point, true)
    }

    /// Closest point on the hull boundary, and the edge it lies on
    ///
    /// Returns the edge start index and the segment parameter.
    fn nearest_edge(&self, point: DVec2) -> Option<(DVec2, usize, f64)> {
        let n = self.points.len();
        match n {
            0 => None,
            1 => Some((self.points[0], 0, 0.0)),
            _ => (0..n)
                .map(|i| {
                    let (nearest, t) =
                        project_on_segment(self.points[i], self.points[(i + 1) % n], point);
                    (nearest, i, t)
                })
                .min_by(|a, b| a.0.distance_squared(point).total_cmp(&b.0.distance_squared(point))),
        }
    }

    /// Closest point on the hull boundary
    pub fn nearest_bounds_point(&self, point: DVec2) -> Option<DVec2> {
        self.nearest_edge(point).map(|(nearest, _, _)| nearest)
    }

    /// Outward normal of the boundary at the point closest to `point`
    ///
    /// On an edge this is the edge's outward perpendicular. At a hull vertex
    /// it is the bisector of the two adjacent edge normals. A single-point
    /// hull has no normal.
    pub fn nearest_bounds_normal(&self, point: DVec2) -> Option<DVec2> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let (_, edge, t) = self.nearest_edge(point)?;
        let normal_of = |i: usize| edge_normal(self.points[i % n], self.points[(i + 1) % n]);

        let normal = if n == 2 {
            // Segment hull: face the side the point is on
            let normal = normal_of(edge);
            if (point - self.points[edge]).dot(normal) < 0.0 {
                -normal
            } else {
                normal
            }
        } else if is_close(t, 0.0) {
            (normal_of(edge + n - 1) + normal_of(edge)).normalize_or_zero()
        } else if is_close(t, 1.0) {
            (normal_of(edge) + normal_of(edge + 1)).normalize_or_zero()
        } else {
            normal_of(edge)
        };
        Some(normal)
    }
}
