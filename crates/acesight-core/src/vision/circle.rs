//! Minimal enclosing circle (Welzl, iterative form).

use super::frame::Point;

const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        (x - self.cx).hypot(y - self.cy) <= self.radius + EPSILON
    }

    /// Center truncated to whole pixels
    pub fn center(&self) -> Point {
        // Absorb rounding error so 11.999999 lands on pixel 12
        Point::new(
            (self.cx + EPSILON).floor() as i32,
            (self.cy + EPSILON).floor() as i32,
        )
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let cx = (a.0 + b.0) / 2.0;
        let cy = (a.1 + b.1) / 2.0;
        Self {
            cx,
            cy,
            radius: (a.0 - cx).hypot(a.1 - cy),
        }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < EPSILON {
            // Collinear: the widest pair spans the others
            return [
                Self::from_two(a, b),
                Self::from_two(a, c),
                Self::from_two(b, c),
            ]
            .into_iter()
            .fold(Self::from_two(a, b), |best, candidate| {
                if candidate.radius > best.radius {
                    candidate
                } else {
                    best
                }
            });
        }
        let sq = |p: (f64, f64)| p.0 * p.0 + p.1 * p.1;
        let cx = (sq(a) * (b.1 - c.1) + sq(b) * (c.1 - a.1) + sq(c) * (a.1 - b.1)) / d;
        let cy = (sq(a) * (c.0 - b.0) + sq(b) * (a.0 - c.0) + sq(c) * (b.0 - a.0)) / d;
        Self {
            cx,
            cy,
            radius: (a.0 - cx).hypot(a.1 - cy),
        }
    }
}

/// Smallest circle containing every point, or `None` for no points
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    let mut pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let first = *pts.first()?;
    shuffle(&mut pts);

    let mut circle = Circle {
        cx: first.0,
        cy: first.1,
        radius: 0.0,
    };
    for i in 0..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle {
            cx: pts[i].0,
            cy: pts[i].1,
            radius: 0.0,
        };
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}

/// Deterministic Fisher-Yates (xorshift) so results are reproducible
fn shuffle<T>(items: &mut [T]) {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    for i in (1..items.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}
