//! Path geometry: monotone-X interpolation, partial reveal, and dash splitting.

use super::scene::Point;

/// Segments per cubic when flattening a curve into a polyline.
const SAMPLES_PER_SEGMENT: usize = 16;

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Interior tangent from the neighbouring secant slopes (Steffen's method).
fn slope3(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = (p1.y - p0.y) / if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let s1 = (p2.y - p1.y) / if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_nan() { 0.0 } else { t }
}

/// Endpoint tangent from the secant and the neighbour's tangent.
fn slope2(p0: Point, p1: Point, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h != 0.0 {
        (3.0 * (p1.y - p0.y) / h - t) / 2.0
    } else {
        t
    }
}

fn push_cubic(out: &mut Vec<Point>, p0: Point, p1: Point, t0: f64, t1: f64) {
    let dx = (p1.x - p0.x) / 3.0;
    let c1 = Point::new(p0.x + dx, p0.y + dx * t0);
    let c2 = Point::new(p1.x - dx, p1.y - dx * t1);
    for i in 1..=SAMPLES_PER_SEGMENT {
        let s = i as f64 / SAMPLES_PER_SEGMENT as f64;
        let u = 1.0 - s;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * s;
        let b2 = 3.0 * u * s * s;
        let b3 = s * s * s;
        out.push(Point::new(
            b0 * p0.x + b1 * c1.x + b2 * c2.x + b3 * p1.x,
            b0 * p0.y + b1 * c1.y + b2 * c2.y + b3 * p1.y,
        ));
    }
}

/// Flatten a monotone-in-x cubic through `points` into a polyline.
///
/// The curve passes through every input point and does not overshoot
/// between them. Fewer than three points yield straight segments.
pub fn monotone_x(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let n = points.len();
    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = slope2(points[0], points[1], tangents[1]);
    tangents[n - 1] = slope2(points[n - 1], points[n - 2], tangents[n - 2]);

    let mut out = Vec::with_capacity(1 + (n - 1) * SAMPLES_PER_SEGMENT);
    out.push(points[0]);
    for i in 0..n - 1 {
        push_cubic(&mut out, points[i], points[i + 1], tangents[i], tangents[i + 1]);
    }
    out
}

pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// The leading `fraction` of a polyline by arc length.
pub fn truncate(points: &[Point], fraction: f64) -> Vec<Point> {
    if fraction >= 1.0 || points.len() < 2 {
        return points.to_vec();
    }
    if fraction <= 0.0 {
        return points.first().map(|p| vec![*p]).unwrap_or_default();
    }
    let mut remaining = path_length(points) * fraction;
    let mut out = vec![points[0]];
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if len >= remaining {
            let t = if len > 0.0 { remaining / len } else { 0.0 };
            out.push(w[0].lerp(w[1], t));
            break;
        }
        remaining -= len;
        out.push(w[1]);
    }
    out
}

/// Split a polyline into the "on" runs of a `(dash, gap)` pattern.
pub fn dashes(points: &[Point], dash: f64, gap: f64) -> Vec<Vec<Point>> {
    if dash <= 0.0 || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let gap = gap.max(0.0);
    let mut runs = Vec::new();
    let mut current = vec![points[0]];
    let mut on = true;
    let mut left = dash;
    for w in points.windows(2) {
        let (mut a, b) = (w[0], w[1]);
        let mut len = a.distance(b);
        while len > left {
            let cut = a.lerp(b, left / len);
            if on {
                current.push(cut);
                runs.push(std::mem::take(&mut current));
            } else {
                current = vec![cut];
            }
            len -= left;
            a = cut;
            on = !on;
            left = if on { dash } else { gap };
        }
        left -= len;
        if on {
            current.push(b);
        }
    }
    if on && current.len() > 1 {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn monotone_passes_through_inputs() {
        let input = pts(&[(0.0, 0.0), (10.0, 5.0), (20.0, 5.0), (30.0, 20.0)]);
        let out = monotone_x(&input);
        for p in &input {
            assert!(out.iter().any(|q| q.distance(*p) < 1e-9));
        }
    }

    #[test]
    fn monotone_does_not_overshoot_flat_runs() {
        let input = pts(&[(0.0, 0.0), (10.0, 10.0), (20.0, 10.0), (30.0, 0.0)]);
        let out = monotone_x(&input);
        assert!(out.iter().all(|p| p.y <= 10.0 + 1e-9 && p.y >= -1e-9));
    }

    #[test]
    fn short_inputs_stay_straight() {
        let input = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(monotone_x(&input), input);
    }

    #[test]
    fn truncate_halves_length() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let half = truncate(&line, 0.5);
        assert_eq!(half.last().copied(), Some(Point::new(10.0, 0.0)));
        assert!((path_length(&half) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn dashes_alternate() {
        let line = pts(&[(0.0, 0.0), (20.0, 0.0)]);
        let runs = dashes(&line, 5.0, 5.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], pts(&[(0.0, 0.0), (5.0, 0.0)]));
        assert_eq!(runs[1], pts(&[(10.0, 0.0), (15.0, 0.0)]));
    }
}
