//! Interpolating parametric cubic spline used for arc-length resampling.
//!
//! Both coordinates are fitted as not-a-knot cubic splines over the
//! normalized cumulative chord length `u ∈ [0, 1]`, so the curve passes
//! through every input point in order. The third derivative is continuous
//! at the second and second-to-last knots; with four points this is the
//! single cubic through them, and with three points the parabola.

use crate::types::Point;

/// Not-a-knot cubic spline through `(knots[i], values[i])`.
#[derive(Clone, Debug)]
struct CubicSpline1D {
    values: Vec<f64>,
    /// Second derivatives at the knots.
    moments: Vec<f64>,
}

impl CubicSpline1D {
    fn fit(knots: &[f64], values: &[f64]) -> Self {
        let n = values.len();
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let slope = |i: usize| (values[i + 1] - values[i]) / h[i];
        let moments = match n {
            0..=2 => vec![0.0; n],
            3 => {
                let m = 2.0 * (slope(1) - slope(0)) / (h[0] + h[1]);
                vec![m; 3]
            }
            _ => {
                // Interior moments M[1..n-1]; the end moments are eliminated
                // through the not-a-knot conditions
                //   h1 M0 - (h0 + h1) M1 + h0 M2 = 0  (and mirrored at the end),
                // which keeps the system tridiagonal.
                let m = n - 2;
                let mut lower = Vec::with_capacity(m);
                let mut diag = Vec::with_capacity(m);
                let mut upper = Vec::with_capacity(m);
                let mut rhs = Vec::with_capacity(m);
                for i in 1..n - 1 {
                    lower.push(h[i - 1]);
                    diag.push(2.0 * (h[i - 1] + h[i]));
                    upper.push(h[i]);
                    rhs.push(6.0 * (slope(i) - slope(i - 1)));
                }
                let (h0, h1) = (h[0], h[1]);
                diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
                upper[0] = (h1 * h1 - h0 * h0) / h1;
                let (a, b) = (h[n - 3], h[n - 2]);
                lower[m - 1] = (a * a - b * b) / a;
                diag[m - 1] = (a + b) * (2.0 * a + b) / a;

                // Thomas algorithm: forward sweep, then back substitution.
                for i in 1..m {
                    let w = lower[i] / diag[i - 1];
                    diag[i] -= w * upper[i - 1];
                    rhs[i] -= w * rhs[i - 1];
                }
                let mut inner = vec![0.0; m];
                inner[m - 1] = rhs[m - 1] / diag[m - 1];
                for i in (0..m - 1).rev() {
                    inner[i] = (rhs[i] - upper[i] * inner[i + 1]) / diag[i];
                }

                let mut moments = Vec::with_capacity(n);
                moments.push(((h0 + h1) * inner[0] - h0 * inner[1]) / h1);
                moments.extend_from_slice(&inner);
                moments.push(((a + b) * inner[m - 1] - b * inner[m - 2]) / a);
                moments
            }
        };
        Self {
            values: values.to_vec(),
            moments,
        }
    }

    #[inline]
    fn eval_segment(&self, seg: usize, h: f64, t: f64) -> f64 {
        let y0 = self.values[seg];
        let y1 = self.values[seg + 1];
        let m0 = self.moments[seg];
        let m1 = self.moments[seg + 1];
        let slope = (y1 - y0) / h - h * (2.0 * m0 + m1) / 6.0;
        y0 + t * (slope + t * (0.5 * m0 + t * (m1 - m0) / (6.0 * h)))
    }
}

/// Parametric curve `u ↦ (x(u), y(u))` interpolating a point sequence.
#[derive(Clone, Debug)]
pub struct ParametricSpline {
    knots: Vec<f64>,
    x: CubicSpline1D,
    y: CubicSpline1D,
}

impl ParametricSpline {
    /// Fit the spline through `points`.
    ///
    /// Consecutive repeated points are skipped since they span no parameter
    /// interval. Returns `None` when fewer than two distinct points remain.
    pub fn fit(points: &[Point]) -> Option<Self> {
        let mut pts: Vec<Point> = Vec::with_capacity(points.len());
        let mut knots: Vec<f64> = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for p in points {
            match pts.last() {
                None => knots.push(0.0),
                Some(prev) => {
                    let step = prev.distance(p);
                    if step == 0.0 {
                        continue;
                    }
                    total += step;
                    knots.push(total);
                }
            }
            pts.push(*p);
        }
        if pts.len() < 2 || !total.is_finite() || total <= 0.0 {
            return None;
        }
        for k in knots.iter_mut() {
            *k /= total;
        }
        // Pin the last knot so `eval(1.0)` lands on the final point exactly.
        if let Some(last) = knots.last_mut() {
            *last = 1.0;
        }

        let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        Some(Self {
            x: CubicSpline1D::fit(&knots, &xs),
            y: CubicSpline1D::fit(&knots, &ys),
            knots,
        })
    }

    /// Number of interpolated points.
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Evaluate at parameter `u` (clamped to `[0, 1]`).
    pub fn eval(&self, u: f64) -> Point {
        let u = u.clamp(0.0, 1.0);
        let last_seg = self.knots.len() - 2;
        let seg = self
            .knots
            .partition_point(|&k| k <= u)
            .saturating_sub(1)
            .min(last_seg);
        let h = self.knots[seg + 1] - self.knots[seg];
        let t = u - self.knots[seg];
        Point::new(
            self.x.eval_segment(seg, h, t),
            self.y.eval_segment(seg, h, t),
        )
    }

    /// Evaluate at `steps` uniformly spaced parameters, both ends included.
    pub fn sample(&self, steps: usize) -> Vec<Point> {
        match steps {
            0 => Vec::new(),
            1 => vec![self.eval(0.0)],
            _ => {
                let denom = (steps - 1) as f64;
                (0..steps).map(|i| self.eval(i as f64 / denom)).collect()
            }
        }
    }
}
