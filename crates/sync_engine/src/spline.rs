//! Piecewise polynomial kernels.
//!
//! `CubicSpline` is a C2 cubic spline with not-a-knot end conditions. Node
//! slopes come from a tridiagonal system solved with the Thomas algorithm;
//! each segment then stores its Horner coefficients so evaluation is a
//! binary search plus four multiply-adds.
//!
//! All kernels assume strictly increasing nodes and `nodes.len() ==
//! values.len()`; the caller checks both.

/// Index of the segment `[x_i, x_{i+1}]` holding `t`, clamped to the end segments.
fn segment_index(nodes: &[f64], t: f64) -> usize {
    let upper = nodes.partition_point(|&x| x <= t);
    upper.saturating_sub(1).min(nodes.len() - 2)
}

/// Not-a-knot cubic spline (needs at least 4 nodes)
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    nodes: Vec<f64>,
    /// Per segment: `[value, slope, quadratic, cubic]` in powers of `t - x_i`
    coeffs: Vec<[f64; 4]>,
    end_value: f64,
}

impl CubicSpline {
    pub fn fit(nodes: &[f64], values: &[f64]) -> Self {
        let n = nodes.len();
        debug_assert!(n >= 4);
        debug_assert_eq!(n, values.len());

        let dx: Vec<f64> = nodes.windows(2).map(|w| w[1] - w[0]).collect();
        let secant: Vec<f64> = values
            .windows(2)
            .zip(&dx)
            .map(|(w, h)| (w[1] - w[0]) / h)
            .collect();

        let slopes = Self::solve_slopes(nodes, &dx, &secant);

        let coeffs = (0..n - 1)
            .map(|i| {
                let h = dx[i];
                let curvature = (slopes[i] + slopes[i + 1] - 2.0 * secant[i]) / h;
                [
                    values[i],
                    slopes[i],
                    (secant[i] - slopes[i]) / h - curvature,
                    curvature / h,
                ]
            })
            .collect();

        Self {
            nodes: nodes.to_vec(),
            coeffs,
            end_value: values[n - 1],
        }
    }

    /// Tridiagonal system for the first derivative at every node.
    ///
    /// Interior rows enforce C2 continuity; the first and last rows enforce a
    /// continuous third derivative across the second and second-to-last nodes.
    fn solve_slopes(nodes: &[f64], dx: &[f64], secant: &[f64]) -> Vec<f64> {
        let n = nodes.len();
        let mut sub = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut sup = vec![0.0; n];
        let mut rhs = vec![0.0; n];

        let d = nodes[2] - nodes[0];
        diag[0] = dx[1];
        sup[0] = d;
        rhs[0] = ((dx[0] + 2.0 * d) * dx[1] * secant[0] + dx[0] * dx[0] * secant[1]) / d;

        for i in 1..n - 1 {
            sub[i] = dx[i];
            diag[i] = 2.0 * (dx[i - 1] + dx[i]);
            sup[i] = dx[i - 1];
            rhs[i] = 3.0 * (dx[i] * secant[i - 1] + dx[i - 1] * secant[i]);
        }

        let d = nodes[n - 1] - nodes[n - 3];
        sub[n - 1] = d;
        diag[n - 1] = dx[n - 3];
        rhs[n - 1] = (dx[n - 2] * dx[n - 2] * secant[n - 3]
            + (2.0 * d + dx[n - 2]) * dx[n - 3] * secant[n - 2])
            / d;

        thomas(&sub, &diag, &sup, &mut rhs);
        rhs
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        if t == self.nodes[self.nodes.len() - 1] {
            return self.end_value;
        }
        let i = segment_index(&self.nodes, t);
        let dt = t - self.nodes[i];
        let [c0, c1, c2, c3] = self.coeffs[i];
        ((c3 * dt + c2) * dt + c1).mul_add(dt, c0)
    }

    /// First derivative, used to check smoothness across nodes
    #[cfg(test)]
    fn derivative(&self, t: f64) -> f64 {
        let i = segment_index(&self.nodes, t);
        let dt = t - self.nodes[i];
        let [_, c1, c2, c3] = self.coeffs[i];
        (3.0 * c3 * dt + 2.0 * c2).mul_add(dt, c1)
    }
}

/// In-place Thomas algorithm; `rhs` holds the solution on return.
///
/// Every pivot of the not-a-knot system is positive for strictly increasing
/// nodes, so no pivoting is needed.
fn thomas(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &mut [f64]) {
    let n = diag.len();
    let mut upper = vec![0.0; n];

    upper[0] = sup[0] / diag[0];
    rhs[0] /= diag[0];
    for i in 1..n {
        let pivot = diag[i] - sub[i] * upper[i - 1];
        upper[i] = sup[i] / pivot;
        rhs[i] = (rhs[i] - sub[i] * rhs[i - 1]) / pivot;
    }
    for i in (0..n - 1).rev() {
        rhs[i] -= upper[i] * rhs[i + 1];
    }
}

/// Piecewise linear (needs at least 2 nodes)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegments {
    nodes: Vec<f64>,
    values: Vec<f64>,
}

impl LinearSegments {
    pub fn fit(nodes: &[f64], values: &[f64]) -> Self {
        debug_assert!(nodes.len() >= 2);
        Self {
            nodes: nodes.to_vec(),
            values: values.to_vec(),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let i = segment_index(&self.nodes, t);
        let (x0, x1) = (self.nodes[i], self.nodes[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        if t == x1 {
            return y1;
        }
        let frac = (t - x0) / (x1 - x0);
        frac.mul_add(y1 - y0, y0)
    }
}

/// Value of the closest node; ties go to the earlier node (needs at least 1 node)
#[derive(Debug, Clone, PartialEq)]
pub struct NearestNode {
    nodes: Vec<f64>,
    values: Vec<f64>,
}

impl NearestNode {
    pub fn fit(nodes: &[f64], values: &[f64]) -> Self {
        debug_assert!(!nodes.is_empty());
        Self {
            nodes: nodes.to_vec(),
            values: values.to_vec(),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let upper = self.nodes.partition_point(|&x| x <= t);
        if upper == 0 {
            return self.values[0];
        }
        if upper == self.nodes.len() {
            return self.values[upper - 1];
        }
        let before = t - self.nodes[upper - 1];
        let after = self.nodes[upper] - t;
        if before <= after {
            self.values[upper - 1]
        } else {
            self.values[upper]
        }
    }
}
