//! One-dimensional interpolating B-spline (zero smoothing).
//!
//! Given strictly increasing parameters `u_i` and values `v_i`, builds the
//! degree-`k` spline `s` with `s(u_i) = v_i` for every `i`. Coefficients come
//! from the square collocation system `B · c = v`, where
//! `B[i][j] = B_{j,k}(u_i)`.

use nalgebra::DMatrix;

use crate::math::{basis_functions, evaluate, find_span, interpolation_knots, solve_square};

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatingSpline {
    degree: usize,
    knots: Vec<f64>,
    coefs: Vec<f64>,
}

impl InterpolatingSpline {
    /// Interpolate `values` at `params`.
    pub fn new(params: &[f64], values: &[f64], degree: usize) -> Result<Self, String> {
        let mut splines = Self::fit_many(params, &[values], degree)?;
        splines
            .pop()
            .ok_or_else(|| "no spline produced".to_string())
    }

    /// Interpolate several value series over the same parameters.
    ///
    /// The collocation matrix depends only on `params` and `degree`, so it is
    /// factored once and reused for every series.
    pub fn fit_many(params: &[f64], series: &[&[f64]], degree: usize) -> Result<Vec<Self>, String> {
        let n = params.len();
        if degree == 0 {
            return Err("degree must be at least 1".to_string());
        }
        if n < degree + 1 {
            return Err(format!("need at least {} points for degree {degree}, got {n}", degree + 1));
        }
        if let Some(bad) = series.iter().find(|s| s.len() != n) {
            return Err(format!("value count {} does not match parameter count {n}", bad.len()));
        }
        if params.iter().any(|u| !u.is_finite()) {
            return Err("non-finite parameter value".to_string());
        }
        if params.windows(2).any(|w| w[1] <= w[0]) {
            return Err("parameters must be strictly increasing".to_string());
        }
        if series.iter().any(|s| s.iter().any(|v| !v.is_finite())) {
            return Err("non-finite sample value".to_string());
        }

        let knots = interpolation_knots(params, degree);
        let mut collocation = DMatrix::<f64>::zeros(n, n);
        for (i, &u) in params.iter().enumerate() {
            let span = find_span(&knots, degree, n, u);
            for (r, b) in basis_functions(&knots, span, degree, u).into_iter().enumerate() {
                collocation[(i, span - degree + r)] = b;
            }
        }

        let mut rhs = DMatrix::<f64>::zeros(n, series.len());
        for (j, s) in series.iter().enumerate() {
            for (i, &v) in s.iter().enumerate() {
                rhs[(i, j)] = v;
            }
        }

        let coefs = solve_square(&collocation, &rhs)
            .ok_or_else(|| "collocation system is singular".to_string())?;

        Ok((0..series.len())
            .map(|j| Self {
                degree,
                knots: knots.clone(),
                coefs: coefs.column(j).iter().copied().collect(),
            })
            .collect())
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Parameter range covered by the data.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluate at `u`. Outside the domain the boundary polynomial is extended.
    pub fn eval(&self, u: f64) -> f64 {
        evaluate(&self.knots, &self.coefs, self.degree, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn reproduces_data_for_every_degree() {
        let values = [2.0, 3.0, 5.0, 4.0, 1.0, -2.0, 0.5];
        for degree in 1..=3 {
            let s = InterpolatingSpline::new(&params(values.len()), &values, degree).unwrap();
            for (i, v) in values.iter().enumerate() {
                let got = s.eval(i as f64);
                assert!((got - v).abs() < 1e-10, "k={degree} i={i}: {got} != {v}");
            }
        }
    }

    #[test]
    fn cubic_reproduces_cubic_polynomials() {
        // A cubic interpolant with not-a-knot ends is exact for cubics.
        let f = |u: f64| 0.5 * u * u * u - 2.0 * u * u + u - 3.0;
        let p = params(6);
        let values: Vec<f64> = p.iter().map(|&u| f(u)).collect();
        let s = InterpolatingSpline::new(&p, &values, 3).unwrap();
        for i in 0..=50 {
            let u = i as f64 * 0.1;
            assert!((s.eval(u) - f(u)).abs() < 1e-9, "u={u}");
        }
    }

    #[test]
    fn linear_spline_interpolates_linearly() {
        let s = InterpolatingSpline::new(&[0.0, 1.0], &[2.0, 6.0], 1).unwrap();
        assert!((s.eval(0.25) - 3.0).abs() < 1e-12);
        assert_eq!(s.domain(), (0.0, 1.0));
    }

    #[test]
    fn quadratic_through_three_points_is_the_parabola() {
        let s = InterpolatingSpline::new(&params(3), &[0.0, 1.0, 4.0], 2).unwrap();
        assert!((s.eval(1.5) - 2.25).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(InterpolatingSpline::new(&params(3), &[0.0, 1.0, 2.0], 3).is_err());
        assert!(InterpolatingSpline::new(&params(3), &[0.0, f64::NAN, 2.0], 2).is_err());
        assert!(InterpolatingSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0], 1).is_err());
        assert!(InterpolatingSpline::new(&params(3), &[0.0, 1.0], 1).is_err());
    }
}
