//! B-spline primitives.
//!
//! A spline of degree `k` over a clamped knot vector `t_0..t_{m+k}` is
//! `s(u) = Σ c_j B_{j,k}(u)` for `j = 0..m`. We only need three operations:
//!
//! - place knots for an interpolating spline through `m` parameters
//! - locate the knot span containing `u`
//! - evaluate the `k+1` non-zero basis functions on that span (Cox–de Boor)
//!
//! Knot placement follows FITPACK's rule for zero-smoothing splines: boundary
//! knots have multiplicity `k+1`; for odd `k` interior knots sit on the data
//! parameters (skipping `(k-1)/2` on each side, i.e. "not-a-knot" for cubics);
//! for even `k` they sit halfway between consecutive parameters.

/// Knot vector for interpolating `params.len()` points with degree `k`.
///
/// Requires `params.len() >= k + 1`; returns an empty vector otherwise.
pub fn interpolation_knots(params: &[f64], k: usize) -> Vec<f64> {
    let m = params.len();
    if m < k + 1 {
        return Vec::new();
    }
    let first = params[0];
    let last = params[m - 1];
    let interior = m - k - 1;

    let mut knots = Vec::with_capacity(m + k + 1);
    knots.extend(std::iter::repeat_n(first, k + 1));

    if k % 2 == 1 {
        let offset = (k - 1) / 2 + 1;
        knots.extend((0..interior).map(|l| params[offset + l]));
    } else {
        let offset = k / 2;
        knots.extend((0..interior).map(|l| 0.5 * (params[offset + l] + params[offset + l + 1])));
    }

    knots.extend(std::iter::repeat_n(last, k + 1));
    knots
}

/// Index `i` in `[k, n_coef - 1]` with `knots[i] <= u < knots[i + 1]`.
///
/// Values at or beyond the ends are clamped to the first/last span.
pub fn find_span(knots: &[f64], k: usize, n_coef: usize, u: f64) -> usize {
    let last = n_coef - 1;
    if u >= knots[n_coef] {
        return last;
    }
    if u <= knots[k] {
        return k;
    }

    let mut lo = k;
    let mut hi = n_coef;
    let mut mid = (lo + hi) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
        mid = (lo + hi) / 2;
    }
    mid
}

/// Non-zero basis values `B_{span-k+r,k}(u)` for `r = 0..=k`.
pub fn basis_functions(knots: &[f64], span: usize, k: usize, u: f64) -> Vec<f64> {
    let mut n = vec![0.0; k + 1];
    let mut left = vec![0.0; k + 1];
    let mut right = vec![0.0; k + 1];
    n[0] = 1.0;

    for j in 1..=k {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { n[r] / denom };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Evaluate `Σ c_j B_{j,k}(u)`.
pub fn evaluate(knots: &[f64], coefs: &[f64], k: usize, u: f64) -> f64 {
    let span = find_span(knots, k, coefs.len(), u);
    let basis = basis_functions(knots, span, k, u);
    basis
        .iter()
        .enumerate()
        .map(|(r, b)| b * coefs[span - k + r])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn cubic_knots_skip_first_and_last_interior_parameters() {
        let knots = interpolation_knots(&params(7), 3);
        assert_eq!(knots, vec![0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 4.0, 6.0, 6.0, 6.0, 6.0]);
    }

    #[test]
    fn quadratic_knots_sit_between_parameters() {
        let knots = interpolation_knots(&params(5), 2);
        assert_eq!(knots, vec![0.0, 0.0, 0.0, 1.5, 2.5, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn linear_knots_use_every_parameter() {
        let knots = interpolation_knots(&params(4), 1);
        assert_eq!(knots, vec![0.0, 0.0, 1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn too_few_parameters_yield_no_knots() {
        assert!(interpolation_knots(&params(3), 3).is_empty());
    }

    #[test]
    fn basis_is_a_partition_of_unity() {
        let p = params(8);
        for k in 1..=3 {
            let knots = interpolation_knots(&p, k);
            for i in 0..=70 {
                let u = i as f64 * 0.1;
                let span = find_span(&knots, k, p.len(), u);
                let sum: f64 = basis_functions(&knots, span, k, u).iter().sum();
                assert!((sum - 1.0).abs() < 1e-12, "k={k} u={u} sum={sum}");
            }
        }
    }

    #[test]
    fn span_is_clamped_at_the_right_end() {
        let p = params(6);
        let knots = interpolation_knots(&p, 3);
        assert_eq!(find_span(&knots, 3, 6, 5.0), 5);
        assert_eq!(find_span(&knots, 3, 6, 9.0), 5);
        assert_eq!(find_span(&knots, 3, 6, -1.0), 3);
    }
}
