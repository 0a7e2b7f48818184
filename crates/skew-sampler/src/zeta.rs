//! Generalized harmonic sums.

/// `zeta(n, theta) = Σ_{i=1}^{n} 1 / i^theta`.
pub fn zeta(n: u64, theta: f64) -> f64 {
    extend(0.0, 0, n, theta)
}

/// Continues a harmonic sum that already covers ranks `1..=start` by the next
/// `count` terms.
///
/// Terms are accumulated onto `partial` in ascending rank order, which is the
/// same order [`zeta`] uses, so growing a sum in steps reproduces the direct
/// summation.
pub fn extend(partial: f64, start: u64, count: u64, theta: f64) -> f64 {
    (1..=count).fold(partial, |sum, i| {
        sum + 1.0 / ((start + i) as f64).powf(theta)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sums() {
        assert_eq!(zeta(0, 0.99), 0.0);
        assert_eq!(zeta(1, 0.99), 1.0);
        let expected = 1.0 + 1.0 / 2f64.powf(0.5) + 1.0 / 3f64.powf(0.5);
        assert!((zeta(3, 0.5) - expected).abs() < 1e-15);
    }

    #[test]
    fn theta_two_approaches_basel() {
        let basel = std::f64::consts::PI * std::f64::consts::PI / 6.0;
        let sum = zeta(1_000_000, 2.0);
        assert!((basel - sum).abs() < 1e-5);
        assert!(sum < basel);
    }

    #[test]
    fn extend_matches_direct_sum() {
        let theta = 0.99;
        let mut sum = zeta(10, theta);
        sum = extend(sum, 10, 90, theta);
        sum = extend(sum, 100, 900, theta);
        assert_eq!(sum, zeta(1000, theta));
    }

    #[test]
    fn extend_by_zero_is_identity() {
        let sum = zeta(50, 0.7);
        assert_eq!(extend(sum, 50, 0, 0.7), sum);
    }
}
