use statrs::distribution::{ChiSquared, ContinuousCDF};

/// One-sided empirical p-value of `real` against a background distribution
///
/// Non-negative scores are compared against the upper tail (`b >= real`),
/// negative scores against the lower tail (`b <= real`). A pseudo-count of one
/// is added to both the tail count and the background size.
pub fn empirical_pvalue(real: f64, background: &[f64]) -> f64 {
    let tail = if real >= 0.0 {
        background.iter().filter(|&&b| b >= real).count()
    } else {
        background.iter().filter(|&&b| b <= real).count()
    };
    (tail + 1) as f64 / (background.len() + 1) as f64
}

/// Pearson chi-square goodness-of-fit p-value
///
/// `frequencies` are the expected category proportions and are scaled by the
/// observed total. Categories with zero expected frequency are skipped. An
/// empty observation, or fewer than two usable categories, has p = 1.
pub fn chisquare_pvalue(observed: &[f64], frequencies: &[f64]) -> f64 {
    let total = observed.iter().sum::<f64>();
    if total <= 0.0 {
        return 1.0;
    }

    let (statistic, categories) = observed
        .iter()
        .zip(frequencies.iter())
        .filter(|(_, &f)| f > 0.0)
        .fold((0.0, 0usize), |(stat, k), (&o, &f)| {
            let e = f * total;
            (stat + (o - e).powi(2) / e, k + 1)
        });

    if categories < 2 {
        return 1.0;
    }
    match ChiSquared::new((categories - 1) as f64) {
        Ok(dist) => dist.sf(statistic),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empirical_pvalue_upper_tail() {
        let background = vec![1., 1., 2., 3., 5.];
        assert_relative_eq!(empirical_pvalue(2.0, &background), 4.0 / 6.0);
    }

    #[test]
    fn test_empirical_pvalue_lower_tail() {
        let background = vec![-0.5, -0.2, -0.9, 0.4, -0.2];
        assert_relative_eq!(empirical_pvalue(-0.2, &background), 5.0 / 6.0);
        assert_relative_eq!(empirical_pvalue(-0.6, &background), 2.0 / 6.0);
    }

    #[test]
    fn test_empirical_pvalue_never_zero() {
        let background = vec![0.1, 0.2, 0.3];
        assert_relative_eq!(empirical_pvalue(0.9, &background), 0.25);
        assert_relative_eq!(empirical_pvalue(0.5, &[]), 1.0);
    }

    #[test]
    fn test_empirical_pvalue_monotonic() {
        let background = (0..100).map(|i| (i as f64 - 50.0) / 50.0).collect::<Vec<_>>();
        let mut last = 1.0;
        for step in 0..=20 {
            let pvalue = empirical_pvalue(step as f64 / 20.0, &background);
            assert!(pvalue <= last);
            last = pvalue;
        }
    }

    #[test]
    fn test_chisquare_perfect_fit() {
        assert_relative_eq!(chisquare_pvalue(&[3., 1.], &[0.75, 0.25]), 1.0);
    }

    #[test]
    fn test_chisquare_known_value() {
        // stat = (10 - 5)^2 / 5 + (0 - 5)^2 / 5 = 10, df = 1
        let pvalue = chisquare_pvalue(&[10., 0.], &[0.5, 0.5]);
        assert_relative_eq!(pvalue, 0.001565402258002549, max_relative = 1e-6);
    }

    #[test]
    fn test_chisquare_degenerate() {
        assert_eq!(chisquare_pvalue(&[0., 0.], &[0.5, 0.5]), 1.0);
        assert_eq!(chisquare_pvalue(&[4., 0.], &[1.0, 0.0]), 1.0);
    }
}
