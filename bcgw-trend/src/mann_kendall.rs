//! Mann-Kendall rank test for monotonic trend.

/// Outcome of a Mann-Kendall test on a time-ordered series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannKendall {
    /// Kendall score: concordant minus discordant pairs.
    pub s: f64,
    /// Variance of `s` under the null hypothesis, corrected for ties.
    pub var_s: f64,
    /// Continuity-corrected normal score.
    pub z: f64,
    /// Two-sided p-value.
    pub sig: f64,
    /// Kendall tau-b between the series and time.
    pub tau: Option<f64>,
}

/// Complementary error function, fractional error below 1.2e-7.
pub(crate) fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}

/// Sum of t(t-1)(2t+5) and t(t-1)/2 over groups of tied values.
fn tie_terms(values: &[f64]) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut var_term = 0.0;
    let mut pair_term = 0.0;
    for group in sorted.chunk_by(|a, b| a == b) {
        let t = group.len() as f64;
        if t > 1.0 {
            var_term += t * (t - 1.0) * (2.0 * t + 5.0);
            pair_term += t * (t - 1.0) / 2.0;
        }
    }
    (var_term, pair_term)
}

/// Run the test on values in time order. Needs at least two values.
pub fn mann_kendall(values: &[f64]) -> Option<MannKendall> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mut s = 0.0;
    for i in 0..n - 1 {
        for j in i + 1..n {
            s += match values[j].partial_cmp(&values[i]) {
                Some(std::cmp::Ordering::Greater) => 1.0,
                Some(std::cmp::Ordering::Less) => -1.0,
                _ => 0.0,
            };
        }
    }
    let nf = n as f64;
    let (var_ties, pair_ties) = tie_terms(values);
    let var_s = (nf * (nf - 1.0) * (2.0 * nf + 5.0) - var_ties) / 18.0;
    let z = if var_s <= 0.0 {
        0.0
    } else if s > 0.0 {
        (s - 1.0) / var_s.sqrt()
    } else if s < 0.0 {
        (s + 1.0) / var_s.sqrt()
    } else {
        0.0
    };
    let sig = erfc(z.abs() / std::f64::consts::SQRT_2).min(1.0);
    let n0 = nf * (nf - 1.0) / 2.0;
    let denominator = (n0 * (n0 - pair_ties)).sqrt();
    let tau = (denominator > 0.0).then(|| s / denominator);
    Some(MannKendall {
        s,
        var_s,
        z,
        sig,
        tau,
    })
}
