//! Removal of long interpolated stretches at the edges of a series.
//!
//! A run is a maximal stretch of consecutive interpolated months, so
//! touching gaps are already one run. A run qualifies when it is at least
//! `n_consec` long. The series is cut just after the last qualifying run
//! lying wholly inside the head zone, and just before the first qualifying
//! run starting inside the tail zone. Zones are fractions of the current
//! length, so after a cut they are recomputed and the search repeats until
//! nothing more qualifies. Only prefixes and suffixes are removed; interior
//! runs are left alone.

use std::ops::Range;

/// Options controlling edge trimming in [`crate::gap_fill::make_well_ts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimOptions {
    pub trim: bool,
    /// Head zone: positions below `head * len`.
    pub head: f64,
    /// Tail zone: positions at or above `tail * len`.
    pub tail: f64,
    /// Minimum run length that is trimmed.
    pub n_consec: usize,
}

impl Default for TrimOptions {
    fn default() -> Self {
        TrimOptions {
            trim: true,
            head: 0.1,
            tail: 0.9,
            n_consec: 5,
        }
    }
}

impl TrimOptions {
    pub fn no_trim() -> Self {
        TrimOptions {
            trim: false,
            ..TrimOptions::default()
        }
    }
}

/// Maximal runs of `true`, as half-open index ranges.
pub fn missing_runs(missing: &[bool]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &is_missing) in missing.iter().enumerate() {
        match (is_missing, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..missing.len());
    }
    runs
}

/// The index range of `missing` that survives trimming.
pub fn trim_range(missing: &[bool], options: &TrimOptions) -> Range<usize> {
    let mut kept = 0..missing.len();
    if !options.trim {
        return kept;
    }
    let min_len = options.n_consec.max(1);
    loop {
        let window = &missing[kept.clone()];
        let len = window.len() as f64;
        let head_limit = options.head * len;
        let tail_limit = options.tail * len;
        let runs: Vec<Range<usize>> = missing_runs(window)
            .into_iter()
            .filter(|run| run.len() >= min_len)
            .collect();
        let head_cut = runs
            .iter()
            .filter(|run| run.end as f64 <= head_limit)
            .map(|run| run.end)
            .max();
        let tail_cut = runs
            .iter()
            .filter(|run| run.start as f64 >= tail_limit)
            .map(|run| run.start)
            .min();
        if head_cut.is_none() && tail_cut.is_none() {
            return kept;
        }
        let start = kept.start + head_cut.unwrap_or(0);
        let end = (kept.start + tail_cut.unwrap_or(window.len())).max(start);
        kept = start..end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_runs(len: usize, runs: &[(usize, usize)]) -> Vec<bool> {
        let mut missing = vec![false; len];
        for &(start, run_len) in runs {
            for flag in &mut missing[start..start + run_len] {
                *flag = true;
            }
        }
        missing
    }

    #[test]
    fn test_missing_runs() {
        let missing = [true, true, false, true, false, false, true];
        assert_eq!(missing_runs(&missing), vec![0..2, 3..4, 6..7]);
        assert!(missing_runs(&[]).is_empty());
    }

    #[test]
    fn test_edge_runs_trimmed_interior_kept() {
        let options = TrimOptions {
            trim: true,
            head: 0.1,
            tail: 0.9,
            n_consec: 5,
        };
        // two head runs, one run just past the head zone, one interior run,
        // two tail runs
        let missing = with_runs(
            100_000,
            &[
                (1_000, 11),
                (5_000, 11),
                (10_500, 11),
                (55_000, 11),
                (95_000, 11),
                (99_000, 11),
            ],
        );
        let kept = trim_range(&missing, &options);
        // the 10_500 run only falls in the head zone once the first two
        // runs have been cut away
        assert_eq!(kept, 10_511..95_000);
        let trimmed = &missing[kept.clone()];
        assert!(!trimmed[0]);
        assert!(!trimmed[trimmed.len() - 1]);
        let interior = 55_000 - kept.start;
        assert!(trimmed[interior..interior + 11].iter().all(|&m| m));
        assert_eq!(missing_runs(trimmed), vec![interior..interior + 11]);
    }

    #[test]
    fn test_short_runs_not_trimmed() {
        let missing = with_runs(100, &[(1, 4), (96, 4)]);
        assert_eq!(trim_range(&missing, &TrimOptions::default()), 0..100);
    }

    #[test]
    fn test_run_straddling_head_boundary_kept() {
        // starts inside the head zone but ends well inside the series
        let missing = with_runs(100, &[(8, 30)]);
        assert_eq!(trim_range(&missing, &TrimOptions::default()), 0..100);
    }

    #[test]
    fn test_leading_run_trimmed() {
        let missing = with_runs(100, &[(0, 6)]);
        assert_eq!(trim_range(&missing, &TrimOptions::default()), 6..100);
    }

    #[test]
    fn test_no_trim_keeps_everything() {
        let missing = with_runs(100, &[(0, 6)]);
        assert_eq!(trim_range(&missing, &TrimOptions::no_trim()), 0..100);
    }

    #[test]
    fn test_trim_is_stable() {
        let missing = with_runs(1_000, &[(10, 6), (50, 6), (400, 9), (950, 20)]);
        let options = TrimOptions::default();
        let kept = trim_range(&missing, &options);
        let again = trim_range(&missing[kept.clone()], &options);
        assert_eq!(again, 0..kept.len());
    }
}
