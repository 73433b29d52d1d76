//! Run-length utility shared by streak statistics.
//!
//! Each element is flagged as matching or not; the running length resets at
//! every non-matching element. The same scan backs the longest losing streak
//! (global maximum) and the drawdown duration (length of the final run).

/// How to reduce the run lengths of a flag sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunReduction {
    /// Longest run anywhere in the sequence.
    Longest,
    /// Length of the run still active at the last element (0 if the last element is unflagged).
    Trailing,
}

/// Running length of the current run at every position.
///
/// Flagged positions carry the 1-based position within their run; unflagged
/// positions carry 0.
#[must_use]
pub fn run_lengths(flags: impl IntoIterator<Item = bool>) -> Vec<usize> {
    let mut current = 0usize;
    flags
        .into_iter()
        .map(|flag| {
            current = if flag { current + 1 } else { 0 };
            current
        })
        .collect()
}

/// Reduces the runs of a flag sequence to a single length. Empty input gives 0.
#[must_use]
pub fn streak_length(flags: impl IntoIterator<Item = bool>, reduction: RunReduction) -> usize {
    let runs = run_lengths(flags);
    match reduction {
        RunReduction::Longest => runs.into_iter().max().unwrap_or(0),
        RunReduction::Trailing => runs.last().copied().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lengths() {
        let flags = [true, true, false, true, true, true, false];
        assert_eq!(run_lengths(flags), vec![1, 2, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_reductions() {
        let flags = [true, true, true, false, true];
        assert_eq!(streak_length(flags, RunReduction::Longest), 3);
        assert_eq!(streak_length(flags, RunReduction::Trailing), 1);

        let ends_clear = [true, false];
        assert_eq!(streak_length(ends_clear, RunReduction::Trailing), 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(streak_length(Vec::<bool>::new(), RunReduction::Longest), 0);
        assert_eq!(streak_length(Vec::<bool>::new(), RunReduction::Trailing), 0);
    }
}
