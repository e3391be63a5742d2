//! Merging ordered partial results into one text.

use crate::types::PartialResult;

/// Separator placed between partial results by [`join_partials`].
pub const DEFAULT_SEPARATOR: &str = "\n---\n";

/// Merges ordered partial results into one text.
pub type CombineFn = dyn Fn(&[PartialResult]) -> String + Send + Sync;

/// Join partial texts with [`DEFAULT_SEPARATOR`].
///
/// Failed partials keep their error-marker text, so N partials always yield
/// exactly N-1 separators.
pub fn join_partials(partials: &[PartialResult]) -> String {
    join_with(partials, DEFAULT_SEPARATOR)
}

/// Join partial texts with a custom separator.
pub fn join_with(partials: &[PartialResult], separator: &str) -> String {
    partials
        .iter()
        .map(|partial| partial.text.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Number of partials that stand in for failed calls.
pub fn count_failed(partials: &[PartialResult]) -> usize {
    partials.iter().filter(|partial| partial.is_failed()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn partials(n: usize) -> Vec<PartialResult> {
        (1..=n)
            .map(|i| PartialResult::completed(i, format!("part {i}")))
            .collect()
    }

    #[test]
    fn test_n_minus_one_separators() {
        for n in 1..=6 {
            let joined = join_partials(&partials(n));
            assert_eq!(joined.matches(DEFAULT_SEPARATOR).count(), n - 1);
        }
        assert_eq!(join_partials(&[]), "");
    }

    #[test]
    fn test_failed_partials_keep_their_slot() {
        let parts = vec![
            PartialResult::completed(1, "alpha"),
            PartialResult::failed(2, "timeout"),
            PartialResult::completed(3, "gamma"),
        ];
        assert_eq!(join_partials(&parts), "alpha\n---\nError: timeout\n---\ngamma");
        assert_eq!(count_failed(&parts), 1);
    }

    #[test]
    fn test_custom_separator() {
        assert_eq!(join_with(&partials(2), " | "), "part 1 | part 2");
    }
}
