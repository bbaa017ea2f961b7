//! Domain-specific assertion macros for logpanel harnesses.
//!
//! These wrap `pretty_assertions` and print the whole view on failure, so it
//! is clear which entry broke the newest-first numbering.

/// Assert the view's entry contents, newest first.
///
/// ```rust
/// assert_contents!(view, ["second", "first"]);
/// ```
#[macro_export]
macro_rules! assert_contents {
    ($view:expr, [$($content:expr),* $(,)?]) => {{
        let view: &logpanel::LogView = &$view;
        let actual: Vec<String> = view.entries().into_iter().map(|e| e.content).collect();
        let expected: Vec<String> = vec![$($content.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "view contents (newest first)");
    }};
}

/// Assert the view's sequence numbers, newest first.
#[macro_export]
macro_rules! assert_seqs {
    ($view:expr, [$($seq:expr),* $(,)?]) => {{
        let view: &logpanel::LogView = &$view;
        let actual: Vec<u64> = view.entries().iter().map(|e| e.seq).collect();
        let expected: Vec<u64> = vec![$($seq),*];
        pretty_assertions::assert_eq!(actual, expected, "view sequence numbers (newest first)");
    }};
}

/// Assert that sequence numbers run `n, n-1, .., 1` from the top.
#[macro_export]
macro_rules! assert_numbered_newest_first {
    ($view:expr) => {{
        let view: &logpanel::LogView = &$view;
        let entries = view.entries();
        let n = entries.len() as u64;
        for (i, entry) in entries.iter().enumerate() {
            if entry.seq != n - i as u64 {
                panic!(
                    "assert_numbered_newest_first! failed at row {}: seq {} (expected {})\n  entries: {:#?}",
                    i,
                    entry.seq,
                    n - i as u64,
                    entries
                );
            }
        }
    }};
}
