//! Minimal-region text diffing.
//!
//! The engine models every buffer change as exactly one contiguous edit,
//! found by trimming the common prefix and common suffix of the two
//! versions. Widely separated simultaneous edits therefore collapse into one
//! region spanning both; anchor adjustment is contracted around exactly this
//! approximation, so callers must not "fix" it.

/// The single contiguous edit turning one buffer version into the next.
///
/// All fields are character counts, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDelta {
    /// Character offset where the two versions first differ.
    pub start: usize,
    /// Characters removed from the previous version at `start`.
    pub removed_len: usize,
    /// Characters inserted in the next version at `start`.
    pub inserted_len: usize,
}

impl TextDelta {
    /// Exclusive end of the removed span in the previous version.
    pub fn change_end(&self) -> usize {
        self.start + self.removed_len
    }

    /// Net character growth (negative when the buffer shrank).
    pub fn shift(&self) -> isize {
        self.inserted_len as isize - self.removed_len as isize
    }
}

/// Computes the minimal changed region between two versions of a buffer.
///
/// Returns `None` when the versions are identical. The forward scan advances
/// while characters match; the backward scan walks in from both ends and
/// stops at the forward scan's position, so the two never overlap.
pub fn diff_text(previous: &str, next: &str) -> Option<TextDelta> {
    if previous == next {
        return None;
    }

    let prev: Vec<char> = previous.chars().collect();
    let new: Vec<char> = next.chars().collect();

    let mut start = 0;
    let max_prefix = prev.len().min(new.len());
    while start < max_prefix && prev[start] == new[start] {
        start += 1;
    }

    let mut prev_end = prev.len();
    let mut new_end = new.len();
    while prev_end > start && new_end > start && prev[prev_end - 1] == new[new_end - 1] {
        prev_end -= 1;
        new_end -= 1;
    }

    Some(TextDelta {
        start,
        removed_len: prev_end - start,
        inserted_len: new_end - start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(previous: &str, delta: &TextDelta, next: &str) -> String {
        let prev: Vec<char> = previous.chars().collect();
        let new: Vec<char> = next.chars().collect();
        let mut out: String = prev[..delta.start].iter().collect();
        out.extend(&new[delta.start..delta.start + delta.inserted_len]);
        out.extend(&prev[delta.change_end()..]);
        out
    }

    #[test]
    fn identical_strings_yield_none() {
        assert_eq!(diff_text("", ""), None);
        assert_eq!(diff_text("same", "same"), None);
    }

    #[test]
    fn simple_replacement() {
        let delta = diff_text("The cat sat.", "The dog sat.").unwrap();
        assert_eq!(
            delta,
            TextDelta {
                start: 4,
                removed_len: 3,
                inserted_len: 3
            }
        );
    }

    #[test]
    fn insertion_and_deletion() {
        let insert = diff_text("abcd", "abXYcd").unwrap();
        assert_eq!(
            insert,
            TextDelta {
                start: 2,
                removed_len: 0,
                inserted_len: 2
            }
        );

        let delete = diff_text("abXYcd", "abcd").unwrap();
        assert_eq!(
            delete,
            TextDelta {
                start: 2,
                removed_len: 2,
                inserted_len: 0
            }
        );
    }

    #[test]
    fn backward_scan_stops_at_forward_cursor() {
        // "aa" -> "aaa": the prefix scan consumes both 'a's; the suffix scan
        // must not walk past it and double-count.
        let delta = diff_text("aa", "aaa").unwrap();
        assert_eq!(
            delta,
            TextDelta {
                start: 2,
                removed_len: 0,
                inserted_len: 1
            }
        );
    }

    #[test]
    fn disjoint_edits_collapse_to_one_region() {
        let previous = "alpha beta gamma";
        let next = "alXha beta gaYma";
        let delta = diff_text(previous, next).unwrap();
        assert_eq!(delta.start, 2);
        assert_eq!(delta.removed_len, 12);
        assert_eq!(delta.inserted_len, 12);
        assert_eq!(apply(previous, &delta, next), next);
    }

    #[test]
    fn delta_reproduces_next_version() {
        let cases = [
            ("", "hello"),
            ("hello", ""),
            ("The cat sat.", "The cat never sat."),
            ("naïve", "naive"),
            ("one two three", "one 2 three"),
        ];
        for (previous, next) in cases {
            let delta = diff_text(previous, next).unwrap();
            assert_eq!(apply(previous, &delta, next), next, "{previous:?} -> {next:?}");
        }
    }
}
