//! Deterministic ordering of a gap's new elements.
//!
//! Each path segment maps to its vocabulary rank; a path's key is the
//! sequence of segment ranks from outermost to innermost, so the outermost
//! construct dominates. Unlisted kinds share the lowest rank and fall back to
//! string order, and the full path breaks any remaining tie.

use degap_core::vocab::Vocabulary;
use degap_parser::paths::segments;

/// Sort key for one path: `(rank, segment)` per segment, outermost first.
pub fn priority_key<'a>(path: &'a str, vocab: &Vocabulary) -> Vec<(usize, &'a str)> {
    segments(path)
        .map(|segment| (vocab.rank(segment), segment))
        .collect()
}

/// Order `elements` for one-at-a-time introduction.
///
/// Total order: the result depends only on the set of elements, never on
/// iteration order of the input.
pub fn prioritize<'a, I>(elements: I, vocab: &Vocabulary) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut ordered: Vec<&String> = elements.into_iter().collect();
    ordered.sort_by(|a, b| {
        priority_key(a, vocab)
            .cmp(&priority_key(b, vocab))
            .then_with(|| a.cmp(b))
    });
    ordered.dedup();
    ordered.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_outer_rank_dominates() {
        let vocab = Vocabulary::default();
        let elements = strings(&["for/if", "for"]);
        assert_eq!(prioritize(&elements, &vocab), strings(&["for", "for/if"]));
    }

    #[test]
    fn test_listed_rank_beats_unlisted() {
        let vocab = Vocabulary::new(
            strings(&["if", "for", "while", "try"]),
            strings(&["if", "for"]),
        );
        let elements = strings(&["while", "for/while", "try", "if/for", "for"]);
        assert_eq!(
            prioritize(&elements, &vocab),
            strings(&["if/for", "for", "for/while", "try", "while"])
        );
    }

    #[test]
    fn test_rank_order_not_alphabetical() {
        let vocab = Vocabulary::default();
        let elements = strings(&["else", "break", "if", "elif"]);
        assert_eq!(
            prioritize(&elements, &vocab),
            strings(&["if", "elif", "else", "break"])
        );
    }

    #[test]
    fn test_input_order_irrelevant() {
        let vocab = Vocabulary::default();
        let a = strings(&["for/if/break", "if/else", "for", "if"]);
        let mut b = a.clone();
        b.reverse();
        let set: BTreeSet<String> = a.iter().cloned().collect();
        assert_eq!(prioritize(&a, &vocab), prioritize(&b, &vocab));
        assert_eq!(prioritize(&a, &vocab), prioritize(&set, &vocab));
    }

    #[test]
    fn test_priority_key_shape() {
        let vocab = Vocabulary::default();
        assert_eq!(
            priority_key("for/if", &vocab),
            vec![(3, "for"), (0, "if")]
        );
    }
}
