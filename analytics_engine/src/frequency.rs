//! Word-frequency tabulation.

use chirp_models::{FrequencyEntry, FrequencyTable};
use std::collections::HashMap;

/// Count case-folded words into a ranked table.
///
/// Entries are created in first-seen order and the final ordering is a
/// stable sort by count descending, so equal counts keep their first-seen
/// order regardless of hash-map iteration quirks.
pub fn tabulate<I, S>(words: I) -> FrequencyTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for word in words {
        let folded = word.as_ref().to_lowercase();
        if folded.is_empty() {
            continue;
        }
        match index.get(&folded) {
            Some(&slot) => entries[slot].count += 1,
            None => {
                index.insert(folded.clone(), entries.len());
                entries.push(FrequencyEntry {
                    word: folded,
                    count: 1,
                });
            }
        }
    }

    entries.sort_by(|a, b| b.count.cmp(&a.count));

    FrequencyTable { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalization_variants_merge() {
        let table = tabulate(["cat", "Cat", "dog"]);
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].word, "cat");
        assert_eq!(table.entries[0].count, 2);
        assert_eq!(table.entries[1].word, "dog");
        assert_eq!(table.entries[1].count, 1);
    }

    #[test]
    fn upper_and_lower_fold_to_one_entry() {
        let table = tabulate(["Storm", "STORM"]);
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].word, "storm");
        assert_eq!(table.entries[0].count, 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let table = tabulate(["beta", "alpha", "beta", "alpha", "gamma"]);
        let words: Vec<&str> = table.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn tabulation_is_idempotent() {
        let input = ["cat", "dog", "cat", "bird", "dog", "cat"];
        let first = tabulate(input);
        let second = tabulate(input);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = tabulate(Vec::<String>::new());
        assert!(table.is_empty());
    }

    #[test]
    fn retain_min_count_filters_rare_words() {
        let mut table = tabulate(["cat", "cat", "cat", "dog"]);
        table.retain_min_count(3);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries[0].word, "cat");
    }
}
