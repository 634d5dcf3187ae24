use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Candidate;

/// Order in which candidates are listed in the panel.
#[derive(
    Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum SortOption {
    #[default]
    ByKey,
    ByKeyPrefixFirst,
    ByKeyPrefixLast,
    ByDescription,
}

/// Sorts candidates in place. The sort is stable, so candidates comparing equal
/// keep the order the caller supplied.
pub fn sort_candidates(candidates: &mut [Candidate], option: SortOption, case_sensitive: bool) {
    candidates.sort_by(|a, b| compare(a, b, option, case_sensitive));
}

fn compare(a: &Candidate, b: &Candidate, option: SortOption, case_sensitive: bool) -> Ordering {
    let by_label = || compare_text(&a.label, &b.label, case_sensitive);
    match option {
        SortOption::ByKey => by_label(),
        // `false < true`, so reversing puts prefixes first.
        SortOption::ByKeyPrefixFirst => {
            b.entry.is_prefix.cmp(&a.entry.is_prefix).then_with(by_label)
        }
        SortOption::ByKeyPrefixLast => {
            a.entry.is_prefix.cmp(&b.entry.is_prefix).then_with(by_label)
        }
        SortOption::ByDescription => {
            compare_text(&a.entry.description, &b.entry.description, case_sensitive)
        }
    }
}

fn compare_text(a: &str, b: &str, case_sensitive: bool) -> Ordering {
    if case_sensitive {
        a.cmp(b)
    } else {
        a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::MappingEntry;

    const ALL: [SortOption; 4] = [
        SortOption::ByKey,
        SortOption::ByKeyPrefixFirst,
        SortOption::ByKeyPrefixLast,
        SortOption::ByDescription,
    ];

    fn candidates() -> Vec<Candidate> {
        vec![
            MappingEntry::prefix("w", "window").into(),
            MappingEntry::command("a", "insert mode").into(),
            MappingEntry::command("B", "buffer list").into(),
            MappingEntry::prefix("g", "goto").into(),
            MappingEntry::command("b", "Buffer next").into(),
            MappingEntry::command("A", "append line").into(),
        ]
    }

    fn labels(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    fn sorted(option: SortOption, case_sensitive: bool) -> Vec<Candidate> {
        let mut list = candidates();
        sort_candidates(&mut list, option, case_sensitive);
        list
    }

    #[test]
    fn by_key_case_sensitive_puts_uppercase_first() {
        assert_eq!(labels(&sorted(SortOption::ByKey, true)), ["A", "B", "a", "b", "g", "w"]);
    }

    #[test]
    fn by_key_case_insensitive_keeps_input_order_for_ties() {
        assert_eq!(labels(&sorted(SortOption::ByKey, false)), ["a", "A", "B", "b", "g", "w"]);
    }

    #[test]
    fn prefix_first_groups_prefixes_before_commands() {
        let list = sorted(SortOption::ByKeyPrefixFirst, true);
        assert_eq!(labels(&list), ["g", "w", "A", "B", "a", "b"]);

        let first_command = list.iter().position(|c| !c.entry.is_prefix).unwrap();
        assert!(list[first_command..].iter().all(|c| !c.entry.is_prefix));
    }

    #[test]
    fn prefix_last_groups_commands_before_prefixes() {
        assert_eq!(
            labels(&sorted(SortOption::ByKeyPrefixLast, true)),
            ["A", "B", "a", "b", "g", "w"]
        );
    }

    #[test]
    fn by_description_ignores_key() {
        assert_eq!(
            labels(&sorted(SortOption::ByDescription, false)),
            ["A", "B", "b", "g", "a", "w"]
        );
        assert_eq!(
            labels(&sorted(SortOption::ByDescription, true)),
            ["b", "A", "B", "g", "a", "w"]
        );
    }

    #[test]
    fn sorting_is_idempotent_for_every_option() {
        for option in ALL {
            for case_sensitive in [true, false] {
                let once = sorted(option, case_sensitive);
                let mut twice = once.clone();
                sort_candidates(&mut twice, option, case_sensitive);
                assert_eq!(once, twice, "{option} case_sensitive={case_sensitive}");
            }
        }
    }

    #[test]
    fn duplicates_keep_relative_order() {
        let mut list = vec![
            Candidate::new("x", MappingEntry::command("x", "first")),
            Candidate::new("x", MappingEntry::command("x", "second")),
            Candidate::new("a", MappingEntry::command("a", "third")),
        ];
        sort_candidates(&mut list, SortOption::ByKey, true);
        let descriptions: Vec<_> = list.iter().map(|c| c.entry.description.as_str()).collect();
        assert_eq!(descriptions, ["third", "first", "second"]);
    }

    #[test]
    fn parses_configured_names() {
        assert_eq!("BY_KEY".parse::<SortOption>().unwrap(), SortOption::ByKey);
        assert_eq!(
            "by_key_prefix_first".parse::<SortOption>().unwrap(),
            SortOption::ByKeyPrefixFirst
        );
        assert_eq!(SortOption::ByDescription.to_string(), "BY_DESCRIPTION");
        assert!("alphabetical".parse::<SortOption>().is_err());
    }
}
