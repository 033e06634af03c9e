//! Static table of contest source tags.

use std::collections::BTreeMap;

use boj_types::{Collection, ContestTag};

const CONTEST_TAGS_JSON: &str = include_str!("../data/contest_tags.json");

/// Loads every known contest tag, ordered by slug.
///
/// # Errors
/// Returns an error if the embedded table is not a `slug -> name` object.
pub fn contest_tags() -> Result<Collection<ContestTag>, serde_json::Error> {
    let raw: BTreeMap<String, String> = serde_json::from_str(CONTEST_TAGS_JSON)?;
    let items = raw
        .into_iter()
        .map(|(key, name)| ContestTag { key, name })
        .collect();
    Ok(Collection::counted(items))
}

/// Contest tags whose slug or name contains `query`, ignoring case.
///
/// # Errors
/// Returns an error if the embedded table cannot be parsed.
pub fn search_contest_tags(query: &str) -> Result<Collection<ContestTag>, serde_json::Error> {
    let matched = contest_tags()?
        .items
        .into_iter()
        .filter(|contest| contest.matches(query))
        .collect();
    Ok(Collection::counted(matched))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_counted() {
        let tags = contest_tags().unwrap();
        assert_eq!(tags.count, u64::try_from(tags.items.len()).unwrap());
        assert!(tags.items.windows(2).all(|pair| pair[0].key < pair[1].key));
    }

    #[test]
    fn search_matches_slug_and_name() {
        let by_slug = search_contest_tags("UCPC").unwrap();
        assert!(by_slug.items.iter().any(|contest| contest.key == "ucpc"));

        let by_name = search_contest_tags("충남대").unwrap();
        assert_eq!(by_name.count, 1);
        assert_eq!(by_name.items[0].key, "cnu");

        assert_eq!(search_contest_tags("no-such-contest").unwrap().count, 0);
    }
}
