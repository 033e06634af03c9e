use serde::{Deserialize, Serialize};

use crate::level::level_label;
use crate::schema::{DISPLAY_LANGUAGE, problem_url};

/// A paginated (or counted) upstream collection.
///
/// `count` is the total reported by the upstream source. A collection assembled
/// from a sweep that stopped early carries fewer `items` than `count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    #[must_use]
    pub const fn new(count: u64, items: Vec<T>) -> Self {
        Self { count, items }
    }

    /// Builds a collection whose count is the number of items it holds.
    #[must_use]
    pub fn counted(items: Vec<T>) -> Self {
        let count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Self { count, items }
    }

    /// True when fewer items were assembled than upstream reported.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        u64::try_from(self.items.len()).is_ok_and(|len| len < self.count)
    }

    #[must_use]
    pub fn map<'a, U>(&'a self, f: impl FnMut(&'a T) -> U) -> Collection<U> {
        Collection {
            count: self.count,
            items: self.items.iter().map(f).collect(),
        }
    }
}

/// Localized name of an algorithm tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagDisplayName {
    pub language: String,
    pub name: String,
    pub short: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagAlias {
    pub alias: String,
}

/// Algorithm tag as returned by `tag/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTag {
    pub key: String,
    pub is_meta: bool,
    pub boj_tag_id: u64,
    pub problem_count: u64,
    pub display_names: Vec<TagDisplayName>,
    #[serde(default)]
    pub aliases: Vec<TagAlias>,
}

impl ProblemTag {
    fn display_name(&self) -> Option<&TagDisplayName> {
        self.display_names
            .iter()
            .find(|display| display.language == DISPLAY_LANGUAGE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTitle {
    pub language: String,
    #[serde(default)]
    pub language_display_name: String,
    pub title: String,
    #[serde(default)]
    pub is_original: bool,
}

/// Problem record as returned by the search and top-100 endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Problem {
    pub problem_id: u64,
    pub title_ko: String,
    #[serde(default)]
    pub titles: Vec<ProblemTitle>,
    #[serde(default)]
    pub is_solvable: bool,
    #[serde(default)]
    pub is_partial: bool,
    pub accepted_user_count: u64,
    pub level: i32,
    #[serde(default)]
    pub voted_user_count: u64,
    #[serde(default)]
    pub sprout: bool,
    #[serde(default)]
    pub gives_no_rating: bool,
    #[serde(default)]
    pub is_level_locked: bool,
    pub average_tries: f64,
    #[serde(default)]
    pub official: bool,
    pub tags: Vec<ProblemTag>,
}

/// Per-level solve counts for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProblemStat {
    pub level: i32,
    pub total: u64,
    pub solved: u64,
    #[serde(default)]
    pub partial: u64,
    #[serde(default)]
    pub tried: u64,
}

/// Per-tag solve counts for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTagStat {
    pub tag: ProblemTag,
    pub total: u64,
    pub solved: u64,
    #[serde(default)]
    pub partial: u64,
    #[serde(default)]
    pub tried: u64,
}

/// Tag as exposed to MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub is_meta: bool,
    pub boj_tag_id: u64,
    pub problem_count: u64,
}

impl Tag {
    /// Case-insensitive substring match on name, key, or short name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.key.to_lowercase().contains(&query)
            || self
                .short
                .as_deref()
                .is_some_and(|short| short.to_lowercase().contains(&query))
    }
}

impl From<&ProblemTag> for Tag {
    fn from(tag: &ProblemTag) -> Self {
        let display = tag.display_name();
        Self {
            key: tag.key.clone(),
            name: display.map_or_else(|| tag.key.clone(), |d| d.name.clone()),
            short: display.map(|d| d.short.clone()),
            is_meta: tag.is_meta,
            boj_tag_id: tag.boj_tag_id,
            problem_count: tag.problem_count,
        }
    }
}

/// Problem summary as exposed to MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    pub id: u64,
    pub title: String,
    pub level: i32,
    pub level_label: String,
    pub accepted: u64,
    pub average_tries: f64,
    pub tags: Vec<String>,
    pub url: String,
}

impl From<&Problem> for ProblemSummary {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.problem_id,
            title: problem.title_ko.clone(),
            level: problem.level,
            level_label: level_label(problem.level),
            accepted: problem.accepted_user_count,
            average_tries: problem.average_tries,
            tags: problem
                .tags
                .iter()
                .map(|tag| {
                    tag.display_name()
                        .map_or_else(|| tag.key.clone(), |d| d.name.clone())
                })
                .collect(),
            url: problem_url(problem.problem_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelStat {
    pub level: i32,
    pub level_label: String,
    pub total: u64,
    pub solved: u64,
}

impl From<&UserProblemStat> for LevelStat {
    fn from(stat: &UserProblemStat) -> Self {
        Self {
            level: stat.level,
            level_label: level_label(stat.level),
            total: stat.total,
            solved: stat.solved,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagStat {
    pub tag: Tag,
    pub total: u64,
    pub solved: u64,
}

impl From<&UserTagStat> for TagStat {
    fn from(stat: &UserTagStat) -> Self {
        Self {
            tag: Tag::from(&stat.tag),
            total: stat.total,
            solved: stat.solved,
        }
    }
}

/// Contest source tag (slug and display name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContestTag {
    pub key: String,
    pub name: String,
}

impl ContestTag {
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.key.to_lowercase().contains(&query)
    }
}
