pub const DEFAULT_API_BASE: &str = "https://solved.ac/api/v3";
pub const PROBLEM_URL_BASE: &str = "https://www.acmicpc.net/problem";

pub const PATH_TAG_LIST: &str = "tag/list";
pub const PATH_SEARCH_PROBLEM: &str = "search/problem";
pub const PATH_USER_PROBLEM_STATS: &str = "user/problem_stats";
pub const PATH_USER_TAG_STATS: &str = "user/problem_tag_stats";
pub const PATH_USER_TOP_100: &str = "user/top_100";

/// Language whose display names are preferred when normalizing tags.
pub const DISPLAY_LANGUAGE: &str = "ko";

#[must_use]
pub fn problem_url(problem_id: u64) -> String {
    format!("{PROBLEM_URL_BASE}/{problem_id}")
}

#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
