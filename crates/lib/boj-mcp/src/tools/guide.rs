//! Study-guide tools. These return instructions for the calling model rather
//! than data; the model is expected to follow them with the data tools.

use std::fmt::Write as _;

use chrono::{Datelike, Local};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::BojMcp;

const DEFAULT_PROBLEM_COUNT: u32 = 10;

const LATEST_CONTEST_NOTE: &str = r"## 최신 대회 문제 찾기

대회 태그가 연도별로 나뉘어 있지 않은 경우가 많습니다.
- 예: `cnu` 태그는 `cnu2023`까지만 세분화되어 있고, 그 이후 대회는 상위 태그 `cnu`에만 포함됩니다.
- 상위 태그로 검색한 뒤 `sort=id`, `direction=desc`로 정렬하면 최근 문제부터 확인할 수 있습니다.
- 문제 번호가 연속된 묶음은 대개 같은 대회에서 출제된 문제입니다.";

const NO_TAG_HINTS: &str =
    "- 알고리즘 태그는 풀이 힌트가 될 수 있으므로 추천 목록에 표시하지 마세요.";

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeContestParams {
    /// 분석할 대회 슬러그. 쉼표로 구분해 여러 대회를 비교할 수 있습니다. (예: "ucpc2022,ucpc2023")
    pub contest_slugs: String,
    /// true이면 연도별 출제 경향 변화를 비교합니다. (기본값: false)
    #[serde(default)]
    pub compare_years: Option<bool>,
}

/// Why the user is practising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// 학교 대회 준비
    School,
    /// ICPC, IOI 등 국제 대회 준비
    Icpc,
    /// 특정 대회의 과거 기출 준비 (targetContest 필요)
    SpecificContest,
    /// 일반적인 실력 향상
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendContestParams {
    /// 준비 목적: school, icpc, specific_contest, general
    pub purpose: Purpose,
    /// purpose가 specific_contest일 때 필수. 대회 이름 또는 슬러그 (예: "ucpc", "충남대학교")
    #[serde(default)]
    pub target_contest: Option<String>,
    /// 현재 티어 또는 목표 난이도 (예: "silver", "gold")
    #[serde(default)]
    pub current_tier: Option<String>,
    /// 집중하고 싶은 알고리즘 태그 (쉼표로 구분, 예: "dp,그리디")
    #[serde(default)]
    pub focus_tags: Option<String>,
    /// 추천받을 문제 수 (기본값: 10)
    #[serde(default = "default_problem_count")]
    pub problem_count: u32,
}

const fn default_problem_count() -> u32 {
    DEFAULT_PROBLEM_COUNT
}

fn split_slugs(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Builds the contest trend analysis guide.
#[must_use]
pub fn analyze_contest_guide(contest_slugs: &str, compare_years: bool, year: i32) -> String {
    let slugs = split_slugs(contest_slugs);
    let mut guide = String::new();
    let _ = writeln!(guide, "# BOJ 대회 출제 경향 분석 가이드\n");
    let _ = writeln!(guide, "**현재 연도**: {year}년");
    let _ = writeln!(guide, "**분석 대상 대회**: {}", slugs.join(", "));
    if compare_years && slugs.len() > 1 {
        let _ = writeln!(guide, "각 대회의 연도별 출제 경향 변화를 비교 분석하세요.");
    }
    let _ = writeln!(guide, "\n{LATEST_CONTEST_NOTE}\n");
    guide.push_str(
        r#"## 분석 절차

1. `search-problem`으로 `"/{대회슬러그}"`를 검색해 대회별 문제를 모두 조회하세요.
2. 알고리즘 태그별 출제 빈도와 비율을 집계하고 상위 10개 태그를 정리하세요.
3. levelLabel 기준으로 난이도 분포와 태그별 평균 난이도를 계산하세요.
4. 여러 대회라면 공통 출제 알고리즘과 특정 대회에만 나타나는 알고리즘을 구분하세요.
5. 대회 준비를 위한 우선순위 알고리즘과 난이도별 학습 순서를 제안하세요.

## 출력 형식

- 대회별 문제 수와 난이도 분포 요약
- 주요 알고리즘 태그 순위 (빈도, 비율, 평균 난이도)
- 학습 로드맵과 연습용 `search-problem` 쿼리 예시
- 각 문제의 URL (문제 지문은 제공되지 않습니다)"#,
    );
    guide
}

/// Builds the problem recommendation guide for `params`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn recommend_contest_guide(params: &RecommendContestParams, year: i32) -> String {
    let tier = non_blank(params.current_tier.as_deref());
    let focus = non_blank(params.focus_tags.as_deref());
    let count = params.problem_count;

    let (title, steps) = match params.purpose {
        Purpose::School => (
            "학교 대회 준비를 위한 문제 추천 가이드".to_string(),
            format!(
                "## 1단계: 학교 대회 찾기\n\
                 - `search-contest` 또는 `list-contest`로 학교 대회 슬러그를 확인하세요.\n\n\
                 ## 2단계: 기출 분석\n\
                 - `search-problem`으로 `\"/{{대회슬러그}}\"`를 검색하고 최근 3년간의 난이도 분포를 확인하세요.\n\
                 {focus_line}\n\
                 ## 3단계: 문제 추천 ({count}문제)\n\
                 - {tier_line}\n\
                 {NO_TAG_HINTS}\n\
                 - 문제 번호, 제목, 난이도, 출제 대회, 추천 이유를 포함하세요.\n\n\
                 ## 4단계: 학습 계획\n\
                 - 난이도별 풀이 순서와 주차별 목표를 제안하세요.",
                focus_line = focus_line(focus),
                tier_line = tier.map_or_else(
                    || "다양한 난이도 (Bronze ~ Gold)".to_string(),
                    |tier| format!("목표 난이도: {tier}"),
                ),
            ),
        ),
        Purpose::Icpc => (
            "ICPC 준비를 위한 문제 추천 가이드".to_string(),
            format!(
                "## 1단계: 국제 대회 찾기\n\
                 - `search-contest`로 ICPC, IOI, BAPC, NWERC, CERC 등의 슬러그를 확인하세요.\n\n\
                 ## 2단계: 출제 경향 분석\n\
                 - `search-problem`으로 대회별 문제를 조회하고 난이도 분포를 파악하세요.\n\
                 {focus_line}\n\
                 ## 3단계: 문제 추천 ({count}문제)\n\
                 - {tier_line}\n\
                 {NO_TAG_HINTS}\n\
                 - 문제 번호, 제목, 난이도, 출제 대회, 추천 이유를 포함하세요.\n\n\
                 ## 4단계: 팀 연습 전략\n\
                 - 3인 1팀 모의 대회 진행 방법, 역할 분담, 시간 관리 요령을 제안하세요.",
                focus_line = focus_line(focus),
                tier_line = tier.map_or_else(
                    || "Gold ~ Platinum 난이도 중심".to_string(),
                    |tier| format!("목표 난이도: {tier}"),
                ),
            ),
        ),
        Purpose::SpecificContest => {
            let Some(target) = non_blank(params.target_contest.as_deref()) else {
                return missing_target_guide();
            };
            (
                format!("{target} 대회 준비를 위한 맞춤 문제 추천 가이드"),
                format!(
                    "## 1단계: 대회 정보 찾기\n\
                     - `search-contest`로 \"{target}\" 관련 대회 슬러그와 개최 연도를 확인하세요.\n\n\
                     ## 2단계: 과거 기출 분석\n\
                     - 최근 3~5년 기출을 `search-problem`으로 조회하고 난이도 분포와 평균 시도 횟수를 확인하세요.\n\
                     {focus_line}\n\
                     ## 3단계: 유사 문제 추천 ({count}문제)\n\
                     - {tier_line}\n\
                     - 과거 기출을 우선 추천하고 비슷한 대회의 문제도 포함하세요.\n\
                     {NO_TAG_HINTS}\n\
                     - 실제 {target} 기출 여부, 출제 연도, 난이도를 표시하세요.\n\n\
                     ## 4단계: 실전 대비\n\
                     - 모의 대회 일정, 시간 내 목표 문제 수, 약점 보완 계획을 제안하세요.",
                    focus_line = focus_line(focus),
                    tier_line = tier.map_or_else(
                        || "실제 대회와 비슷한 난이도".to_string(),
                        |tier| format!("목표 난이도: {tier}"),
                    ),
                ),
            )
        }
        Purpose::General => (
            "알고리즘 실력 향상을 위한 대회 문제 추천 가이드".to_string(),
            format!(
                "## 1단계: 현재 실력 확인\n\
                 - {tier_status}\n\
                 {focus_line}\n\
                 ## 2단계: 대회 고르기\n\
                 - `list-contest`로 학교 대회, 국제 대회, 온라인 대회를 고루 선택하세요.\n\n\
                 ## 3단계: 문제 추천 ({count}문제)\n\
                 - `search-problem`으로 여러 대회의 문제를 검색하세요.\n\
                 - {tier_line}\n\
                 {NO_TAG_HINTS}\n\
                 - 문제 번호, 제목, 난이도, 출제 대회, 추천 이유를 포함하세요.\n\n\
                 ## 4단계: 학습 로드맵\n\
                 - 주차별 목표 문제 수와 난이도 상승 계획을 제안하세요.",
                tier_status = tier.map_or_else(
                    || "`user-stat`으로 현재 티어를 확인하세요.".to_string(),
                    |tier| format!("현재 티어: {tier}"),
                ),
                focus_line = focus_line(focus),
                tier_line = tier.map_or_else(
                    || "현재 수준보다 한 단계 높은 난이도에 도전".to_string(),
                    |tier| format!("{tier} 난이도 중심"),
                ),
            ),
        ),
    };

    format!("# {title}\n\n**현재 연도**: {year}년\n\n{LATEST_CONTEST_NOTE}\n\n{steps}")
}

fn focus_line(focus: Option<&str>) -> String {
    focus.map_or_else(String::new, |tags| format!("- 집중 알고리즘: {tags}\n"))
}

fn missing_target_guide() -> String {
    r#"# 오류: targetContest 누락

purpose로 'specific_contest'를 선택했지만 targetContest가 비어 있습니다.
준비하려는 대회 이름이나 슬러그를 targetContest에 입력해주세요.

예시: "ucpc", "충남대학교", "icpc korea""#
        .to_string()
}

fn current_year() -> i32 {
    Local::now().year()
}

#[tool_router(router = tool_router_guide, vis = "pub")]
impl BojMcp {
    #[tool(
        name = "analyze-contest",
        description = "특정 대회의 출제 경향(난이도 분포, 자주 나오는 알고리즘 태그)을 분석하는 절차를 안내합니다."
    )]
    async fn analyze_contest(
        &self,
        Parameters(params): Parameters<AnalyzeContestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let guide = analyze_contest_guide(
            &params.contest_slugs,
            params.compare_years.unwrap_or(false),
            current_year(),
        );
        Ok(CallToolResult::success(vec![Content::text(guide)]))
    }

    #[tool(
        name = "recommend-contest-problems",
        description = "학교 대회, ICPC, 특정 대회 준비 등 목적에 맞는 대회 문제를 찾는 방법을 안내합니다."
    )]
    async fn recommend_contest_problems(
        &self,
        Parameters(params): Parameters<RecommendContestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let guide = recommend_contest_guide(&params, current_year());
        Ok(CallToolResult::success(vec![Content::text(guide)]))
    }
}
