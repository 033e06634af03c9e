use boj_types::ProblemSummary;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{BojMcp, helpers};

/// Sort key accepted by the solved.ac problem search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSort {
    Id,
    Level,
    Title,
    #[default]
    Solved,
    AverageTry,
    Random,
}

impl ProblemSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Level => "level",
            Self::Title => "title",
            Self::Solved => "solved",
            Self::AverageTry => "average_try",
            Self::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for the advanced problem search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchProblemParams {
    /// solved.ac 문제 고급 검색 쿼리.
    /// 주요 연산자: "..." 정확히 일치, () 그룹, - 제외, & AND, | OR.
    /// 필터 예시: *g4..g1 (난이도), id:1000..1099 (문제 번호), s#100..500 (푼 사람 수),
    /// #dp (태그), /ucpc2022 (출처), t#3..5 (평균 시도), %ko (언어), @$me (유저가 푼 문제),
    /// o@sogang (단체가 푼 문제), t@$me (시도한 문제), c/1 (CLASS), s?true (표준 난이도).
    /// 범위 표기: a..b(이상..이하), a..(이상), ..b(이하). 공백으로 구분된 조건은 AND로 해석됩니다.
    pub query: String,
    /// 정렬 기준 (기본값: solved)
    #[serde(default)]
    pub sort: ProblemSort,
    /// 정렬 방향 (기본값: asc)
    #[serde(default)]
    pub direction: SortDirection,
}

#[tool_router(router = tool_router_problem, vis = "pub")]
impl BojMcp {
    #[tool(
        name = "search-problem",
        description = "BOJ 문제를 검색합니다. 알고리즘 태그(#태그)를 사용하기 전에는 반드시 'search-tag' 또는 'list-tag' 도구로 유효한 태그 키를 확인하세요."
    )]
    async fn search_problem(
        &self,
        Parameters(params): Parameters<SearchProblemParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let problems = self
            .api()
            .search_problems(&params.query, params.sort.as_str(), params.direction.as_str())
            .await
            .map_err(helpers::map_fetch_err)?;
        let summaries = problems.map(ProblemSummary::from);
        Ok(CallToolResult::success(vec![Content::json(summaries)?]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_params_default_sort_and_direction() {
        let params: SearchProblemParams =
            serde_json::from_value(json!({ "query": "#dp" })).unwrap();
        assert_eq!(params.sort, ProblemSort::Solved);
        assert_eq!(params.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_keys_match_upstream_names() {
        let params: SearchProblemParams = serde_json::from_value(json!({
            "query": "/ucpc",
            "sort": "average_try",
            "direction": "desc"
        }))
        .unwrap();
        assert_eq!(params.sort.as_str(), "average_try");
        assert_eq!(params.direction.as_str(), "desc");
    }
}
