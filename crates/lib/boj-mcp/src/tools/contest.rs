use boj_core::contests::{contest_tags, search_contest_tags};
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

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchContestParams {
    /// 대회 이름 또는 슬러그 (예: "UCPC", "충남대", "icpc")
    pub query: String,
}

#[tool_router(router = tool_router_contest, vis = "pub")]
impl BojMcp {
    #[tool(
        name = "list-contest",
        description = "BOJ 대회 출처 태그(슬러그와 이름) 목록을 조회합니다. 슬러그는 search-problem에서 /슬러그 형태로 사용합니다."
    )]
    async fn list_contest(&self) -> Result<CallToolResult, ErrorData> {
        let contests = contest_tags().map_err(helpers::map_table_err)?;
        Ok(CallToolResult::success(vec![Content::json(contests)?]))
    }

    #[tool(
        name = "search-contest",
        description = "대회 이름이나 슬러그로 대회 출처 태그를 검색합니다."
    )]
    async fn search_contest(
        &self,
        Parameters(params): Parameters<SearchContestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let matched = search_contest_tags(&params.query).map_err(helpers::map_table_err)?;
        Ok(CallToolResult::success(vec![Content::json(matched)?]))
    }
}
