use boj_types::{Collection, ProblemTag, Tag};
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

/// Parameters for searching the tag catalog.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchTagParams {
    /// 태그 이름 (한국어 이름, 키, 약칭 모두 검색됩니다)
    pub query: String,
}

/// Normalizes the cached catalog; `count` stays the upstream total.
#[must_use]
pub fn tag_catalog(raw: &Collection<ProblemTag>) -> Collection<Tag> {
    raw.map(Tag::from)
}

#[must_use]
pub fn matching_tags(raw: &Collection<ProblemTag>, query: &str) -> Vec<Tag> {
    raw.items
        .iter()
        .map(Tag::from)
        .filter(|tag| tag.matches(query))
        .collect()
}

#[tool_router(router = tool_router_tag, vis = "pub")]
impl BojMcp {
    #[tool(name = "list-tag", description = "BOJ의 알고리즘 태그 목록을 조회합니다.")]
    async fn list_tag(&self) -> Result<CallToolResult, ErrorData> {
        let raw = self.api().tag_list().await.map_err(helpers::map_catalog_err)?;
        Ok(CallToolResult::success(vec![Content::json(tag_catalog(&raw))?]))
    }

    #[tool(
        name = "search-tag",
        description = "태그 이름을 이용해서 태그 슬러그를 반환합니다."
    )]
    async fn search_tag(
        &self,
        Parameters(params): Parameters<SearchTagParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let raw = self.api().tag_list().await.map_err(helpers::map_catalog_err)?;
        let matched = matching_tags(&raw, &params.query);
        Ok(CallToolResult::success(vec![Content::json(matched)?]))
    }
}
