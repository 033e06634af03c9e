//! MCP server implementation for boj-mcp.
//!
//! This crate wires the solved.ac query service into rmcp tool handlers and
//! exposes the MCP-facing surface for problem search, the algorithm-tag catalog,
//! contest tags, user statistics, and contest study guides.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use boj_core::SolvedAcClient;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{
    CallToolResult,
    Content,
    ErrorCode,
    Implementation,
    ServerCapabilities,
    ServerInfo,
};

const SERVER_INSTRUCTIONS: &str = r"boj-mcp는 solved.ac 메타데이터를 이용해 백준 온라인 저지(BOJ) 문제, 알고리즘 태그, 대회, 사용자 통계를 조회하는 도구를 제공합니다.

Workflow:
1. 알고리즘 태그로 문제를 검색하기 전에 `search-tag` 또는 `list-tag`로 유효한 태그 키를 확인하세요.
2. 대회 문제를 찾을 때는 `search-contest` 또는 `list-contest`로 대회 슬러그를 확인한 뒤 `search-problem`에서 `/슬러그` 형태로 검색하세요.
3. 사용자 통계 도구(`user-stat`, `user-stat-tag`, `user-top100-problems`)는 handle을 생략하면 서버에 설정된 기본 핸들(BOJ_HANDLE)을 사용합니다.
4. `analyze-contest`와 `recommend-contest-problems`는 도구를 어떤 순서로 호출할지 안내하는 가이드를 반환합니다.

Notes:
- `list-tag`의 count는 solved.ac가 보고한 전체 태그 수입니다. 일부 페이지 조회에 실패하면 items가 count보다 적을 수 있습니다.
- 문제 지문은 제공되지 않습니다. 각 문제의 url을 참고하세요.
- `health` returns `ok`.";

/// MCP server wrapper around the solved.ac client and tool routers.
#[derive(Clone)]
pub struct BojMcp {
    tool_router: ToolRouter<Self>,
    api: Arc<SolvedAcClient>,
    default_handle: Option<String>,
}

impl BojMcp {
    /// Creates a new server owning the given client.
    #[must_use]
    pub fn new(api: SolvedAcClient, default_handle: Option<String>) -> Self {
        Self::with_client(Arc::new(api), default_handle)
    }

    /// Creates a new server using a shared client handle.
    #[must_use]
    pub fn with_client(api: Arc<SolvedAcClient>, default_handle: Option<String>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_problem()
            + Self::tool_router_tag()
            + Self::tool_router_contest()
            + Self::tool_router_user()
            + Self::tool_router_guide();
        let default_handle = default_handle
            .map(|handle| handle.trim().to_string())
            .filter(|handle| !handle.is_empty());
        Self {
            tool_router,
            api,
            default_handle,
        }
    }

    pub(crate) fn api(&self) -> &SolvedAcClient {
        &self.api
    }

    /// Picks the explicit handle, falling back to the configured default.
    pub(crate) fn resolve_handle(&self, handle: Option<String>) -> Result<String, ErrorData> {
        handle
            .map(|handle| handle.trim().to_string())
            .filter(|handle| !handle.is_empty())
            .or_else(|| self.default_handle.clone())
            .ok_or_else(|| {
                helpers::mcp_err(ErrorCode::INVALID_PARAMS, "사용자 핸들을 입력해주세요.")
            })
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl BojMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for BojMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "boj-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
