use boj_types::{Collection, LevelStat, ProblemSummary, TagStat, UserProblemStat};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BojMcp, helpers};

/// Parameters shared by the user statistics tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UserHandleParams {
    /// BOJ 사용자 핸들. 생략하면 서버에 설정된 기본 핸들을 사용합니다.
    #[serde(default)]
    pub handle: Option<String>,
}

/// Level buckets with a readable label.
#[must_use]
pub fn level_breakdown(stats: &[UserProblemStat]) -> Collection<LevelStat> {
    Collection::counted(stats.iter().map(LevelStat::from).collect())
}

#[tool_router(router = tool_router_user, vis = "pub")]
impl BojMcp {
    #[tool(
        name = "user-stat",
        description = "사용자가 푼 문제 수를 난이도별로 조회합니다."
    )]
    async fn user_stat(
        &self,
        Parameters(params): Parameters<UserHandleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = self.resolve_handle(params.handle)?;
        debug!(%handle, "user problem stats");
        let stats = self
            .api()
            .user_problem_stats(&handle)
            .await
            .map_err(helpers::map_fetch_err)?;
        Ok(CallToolResult::success(vec![Content::json(level_breakdown(&stats))?]))
    }

    #[tool(
        name = "user-stat-tag",
        description = "사용자가 푼 문제 수를 알고리즘 태그별로 조회합니다."
    )]
    async fn user_stat_tag(
        &self,
        Parameters(params): Parameters<UserHandleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = self.resolve_handle(params.handle)?;
        debug!(%handle, "user tag stats");
        let stats = self
            .api()
            .user_tag_stats(&handle)
            .await
            .map_err(helpers::map_fetch_err)?;
        let stats = stats.map(TagStat::from);
        Ok(CallToolResult::success(vec![Content::json(stats)?]))
    }

    #[tool(
        name = "user-top100-problems",
        description = "사용자가 푼 문제 중 난이도가 가장 높은 100문제를 조회합니다."
    )]
    async fn user_top100_problems(
        &self,
        Parameters(params): Parameters<UserHandleParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = self.resolve_handle(params.handle)?;
        debug!(%handle, "user top 100");
        let problems = self
            .api()
            .user_top_100(&handle)
            .await
            .map_err(helpers::map_fetch_err)?;
        let summaries = problems.map(ProblemSummary::from);
        Ok(CallToolResult::success(vec![Content::json(summaries)?]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    use crate::tests::offline_server;

    const fn stat(level: i32, solved: u64) -> UserProblemStat {
        UserProblemStat {
            level,
            total: 100,
            solved,
            partial: 0,
            tried: 0,
        }
    }

    #[test]
    fn breakdown_labels_every_level() {
        let stats = vec![stat(0, 3), stat(5, 0), stat(11, 42), stat(31, 1)];
        let breakdown = level_breakdown(&stats);
        assert_eq!(breakdown.count, 4);
        let labels: Vec<_> = breakdown
            .items
            .iter()
            .map(|item| item.level_label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Unrated / Not Ratable", "Bronze I", "Gold V", "Master"]
        );
    }

    #[tokio::test]
    async fn missing_handle_is_rejected_before_any_request() {
        let server = offline_server(None);
        let err = server
            .user_stat(Parameters(UserHandleParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn default_handle_reaches_the_upstream() {
        let server = offline_server(Some("koosaga"));
        let err = server
            .user_top100_problems(Parameters(UserHandleParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(
            err.message,
            "solved.ac 조회 중 오류가 발생했습니다: request failed: offline"
        );
    }
}
