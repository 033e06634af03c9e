use std::borrow::Cow;

use boj_core::{CatalogError, FetchError};
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn map_fetch_err(err: FetchError) -> ErrorData {
    mcp_err(
        ErrorCode::INTERNAL_ERROR,
        format!("solved.ac 조회 중 오류가 발생했습니다: {err}"),
    )
}

#[allow(clippy::needless_pass_by_value)]
pub fn map_catalog_err(err: CatalogError) -> ErrorData {
    mcp_err(
        ErrorCode::INTERNAL_ERROR,
        format!("태그 목록 조회 중 오류가 발생했습니다: {err}"),
    )
}

#[allow(clippy::needless_pass_by_value)]
pub fn map_table_err(err: serde_json::Error) -> ErrorData {
    mcp_err(
        ErrorCode::INTERNAL_ERROR,
        format!("대회 목록을 읽는 중 오류가 발생했습니다: {err}"),
    )
}
