//! Query service over the solved.ac v3 API.

use std::sync::Arc;

use boj_types::schema::{
    DEFAULT_API_BASE,
    PATH_SEARCH_PROBLEM,
    PATH_TAG_LIST,
    PATH_USER_PROBLEM_STATS,
    PATH_USER_TAG_STATS,
    PATH_USER_TOP_100,
    endpoint,
};
use boj_types::{Collection, Problem, ProblemTag, UserProblemStat, UserTagStat};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{CatalogConfig, CatalogError, PagedCollectionCache};
use crate::fetch::{FetchClient, FetchError};

/// solved.ac client: one resilient fetch client plus the tag catalog cache.
#[derive(Debug, Clone)]
pub struct SolvedAcClient {
    client: FetchClient,
    base_url: String,
    tags: PagedCollectionCache<ProblemTag>,
}

impl SolvedAcClient {
    #[must_use]
    pub fn new(client: FetchClient, base_url: impl Into<String>, catalog: CatalogConfig) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let tags = PagedCollectionCache::new(
            client.clone(),
            endpoint(&base_url, PATH_TAG_LIST),
            catalog,
        );
        Self {
            client,
            base_url,
            tags,
        }
    }

    /// Client against the public solved.ac API with default cache settings.
    #[must_use]
    pub fn with_defaults(client: FetchClient) -> Self {
        Self::new(client, DEFAULT_API_BASE, CatalogConfig::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full algorithm-tag catalog, served from the coalescing cache.
    ///
    /// # Errors
    /// Returns [`CatalogError`] when the catalog sweep fails on its first page.
    pub async fn tag_list(&self) -> Result<Arc<Collection<ProblemTag>>, CatalogError> {
        self.tags.get().await
    }

    /// Advanced problem search (`query` uses solved.ac search syntax).
    ///
    /// # Errors
    /// Returns any fetch or decode error.
    pub async fn search_problems(
        &self,
        query: &str,
        sort: &str,
        direction: &str,
    ) -> Result<Collection<Problem>, FetchError> {
        self.get(
            PATH_SEARCH_PROBLEM,
            &[("query", query), ("sort", sort), ("direction", direction)],
        )
        .await
    }

    /// Per-level solve counts for `handle`.
    ///
    /// # Errors
    /// Returns any fetch or decode error.
    pub async fn user_problem_stats(
        &self,
        handle: &str,
    ) -> Result<Vec<UserProblemStat>, FetchError> {
        self.get(PATH_USER_PROBLEM_STATS, &[("handle", handle)]).await
    }

    /// Per-tag solve counts for `handle`.
    ///
    /// # Errors
    /// Returns any fetch or decode error.
    pub async fn user_tag_stats(
        &self,
        handle: &str,
    ) -> Result<Collection<UserTagStat>, FetchError> {
        self.get(PATH_USER_TAG_STATS, &[("handle", handle)]).await
    }

    /// The 100 highest-level problems solved by `handle`.
    ///
    /// # Errors
    /// Returns any fetch or decode error.
    pub async fn user_top_100(&self, handle: &str) -> Result<Collection<Problem>, FetchError> {
        self.get(PATH_USER_TOP_100, &[("handle", handle)]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = Url::parse_with_params(&endpoint(&self.base_url, path), params)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        debug!(%url, "solved.ac request");
        self.client.get_json(url.as_str()).await
    }
}

/// True when `base` parses as an absolute `http` or `https` URL with a host.
#[must_use]
pub fn is_http_base(base: &str) -> bool {
    Url::parse(base).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| !host.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;

    use crate::fetch::{FetchOptions, FnTransport, HttpResponse, TransportError, TransportFuture};

    fn recording_client(body: serde_json::Value) -> (SolvedAcClient, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();
        let body = body.to_string();
        let transport = FnTransport(move |url: String| -> TransportFuture<'static> {
            recorded.lock().unwrap().push(url);
            let body = body.clone();
            Box::pin(async move {
                Ok::<_, TransportError>(HttpResponse {
                    status: 200,
                    status_text: "OK".to_string(),
                    body,
                })
            })
        });
        let client = FetchClient::with_transport(Arc::new(transport), FetchOptions::default());
        (
            SolvedAcClient::new(client, "https://solved.ac/api/v3/", CatalogConfig::default()),
            seen,
        )
    }

    #[tokio::test]
    async fn search_encodes_query_parameters() {
        let (client, seen) = recording_client(json!({ "count": 0, "items": [] }));
        let result = client
            .search_problems("#dp *g5..g1", "level", "desc")
            .await
            .unwrap();
        assert_eq!(result.count, 0);

        let url = seen.lock().unwrap()[0].clone();
        assert!(url.starts_with("https://solved.ac/api/v3/search/problem?"));
        assert!(url.contains("query=%23dp+*g5..g1"));
        assert!(url.contains("sort=level"));
        assert!(url.contains("direction=desc"));
    }

    #[tokio::test]
    async fn user_stats_decode_plain_arrays() {
        let (client, seen) = recording_client(json!([
            { "level": 1, "total": 200, "solved": 12, "partial": 0, "tried": 1 },
            { "level": 2, "total": 180, "solved": 7, "partial": 0, "tried": 0 }
        ]));
        let stats = client.user_problem_stats("koosaga").await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].solved, 12);
        assert_eq!(
            seen.lock().unwrap()[0],
            "https://solved.ac/api/v3/user/problem_stats?handle=koosaga"
        );
    }

    #[tokio::test]
    async fn tag_list_uses_catalog_endpoint() {
        let (client, seen) = recording_client(json!({ "count": 0, "items": [] }));
        let tags = client.tag_list().await.unwrap();
        assert_eq!(tags.count, 0);
        assert_eq!(seen.lock().unwrap()[0], "https://solved.ac/api/v3/tag/list?page=1");
    }

    #[test]
    fn api_base_must_be_http_with_a_host() {
        assert!(is_http_base("https://solved.ac/api/v3"));
        assert!(is_http_base("http://127.0.0.1:4020/api/v3"));
        assert!(!is_http_base("ftp://solved.ac"));
        assert!(!is_http_base("http://:::"));
        assert!(!is_http_base("https://"));
        assert!(!is_http_base("solved.ac/api/v3"));
    }
}
