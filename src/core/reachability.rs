use crate::domain::ports::ReachabilityChecker;
use crate::utils::error::{Result, TrackerError};
use reqwest::{redirect, Client};
use std::time::Duration;

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// 以 HEAD 請求確認 URL 是否存在，跟隨重新導向。
/// 最終狀態碼落在 [200, 400) 視為可連線。
#[derive(Debug, Clone)]
pub struct HttpReachabilityChecker {
    client: Client,
}

impl HttpReachabilityChecker {
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .build()
            .map_err(|e| TrackerError::ConfigError {
                message: format!("Failed to build reachability HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_CHECK_TIMEOUT, DEFAULT_MAX_REDIRECTS)
    }
}

#[async_trait::async_trait]
impl ReachabilityChecker for HttpReachabilityChecker {
    async fn is_reachable(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }

        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::debug!("HEAD {} -> {}", url, status);
                (200..400).contains(&status)
            }
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;

    fn checker() -> HttpReachabilityChecker {
        HttpReachabilityChecker::with_defaults().unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_is_reachable() {
        let server = MockServer::start();
        let ok_mock = server.mock(|when, then| {
            when.method(HEAD).path("/ok");
            then.status(200);
        });

        assert!(checker().is_reachable(&server.url("/ok")).await);
        ok_mock.assert();
    }

    #[tokio::test]
    async fn test_not_found_is_unreachable() {
        let server = MockServer::start();
        let dead_mock = server.mock(|when, then| {
            when.method(HEAD).path("/dead");
            then.status(404);
        });

        assert!(!checker().is_reachable(&server.url("/dead")).await);
        dead_mock.assert();
    }

    #[tokio::test]
    async fn test_server_error_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/broken");
            then.status(503);
        });

        assert!(!checker().is_reachable(&server.url("/broken")).await);
    }

    #[tokio::test]
    async fn test_redirect_to_ok_is_reachable() {
        let server = MockServer::start();
        let target = server.url("/new");
        let redirect_mock = server.mock(|when, then| {
            when.method(HEAD).path("/old");
            then.status(301).header("Location", target.as_str());
        });
        let target_mock = server.mock(|when, then| {
            when.method(HEAD).path("/new");
            then.status(200);
        });

        assert!(checker().is_reachable(&server.url("/old")).await);
        redirect_mock.assert();
        target_mock.assert();
    }

    #[tokio::test]
    async fn test_redirect_to_missing_page_is_unreachable() {
        let server = MockServer::start();
        let target = server.url("/gone");
        server.mock(|when, then| {
            when.method(HEAD).path("/moved");
            then.status(302).header("Location", target.as_str());
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/gone");
            then.status(404);
        });

        assert!(!checker().is_reachable(&server.url("/moved")).await);
    }

    #[tokio::test]
    async fn test_redirect_loop_is_unreachable() {
        let server = MockServer::start();
        let target = server.url("/loop");
        let loop_mock = server.mock(|when, then| {
            when.method(HEAD).path("/loop");
            then.status(302).header("Location", target.as_str());
        });

        let checker = HttpReachabilityChecker::new(DEFAULT_CHECK_TIMEOUT, 3).unwrap();

        assert!(!checker.is_reachable(&server.url("/loop")).await);
        // 有跟隨轉址，直到超過上限才放棄
        assert!(loop_mock.hits() > 1);
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/slow");
            then.status(200).delay(Duration::from_millis(800));
        });

        let checker = HttpReachabilityChecker::new(Duration::from_millis(100), 10).unwrap();

        assert!(!checker.is_reachable(&server.url("/slow")).await);
    }

    #[tokio::test]
    async fn test_empty_url_makes_no_request() {
        let server = MockServer::start();
        let any_mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        assert!(!checker().is_reachable("").await);
        any_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_unparsable_url_is_unreachable() {
        assert!(!checker().is_reachable("not a url").await);
        assert!(!checker().is_reachable("ftp://example.invalid/file").await);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        assert!(!checker().is_reachable("http://127.0.0.1:1/").await);
    }
}
