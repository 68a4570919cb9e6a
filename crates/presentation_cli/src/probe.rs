//! Readiness probe against a running server (used by container healthchecks)

use reqwest::StatusCode;

/// Result of probing `/ready`
#[derive(Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady(StatusCode),
    Unreachable(String),
}

impl Readiness {
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Join a base URL and an absolute path without doubling the slash
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

pub async fn check_ready(client: &reqwest::Client, base_url: &str) -> Readiness {
    match client.get(endpoint_url(base_url, "/ready")).send().await {
        Ok(resp) if resp.status().is_success() => Readiness::Ready,
        Ok(resp) => Readiness::NotReady(resp.status()),
        Err(e) => Readiness::Unreachable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    #[test]
    fn endpoint_url_concatenates_correctly() {
        assert_eq!(
            endpoint_url("http://localhost:3000", "/ready"),
            "http://localhost:3000/ready"
        );
    }

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        assert_eq!(
            endpoint_url("http://example.com/", "/ready"),
            "http://example.com/ready"
        );
    }

    #[tokio::test]
    async fn ready_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ready"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let readiness = check_ready(&reqwest::Client::new(), &server.uri()).await;

        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn server_without_database() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ready"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let readiness = check_ready(&reqwest::Client::new(), &server.uri()).await;

        assert_eq!(
            readiness,
            Readiness::NotReady(StatusCode::SERVICE_UNAVAILABLE)
        );
    }

    #[tokio::test]
    async fn nothing_listening() {
        let readiness = check_ready(&reqwest::Client::new(), "http://127.0.0.1:1").await;
        assert!(matches!(readiness, Readiness::Unreachable(_)));
    }
}
