use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a mock HTTP server that serves HTML content at the specified path.
pub async fn mock_html_page(url_path: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_html(&server, url_path, html).await;
    server
}

/// Mounts an HTML response at `url_path` on an existing server.
pub async fn mount_html(server: &MockServer, url_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a `301` from `from_path` to `to_path` on the same server.
pub async fn mount_redirect(server: &MockServer, from_path: &str, to_path: &str) {
    Mock::given(method("GET"))
        .and(path(from_path))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}{}", server.uri(), to_path).as_str()),
        )
        .mount(server)
        .await;
}

/// Creates a mock HTTP server that delays responses to simulate network timeouts.
///
/// The server will wait for `delay_ms` milliseconds before responding with a 200 OK.
pub async fn mock_timeout_server(delay_ms: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>delayed response</body></html>")
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock HTTP server that returns the specified HTTP error status code.
pub async fn mock_error_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code).set_body_string("<html><body>Access denied</body></html>"))
        .mount(&server)
        .await;

    server
}

/// Creates a mock HTTP server that answers 200 with a whitespace-only body.
pub async fn mock_blank_page_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n  "))
        .mount(&server)
        .await;

    server
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_html_page_serves_html() {
        let server = mock_html_page("/about", "<html><body><h1>About</h1></body></html>").await;

        let response = reqwest::get(format!("{}/about", server.uri())).await.unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("About"));
    }

    #[tokio::test]
    async fn test_mock_error_server_returns_status_code() {
        let server = mock_error_server(503).await;

        let response = reqwest::get(format!("{}/any-path", server.uri())).await.unwrap();

        assert_eq!(response.status(), 503);
    }
}
