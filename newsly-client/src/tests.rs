#[cfg(test)]
mod tests {
    use crate::{ApiClient, FeedLoader};
    use newsly_core::{ApiError, AppConfig, Candidate, CoreError, ErrorExt};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serves exactly one HTTP response and hands back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                if head.contains("transfer-encoding: chunked") {
                    if buf.ends_with(b"0\r\n\r\n") {
                        break;
                    }
                    continue;
                }
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn client_for(base: &str) -> ApiClient {
        let config = AppConfig {
            api_base_url: base.to_string(),
            subscriptions_base_url: base.to_string(),
            ..AppConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_login_success_posts_credentials() {
        let (base, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let client = client_for(&base);

        client.login("me@example.com", "hunter2").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/login"));
        assert!(request.contains(r#""email":"me@example.com""#));
        assert!(request.contains(r#""password":"hunter2""#));
    }

    #[tokio::test]
    async fn test_login_rejection_is_invalid_credentials() {
        let (base, _server) = serve_once("401 Unauthorized", r#"{"detail":"nope"}"#).await;
        let err = client_for(&base).login("me@example.com", "bad").await.unwrap_err();
        assert!(matches!(err, CoreError::Api(ApiError::InvalidCredentials)));
        assert_eq!(
            err.user_friendly_message(),
            "Invalid email or password. Please try again."
        );
    }

    #[tokio::test]
    async fn test_signup_mismatch_sends_nothing() {
        // Nothing listens here; a request would surface as a network error.
        let client = client_for("http://127.0.0.1:9");
        let err = client.signup("me@example.com", "a", "b").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        assert_eq!(client.get_metrics().await.total_requests, 0);
    }

    #[tokio::test]
    async fn test_signup_failure_carries_backend_message() {
        let (base, _server) =
            serve_once("400 Bad Request", r#"{"detail":"Email already registered"}"#).await;
        let err = client_for(&base)
            .signup("me@example.com", "pw", "pw")
            .await
            .unwrap_err();
        match err {
            CoreError::Api(ApiError::SignupFailed { reason }) => {
                assert_eq!(reason, "Email already registered")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scan_skips_malformed_candidates() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"id":"x","name":"Brew","sender":"crew@brew.com","count30d":9},"junk",{"sender":"a@b.com"}]}"#,
        )
        .await;

        let candidates = client_for(&base).scan_newsletters().await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].count_30d, 9);
        assert!(candidates[1].selected);
        assert!(server.await.unwrap().starts_with("POST /api/newsletters/scan"));
    }

    #[tokio::test]
    async fn test_scan_without_candidates_is_empty() {
        let (base, _server) = serve_once("200 OK", "not json").await;
        assert!(client_for(&base).scan_newsletters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_selection_reports_saved_count() {
        let (base, server) = serve_once("200 OK", r#"{"ok":true,"saved":1}"#).await;
        let selected = vec![Candidate::manual("Tech Weekly", "hello@tech-weekly.com")];

        assert_eq!(client_for(&base).save_selection(&selected).await.unwrap(), 1);
        let request = server.await.unwrap();
        assert!(request.contains(r#""selected":[{"#));
        assert!(request.contains("hello@tech-weekly.com"));
    }

    #[tokio::test]
    async fn test_http_error_uses_error_field() {
        let (base, _server) = serve_once("502 Bad Gateway", r#"{"error":"gmail unavailable"}"#).await;
        let err = client_for(&base).save_selection(&[]).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error: Request failed with status 502: gmail unavailable"
        );
    }

    #[tokio::test]
    async fn test_featured_is_normalized_and_sorted() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"items":[{"title":"B"},{"title":"A","date":"2024-01-01T00:00:00Z"}],"error":"partial"}"#,
        )
        .await;

        let items = client_for(&base).featured().await.unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert!(server
            .await
            .unwrap()
            .starts_with("GET /api/newsletters/featured HTTP"));
    }

    #[tokio::test]
    async fn test_featured_fast_mode() {
        let (base, server) = serve_once("200 OK", r#"{"items":[]}"#).await;
        let config = AppConfig {
            api_base_url: base,
            fast_featured: true,
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert!(client.featured().await.unwrap().is_empty());
        assert!(server
            .await
            .unwrap()
            .starts_with("GET /api/newsletters/featured?fast=1 HTTP"));
    }

    #[tokio::test]
    async fn test_subscribe_goes_to_subscriptions_service() {
        let (base, server) = serve_once("201 Created", "{}").await;
        let config = AppConfig {
            subscriptions_base_url: base,
            timezone: "Europe/Istanbul".to_string(),
            ..AppConfig::default()
        };
        ApiClient::new(&config)
            .unwrap()
            .subscribe(" me@example.com ")
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/subscriptions"));
        assert!(request.contains(r#""email":"me@example.com""#));
        assert!(request.contains(r#""tz":"Europe/Istanbul""#));
    }

    #[tokio::test]
    async fn test_summarize_error_body_is_backend_failure() {
        let (base, _server) =
            serve_once("200 OK", r#"{"error":"Could not extract text from PDF"}"#).await;
        let err = client_for(&base)
            .summarize_file(b"%PDF-1.4".to_vec(), "issue.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Api(ApiError::Backend { ref message }) if message == "Could not extract text from PDF"
        ));
    }

    #[tokio::test]
    async fn test_summarize_url_and_chat() {
        let (base, server) = serve_once("200 OK", r#"{"summary":"Short version."}"#).await;
        let summary = client_for(&base)
            .summarize_url("https://example.com/post")
            .await
            .unwrap();
        assert_eq!(summary, "Short version.");
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /summarize-url"));
        assert!(request.contains("name=\"url\""));

        let (base, server) = serve_once("200 OK", r#"{"answer":"42"}"#).await;
        let answer = client_for(&base)
            .chat_with_pdf(b"%PDF".to_vec(), "doc.pdf", "What is it?")
            .await
            .unwrap();
        assert_eq!(answer, "42");
        let request = server.await.unwrap();
        assert!(request.contains("filename=\"doc.pdf\""));
        assert!(request.contains("name=\"question\""));
    }

    #[tokio::test]
    async fn test_summarize_url_rejects_garbage_locally() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.summarize_url("not a link").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"));
        let err = client.featured().await.unwrap_err();
        assert_eq!(err.error_code(), "NETWORK");
        assert_eq!(err.user_friendly_message(), "Connection error. Please try again.");

        let metrics = client.get_metrics().await;
        assert_eq!(metrics.network_errors, 1);
    }

    #[tokio::test]
    async fn test_feed_loader_delivers_items() {
        let (base, _server) = serve_once("200 OK", r#"{"items":[{"id":1,"title":"Hi"}]}"#).await;
        let loader = FeedLoader::new(client_for(&base));
        let (_guard, future) = loader.start();
        let items = future.await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_loader_abort_on_drop() {
        init_tracing();
        // Accepts but never answers, so only the abort can finish the load.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            drop(socket);
        });

        let loader = FeedLoader::new(client_for(&format!("http://{addr}")));
        let (guard, future) = loader.start();
        let pending = tokio::spawn(future);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        drop(guard);

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(CoreError::Aborted)));
    }
}
