//! Client for the remote sentiment analysis service

use crate::constants::{ANALYZE_PATH, FEEDBACK_PATH};
use crate::error::ServiceError;
use crate::types::*;
use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

/// The two calls the view makes against the sentiment service.
///
/// The service is opaque: implementations only move bodies over the wire.
pub trait SentimentService: Send + Sync {
    fn analyze(&self, review: ReviewInput) -> BoxFuture<'_, Result<AnalysisResult, ServiceError>>;

    fn submit_feedback(&self, rating: FeedbackRating) -> BoxFuture<'_, Result<(), ServiceError>>;
}

/// reqwest-backed service client
pub struct HttpSentimentService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSentimentService {
    /// `base_url` must be an absolute http(s) origin. `timeout` of `None`
    /// lets a hung request wait forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = parse_base_url(&base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // A local service is never reached through a system proxy
        if is_loopback(&parsed) {
            builder = builder.no_proxy();
        }
        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_analyze(&self, review: ReviewInput) -> Result<AnalysisResult, ServiceError> {
        let url = self.endpoint(ANALYZE_PATH);
        debug!(url = %url, chars = review.as_str().len(), "Posting review");

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { review: review.as_str() })
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status,
                message: error_message(&bytes),
            });
        }

        let result: AnalysisResult = serde_json::from_slice(&bytes)?;
        debug!(
            findings = result.analysis.len(),
            overall = %result.overall_sentiment,
            "Analysis received"
        );
        Ok(result)
    }

    async fn post_feedback(&self, rating: FeedbackRating) -> Result<(), ServiceError> {
        let url = self.endpoint(FEEDBACK_PATH);
        debug!(url = %url, rating = rating.stars(), "Posting feedback");

        let response = self
            .client
            .post(&url)
            .json(&FeedbackRequest { feedback: rating })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        Err(ServiceError::Status {
            status,
            message: error_message(&bytes),
        })
    }
}

impl SentimentService for HttpSentimentService {
    fn analyze(&self, review: ReviewInput) -> BoxFuture<'_, Result<AnalysisResult, ServiceError>> {
        Box::pin(self.post_analyze(review))
    }

    fn submit_feedback(&self, rating: FeedbackRating) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(self.post_feedback(rating))
    }
}

fn parse_base_url(base_url: &str) -> Result<reqwest::Url, ServiceError> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| ServiceError::InvalidUrl(format!("{base_url} ({e})")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ServiceError::InvalidUrl(format!(
            "{base_url} (scheme must be http or https)"
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ServiceError::InvalidUrl(format!("{base_url} (missing host)")));
    }
    Ok(url)
}

fn is_loopback(url: &reqwest::Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    host.eq_ignore_ascii_case("localhost")
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

/// Pull `{ "error": "..." }` out of a failure body, ignoring anything else
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal one-shot HTTP server. Answers each request with the next
    /// canned `(status line, body)` and records the request line and body.
    async fn mock_server(
        replies: Vec<(&'static str, String)>,
    ) -> (String, Arc<Mutex<Vec<(String, String)>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                let line = request.lines().next().unwrap_or_default().to_string();
                let payload = request
                    .split_once("\r\n\r\n")
                    .map(|(_, b)| b.to_string())
                    .unwrap_or_default();
                log.lock().unwrap().push((line, payload));

                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(resp.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();
            }
        });

        (format!("http://127.0.0.1:{port}"), seen)
    }

    /// Read headers, then exactly Content-Length bytes of body
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let len = head
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if body.len() >= len {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    const ANALYSIS_BODY: &str = r#"{
        "review": "Battery is great but the screen is dim.",
        "overall_sentiment": "NEGATIVE",
        "sentiment_percentages": {"positive_percentage": 50.0, "negative_percentage": 50.0},
        "analysis": [
            {"sentence": "Battery is great", "aspects": ["battery"], "sentiment": "POSITIVE", "sentiment_words": ["great"]},
            {"sentence": "the screen is dim.", "aspects": ["screen"], "sentiment": "NEGATIVE", "sentiment_words": ["dim"]}
        ]
    }"#;

    #[tokio::test]
    async fn analyze_posts_review_json() {
        let (url, seen) = mock_server(vec![("200 OK", ANALYSIS_BODY.to_string())]).await;
        let service = HttpSentimentService::new(&url, None).unwrap();

        let review = ReviewInput::parse("  Battery is great but the screen is dim.  ").unwrap();
        let result = service.analyze(review).await.unwrap();

        assert_eq!(result.overall_sentiment, "NEGATIVE");
        assert_eq!(result.analysis.len(), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.starts_with("POST /analyze "));
        let body: serde_json::Value = serde_json::from_str(&seen[0].1).unwrap();
        assert_eq!(body, serde_json::json!({"review": "Battery is great but the screen is dim."}));
    }

    #[tokio::test]
    async fn analyze_non_ok_is_status_error() {
        let (url, _) = mock_server(vec![(
            "400 Bad Request",
            r#"{"error":"No valid sentences found"}"#.to_string(),
        )])
        .await;
        let service = HttpSentimentService::new(&url, None).unwrap();

        let err = service.analyze(ReviewInput::parse("...").unwrap()).await.unwrap_err();
        match err {
            ServiceError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("No valid sentences found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_malformed_body_is_decode_error() {
        let (url, _) = mock_server(vec![("200 OK", r#"{"overall_sentiment":1}"#.to_string())]).await;
        let service = HttpSentimentService::new(&url, None).unwrap();

        let err = service.analyze(ReviewInput::parse("fine").unwrap()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn feedback_posts_rating_and_accepts_any_2xx() {
        let (url, seen) = mock_server(vec![(
            "202 Accepted",
            r#"{"message":"Feedback submitted successfully!"}"#.to_string(),
        )]).await;
        let service = HttpSentimentService::new(&format!("{url}/"), None).unwrap();

        service.submit_feedback(FeedbackRating::new(3).unwrap()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen[0].0.starts_with("POST /feedback "));
        assert_eq!(seen[0].1, r#"{"feedback":3}"#);
    }

    #[tokio::test]
    async fn feedback_failure_carries_server_message() {
        let (url, _) = mock_server(vec![
            ("400 Bad Request", r#"{"error":"Invalid feedback rating"}"#.to_string()),
            ("500 Internal Server Error", "oops".to_string()),
        ])
        .await;
        let service = HttpSentimentService::new(&url, None).unwrap();
        let rating = FeedbackRating::new(5).unwrap();

        let first = service.submit_feedback(rating).await.unwrap_err();
        assert_eq!(first.server_message(), Some("Invalid feedback rating"));

        let second = service.submit_feedback(rating).await.unwrap_err();
        assert_eq!(second.server_message(), None);
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let service = HttpSentimentService::new(&format!("http://127.0.0.1:{port}"), None).unwrap();

        let err = service.analyze(ReviewInput::parse("hello").unwrap()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[test]
    fn loopback_detection() {
        let loopback = |s: &str| is_loopback(&parse_base_url(s).unwrap());
        assert!(loopback("http://localhost:5000"));
        assert!(loopback("http://127.0.0.1:5000"));
        assert!(loopback("http://[::1]:5000"));
        assert!(!loopback("https://sentiment.example.com"));
    }

    #[test]
    fn rejects_unusable_base_urls() {
        for bad in ["not a url", "localhost:5000", "ftp://files.example.com", "file:///tmp/x", ""] {
            let err = HttpSentimentService::new(bad, None).err();
            assert!(
                matches!(err, Some(ServiceError::InvalidUrl(_))),
                "{bad:?} should be rejected, got {err:?}"
            );
        }
        assert!(HttpSentimentService::new("https://sentiment.example.com/api/", None).is_ok());
    }

    #[test]
    fn base_url_is_normalized() {
        let service = HttpSentimentService::new(" http://localhost:5000/ ", None).unwrap();
        assert_eq!(service.base_url(), "http://localhost:5000");
        assert_eq!(service.endpoint(ANALYZE_PATH), "http://localhost:5000/analyze");
    }
}
