//! Quote sources queried by the poller.
//!
//! `QuoteSource` is the seam between the poller and the network: the production
//! implementation is [`HttpQuoteSource`], tests substitute in-memory fakes.
use std::future::Future;

use log::debug;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use stock_common::net::{CACHE_CONTROL_NO_CACHE, CONTENT_TYPE_JSON};
use stock_common::quote::decode_quote_body;
use stock_common::{FilterState, QuoteResult, Result, Ticker, TrackerError};

/// Something that can produce one ticker's quote for a given filter state.
pub trait QuoteSource: Send + Sync + 'static {
    /// Fetches the quote for `ticker`.
    ///
    /// An `Err` fails the whole cycle; a per-ticker problem reported by the
    /// source itself comes back as `Ok(QuoteResult::Error { .. })`.
    fn fetch(&self, filters: &FilterState, ticker: Ticker) -> impl Future<Output = Result<QuoteResult>> + Send;
}

/// Quote source backed by `GET {endpoint}?interval=..&ticker=..` requests.
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQuoteSource {
    /// Creates a source for the given endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TrackerError::Request(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
        })
    }

    /// The endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch(&self, filters: &FilterState, ticker: Ticker) -> impl Future<Output = Result<QuoteResult>> + Send {
        let request = self
            .client
            .get(&self.endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(CACHE_CONTROL, CACHE_CONTROL_NO_CACHE)
            .query(&filters.query_pairs(ticker));

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TrackerError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let reason = status.canonical_reason().unwrap_or("Unknown Status");
                return Err(TrackerError::ServerStatus(reason.to_string()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TrackerError::Request(e.to_string()))?;
            debug!("{}: received {} bytes", ticker, body.len());
            decode_quote_body(ticker, &body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_common::filters::{Interval, Letter, PercentChange, PriceRange, RefreshRate};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serves one canned HTTP response per accepted connection and reports
    /// the raw request head of each.
    async fn serve(status_line: &'static str, body: &'static str) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });
        (format!("http://{}/stocks", addr), rx)
    }

    fn filters() -> FilterState {
        FilterState {
            interval: Interval::OneMonth,
            refresh: RefreshRate::Ms3000,
            letter: Letter::new('B').unwrap(),
            percent_change: PercentChange::new(5).unwrap(),
            price_range: PriceRange::new(500).unwrap(),
        }
    }

    #[tokio::test]
    async fn sends_filters_as_query_and_headers() {
        let (endpoint, mut requests) = serve(
            "200 OK",
            r#"{"latest_close":150.2,"history":[{"time":"t1","close":149.0},{"time":"t2","close":150.2}]}"#,
        )
        .await;
        let source = HttpQuoteSource::new(&endpoint).unwrap();

        let result = source.fetch(&filters(), Ticker::AAPL).await.unwrap();
        assert!(matches!(result, QuoteResult::Data { latest_close, ref history } if latest_close == 150.2 && history.len() == 2));

        let head = requests.recv().await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /stocks?interval=1mo&ticker=AAPL&alphabetical=B&percentChange=5&priceRange=500 HTTP/1.1"
        );
        let lower = head.to_ascii_lowercase();
        assert!(lower.contains("content-type: application/json"));
        assert!(lower.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn per_ticker_error_is_not_a_failure() {
        let (endpoint, _requests) = serve("200 OK", r#"{"error":"No data available"}"#).await;
        let source = HttpQuoteSource::new(&endpoint).unwrap();

        let result = source.fetch(&filters(), Ticker::RIVN).await.unwrap();
        assert_eq!(
            result,
            QuoteResult::Error {
                error: "No data available".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_success_status_fails_with_reason() {
        let (endpoint, _requests) = serve("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let source = HttpQuoteSource::new(&endpoint).unwrap();

        let err = source.fetch(&filters(), Ticker::AAPL).await.unwrap_err();
        assert!(matches!(err, TrackerError::ServerStatus(_)));
        assert_eq!(err.to_string(), "Server Error: Internal Server Error");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = HttpQuoteSource::new(&format!("http://{}/stocks", addr)).unwrap();

        let err = source.fetch(&filters(), Ticker::AAPL).await.unwrap_err();
        assert!(matches!(err, TrackerError::Request(_)));
    }
}
