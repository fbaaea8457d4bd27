//! Networking constants for talking to the quote source.

/// Quote endpoint used when none is given on the command line.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/stocks";

/// `Content-Type` header value sent with every quote request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// `Cache-Control` header value sent with every quote request.
pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache";
