//! HTTP Client Factory
//!
//! Builds the reqwest client used by providers, with optional proxy support.

use super::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` for the given proxy URL.
///
/// - `Some(url)` -> route all traffic through the proxy (`http`, `https` or `socks5`)
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
///
/// No request timeout is set; long uploads are bounded by the transport only.
pub fn build_http_client(proxy_url: Option<&str>) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    match proxy_url {
        Some(url) => {
            let proxy = reqwest::Proxy::all(url).map_err(|e| LlmError::InvalidRequest {
                message: format!("Invalid proxy URL '{}': {}", url, e),
            })?;
            builder = builder.proxy(proxy);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("Failed to build HTTP client: {}", e),
    })
}
