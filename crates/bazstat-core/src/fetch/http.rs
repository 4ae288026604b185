//! Blocking GET of a small JSON document via libcurl.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::BazaarError;

/// Performs a GET and returns the response body.
///
/// Follows redirects. Non-2xx responses are errors.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub(crate) fn get_body(url: &str, limits: &HttpConfig) -> Result<Vec<u8>, BazaarError> {
    let network = |source: curl::Error| BazaarError::Network {
        url: url.to_string(),
        source,
    };

    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(network)?;
    easy.get(true).map_err(network)?;
    easy.follow_location(true).map_err(network)?;
    easy.max_redirections(10).map_err(network)?;
    easy.connect_timeout(limits.connect_timeout()).map_err(network)?;
    if limits.timeout() > Duration::ZERO {
        easy.timeout(limits.timeout()).map_err(network)?;
    }

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json").map_err(network)?;
    easy.http_headers(list).map_err(network)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(network)?;
        transfer.perform().map_err(network)?;
    }

    let code = easy.response_code().map_err(network)?;
    if !(200..300).contains(&code) {
        return Err(BazaarError::HttpStatus {
            url: url.to_string(),
            code,
        });
    }

    tracing::debug!("GET {} -> {} bytes", url, body.len());
    Ok(body)
}
