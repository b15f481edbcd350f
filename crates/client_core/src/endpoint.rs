//! Maps a configured gesture service address onto its websocket URL.

use url::Url;

use crate::error::SessionError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_WS_PATH: &str = "/ws";

pub fn resolve_ws_url(endpoint: &str) -> Result<Url, SessionError> {
    let endpoint = endpoint.trim();
    let mut url = Url::parse(endpoint).map_err(|source| SessionError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(SessionError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| SessionError::UnsupportedScheme {
            scheme: scheme.to_string(),
        })?;

    if url.path().is_empty() || url.path() == "/" {
        url.set_path(DEFAULT_WS_PATH);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionErrorKind;

    #[test]
    fn http_endpoint_maps_to_ws_with_default_path() {
        let url = resolve_ws_url(DEFAULT_ENDPOINT).expect("resolve");
        assert_eq!(url.as_str(), "ws://localhost:5000/ws");
    }

    #[test]
    fn https_endpoint_keeps_explicit_path_and_query() {
        let url = resolve_ws_url("https://gestures.example/socket?client=ui").expect("resolve");
        assert_eq!(url.as_str(), "wss://gestures.example/socket?client=ui");
    }

    #[test]
    fn websocket_endpoints_pass_through() {
        let url = resolve_ws_url(" ws://127.0.0.1:9000/events ").expect("resolve");
        assert_eq!(url.as_str(), "ws://127.0.0.1:9000/events");
    }

    #[test]
    fn rejects_other_schemes_as_connection_unavailable() {
        let err = resolve_ws_url("ftp://localhost:5000").expect_err("must fail");
        assert!(matches!(err, SessionError::UnsupportedScheme { ref scheme } if scheme == "ftp"));
        assert_eq!(err.kind(), SessionErrorKind::ConnectionUnavailable);
    }

    #[test]
    fn rejects_unparsable_endpoints() {
        let err = resolve_ws_url("localhost 5000").expect_err("must fail");
        assert!(matches!(err, SessionError::InvalidEndpoint { .. }));
    }
}
