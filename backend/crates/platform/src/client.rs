//! Client identification

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Client IP: first `X-Forwarded-For` hop when it parses, else the socket
/// address.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
    forwarded.or(direct_ip)
}

/// Rate-limit key for a request; `"unknown"` when no address is available.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    extract_client_ip(headers, direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_first_forwarded_hop_wins() {
        let direct: IpAddr = "10.0.0.9".parse().unwrap();
        let ip = extract_client_ip(&forwarded("203.0.113.7, 10.0.0.1"), Some(direct));
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_unparseable_forwarded_falls_back() {
        let direct: IpAddr = "10.1.1.1".parse().unwrap();
        assert_eq!(extract_client_ip(&forwarded("unknown"), Some(direct)), Some(direct));
    }

    #[test]
    fn test_client_key() {
        let direct: IpAddr = "::1".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), Some(direct)), "::1");
        assert_eq!(client_key(&HeaderMap::new(), None), "unknown");
    }
}
