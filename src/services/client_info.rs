//! Best-effort device, browser and location inference from request headers.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub device_name: Option<String>,
    pub device_type: String,
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    pub ip_address: Option<String>,
    pub location: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let user_agent = header_str(headers, header::USER_AGENT.as_str()).unwrap_or("");
        let (ua_browser, ua_version) = browser_from_user_agent(user_agent);

        let browser = header_str(headers, "sec-ch-ua")
            .and_then(browser_from_client_hint)
            .unwrap_or(ua_browser);

        let browser_version = header_str(headers, "sec-ch-ua-full-version")
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or(ua_version);

        let os = header_str(headers, "sec-ch-ua-platform")
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or_else(|| os_from_user_agent(user_agent).to_string());

        let os_version = header_str(headers, "sec-ch-ua-platform-version")
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or_default();

        let device_type = if header_str(headers, "sec-ch-ua-mobile") == Some("?1") {
            "Mobile"
        } else {
            "Desktop"
        };

        Self {
            device_name: Some(user_agent.to_string()).filter(|ua| !ua.is_empty()),
            device_type: device_type.to_string(),
            browser: browser.to_string(),
            browser_version,
            os,
            os_version,
            ip_address: client_ip(headers, peer),
            location: location(headers),
        }
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self::from_headers(&parts.headers, peer))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Proxy headers first, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }

    header_str(headers, "x-real-ip")
        .or_else(|| header_str(headers, "cf-connecting-ip"))
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

fn location(headers: &HeaderMap) -> Option<String> {
    ["x-geo-city", "cf-ipcity", "cf-ipcountry", "x-country-code"]
        .iter()
        .find_map(|name| header_str(headers, name))
        .map(str::to_string)
}

fn browser_from_client_hint(hint: &str) -> Option<&'static str> {
    if hint.contains("Edge") {
        Some("Edge")
    } else if hint.contains("Chrome") {
        Some("Chrome")
    } else if hint.contains("Firefox") {
        Some("Firefox")
    } else if hint.contains("Safari") {
        Some("Safari")
    } else {
        None
    }
}

fn browser_from_user_agent(user_agent: &str) -> (&'static str, String) {
    let ua = user_agent.to_lowercase();

    // Edge and Chrome both advertise "chrome/", so Edge must be checked first.
    if ua.contains("edg/") {
        ("Edge", version_after(&ua, "edg/"))
    } else if ua.contains("chrome/") {
        ("Chrome", version_after(&ua, "chrome/"))
    } else if ua.contains("firefox/") {
        ("Firefox", version_after(&ua, "firefox/"))
    } else if ua.contains("safari/") {
        ("Safari", version_after(&ua, "version/"))
    } else {
        ("Unknown", String::new())
    }
}

fn version_after(ua: &str, prefix: &str) -> String {
    ua.find(prefix)
        .map(|idx| {
            ua[idx + prefix.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect()
        })
        .unwrap_or_default()
}

fn os_from_user_agent(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "Windows"
    } else if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        "iOS"
    } else if user_agent.contains("Macintosh") {
        "macOS"
    } else if user_agent.contains("Android") {
        "Android"
    } else if user_agent.contains("Linux") {
        "Linux"
    } else {
        "Unknown"
    }
}
