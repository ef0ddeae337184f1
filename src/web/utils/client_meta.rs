use axum::http::HeaderMap;

use crate::relay::ClientMeta;

pub const FALLBACK_IP: &str = "0.0.0.0";

/// 依次读取 `x-forwarded-for`、`client-ip`，取逗号分隔的第一个地址
pub fn client_ip(headers: &HeaderMap) -> String {
    let raw = ["x-forwarded-for", "client-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find(|value| !value.is_empty())
        .unwrap_or("");

    let first = raw.split(',').next().unwrap_or("").trim();
    if first.is_empty() || first == "unknown" {
        FALLBACK_IP.to_string()
    } else {
        first.to_string()
    }
}

pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    ClientMeta {
        ip: client_ip(headers),
        user_agent: user_agent(headers),
    }
}
