use std::{collections::BTreeMap, time::Duration};

use reqwest::{header::HeaderMap, StatusCode};

use crate::domain::response::{Cookie, Response};

const KB_IN_BYTES: usize = 1024;
const MB_IN_BYTES: usize = 1024 * KB_IN_BYTES;
const GB_IN_BYTES: usize = 1024 * MB_IN_BYTES;

pub fn build_response(
    res_status: StatusCode,
    res_headers: &HeaderMap,
    cookies: Vec<Cookie>,
    res_body: &[u8],
    duration: Duration,
) -> Response {
    Response {
        body: String::from_utf8_lossy(res_body).into_owned(),
        headers: first_header_values(res_headers),
        cookies,
        status: res_status.to_string(),
        duration,
        size: bytes_to_human(res_body.len()),
    }
}

/// Keeps the first value of every header; later values of a repeated
/// header are dropped.
pub fn first_header_values(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in headers {
        map.entry(canonical_header_name(name.as_str()))
            .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}

/// `content-type` -> `Content-Type`, `etag` -> `Etag`.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Whole units only, 1024-based: `2047` is `1 KB`.
pub fn bytes_to_human(byte_len: usize) -> String {
    if byte_len >= GB_IN_BYTES {
        format!("{} GB", byte_len / GB_IN_BYTES)
    } else if byte_len >= MB_IN_BYTES {
        format!("{} MB", byte_len / MB_IN_BYTES)
    } else if byte_len >= KB_IN_BYTES {
        format!("{} KB", byte_len / KB_IN_BYTES)
    } else {
        format!("{} bytes", byte_len)
    }
}
