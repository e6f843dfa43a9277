use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

/// Normalized result of one send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub body: String,
    /// Canonical header name to the first value the server sent for it.
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
    /// Code and reason phrase, e.g. `201 Created`.
    pub status: String,
    pub duration: Duration,
    /// Human-scaled body size, e.g. `2 KB`.
    pub size: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl<'a> From<reqwest::cookie::Cookie<'a>> for Cookie {
    fn from(cookie: reqwest::cookie::Cookie<'a>) -> Self {
        Cookie {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure(),
            http_only: cookie.http_only(),
        }
    }
}
