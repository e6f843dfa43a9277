use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    multipart, Client, Method, RequestBuilder, Url,
};

use crate::domain::request::{Auth, HttpMethod, Request, RequestBody};
use crate::error::ExecuteError;

pub fn convert_http_method(input: HttpMethod) -> Method {
    match input {
        HttpMethod::GET => Method::GET,
        HttpMethod::POST => Method::POST,
        HttpMethod::PUT => Method::PUT,
        HttpMethod::PATCH => Method::PATCH,
        HttpMethod::DELETE => Method::DELETE,
        HttpMethod::HEAD => Method::HEAD,
    }
}

/// Checked, non-empty header rows with set semantics (a repeated key keeps
/// its last value), then auth. Bearer is appended rather than set, so it
/// sits next to any hand-written `Authorization` row.
pub fn build_headers(request: &Request) -> Result<HeaderMap, ExecuteError> {
    let mut headers = HeaderMap::new();
    for header in &request.headers {
        if !header.checked || header.key.is_empty() || header.value.is_empty() {
            continue;
        }
        let name = HeaderName::from_bytes(header.key.as_bytes())
            .map_err(|e| ExecuteError::InvalidRequest(format!("header name {:?}: {e}", header.key)))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|e| ExecuteError::InvalidRequest(format!("header {}: {e}", header.key)))?;
        headers.insert(name, value);
    }

    match &request.auth {
        Auth::Basic { user, pass } if !user.is_empty() && !pass.is_empty() => {
            let encoded = STANDARD.encode(format!("{user}:{pass}"));
            headers.insert(AUTHORIZATION, sensitive(&format!("Basic {encoded}"))?);
        }
        Auth::Bearer { token, prefix } if !token.is_empty() && !prefix.is_empty() => {
            headers.append(AUTHORIZATION, sensitive(&format!("{prefix} {token}"))?);
        }
        _ => {}
    }

    Ok(headers)
}

fn sensitive(value: &str) -> Result<HeaderValue, ExecuteError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| ExecuteError::InvalidRequest(format!("authorization: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Turns a request into a ready-to-send builder. The body's content type
/// replaces any `Content-Type` row the user supplied.
pub fn build_request(client: &Client, request: &Request) -> Result<RequestBuilder, ExecuteError> {
    let url = Url::parse(&request.url)
        .map_err(|e| ExecuteError::InvalidRequest(format!("url {:?}: {e}", request.url)))?;
    let mut headers = build_headers(request)?;
    let builder = client.request(convert_http_method(request.method), url);

    if request.body.is_empty() {
        return Ok(builder.headers(headers));
    }

    let (content_type, text) = match &request.body {
        RequestBody::None => return Ok(builder.headers(headers)),
        RequestBody::Json(text) => ("application/json", text),
        RequestBody::Xml(text) => ("application/xml", text),
        RequestBody::Text(text) => ("text/plain", text),
        RequestBody::Form(fields) => {
            headers.remove(CONTENT_TYPE);
            let form = fields
                .iter()
                .filter(|field| field.checked)
                .fold(multipart::Form::new(), |form, field| {
                    form.text(field.key.clone(), field.value.clone())
                });
            return Ok(builder.headers(headers).multipart(form));
        }
    };
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    Ok(builder.headers(headers).body(text.clone()))
}
