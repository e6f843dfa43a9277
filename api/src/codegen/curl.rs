use crate::domain::request::{Auth, Request, RequestBody};

use super::{shell_quote, CodeGenerator};

pub struct CurlGenerator;

impl CodeGenerator for CurlGenerator {
    fn name(&self) -> &'static str {
        "cURL"
    }

    fn generate(&self, request: &Request) -> String {
        let mut parts = vec![format!("curl -X {} {}", request.method, shell_quote(&request.url))];

        for header in &request.headers {
            if header.checked && !header.key.is_empty() && !header.value.is_empty() {
                parts.push(format!("-H {}", shell_quote(&format!("{}: {}", header.key, header.value))));
            }
        }

        match &request.auth {
            Auth::Basic { user, pass } if !user.is_empty() && !pass.is_empty() => {
                parts.push(format!("-u {}", shell_quote(&format!("{user}:{pass}"))));
            }
            Auth::Bearer { token, prefix } if !token.is_empty() && !prefix.is_empty() => {
                parts.push(format!("-H {}", shell_quote(&format!("Authorization: {prefix} {token}"))));
            }
            _ => {}
        }

        if !request.body.is_empty() {
            let text = match &request.body {
                RequestBody::Json(text) => Some(("application/json", text)),
                RequestBody::Xml(text) => Some(("application/xml", text)),
                RequestBody::Text(text) => Some(("text/plain", text)),
                RequestBody::Form(_) | RequestBody::None => None,
            };
            match (text, &request.body) {
                (Some((content_type, text)), _) => {
                    parts.push(format!("-H {}", shell_quote(&format!("Content-Type: {content_type}"))));
                    parts.push(format!("--data-raw {}", shell_quote(text)));
                }
                (None, RequestBody::Form(fields)) => {
                    for field in fields.iter().filter(|field| field.checked) {
                        parts.push(format!("-F {}", shell_quote(&format!("{}={}", field.key, field.value))));
                    }
                }
                (None, _) => {}
            }
        }

        parts.join(" \\\n  ")
    }
}
