use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::domain::params::ParamEvent;
use crate::utilities::params;

#[derive(Clone, Copy, Serialize, Debug, Deserialize, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
}
impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct HttpMethodParseError(pub String);
impl std::fmt::Display for HttpMethodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported http method {:?}", self.0)
    }
}
impl std::error::Error for HttpMethodParseError {}

impl FromStr for HttpMethod {
    type Err = HttpMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            "HEAD" => Ok(HttpMethod::HEAD),
            _ => Err(HttpMethodParseError(s.to_string())),
        }
    }
}

/// A checkbox-gated key/value row, used for query params, headers and form
/// body fields. Unchecked rows stay in the list but never reach the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct FormType {
    pub checked: bool,
    pub key: String,
    pub value: String,
}

impl FormType {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        FormType {
            checked: true,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn unchecked(key: impl Into<String>, value: impl Into<String>) -> Self {
        FormType {
            checked: false,
            ..FormType::new(key, value)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    JSON,
    XML,
    Text,
    Form,
    None,
}

impl BodyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::JSON => "JSON",
            BodyType::XML => "XML",
            BodyType::Text => "Text",
            BodyType::Form => "Form",
            BodyType::None => "none",
        }
    }

    /// Anything unrecognised, including the empty string, means no body.
    pub fn parse(s: &str) -> Self {
        match s {
            "JSON" => BodyType::JSON,
            "XML" => BodyType::XML,
            "Text" => BodyType::Text,
            "Form" => BodyType::Form,
            _ => BodyType::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    None,
    Json(String),
    Xml(String),
    Text(String),
    Form(Vec<FormType>),
}

impl RequestBody {
    pub fn body_type(&self) -> BodyType {
        match self {
            RequestBody::None => BodyType::None,
            RequestBody::Json(_) => BodyType::JSON,
            RequestBody::Xml(_) => BodyType::XML,
            RequestBody::Text(_) => BodyType::Text,
            RequestBody::Form(_) => BodyType::Form,
        }
    }

    /// True when nothing would be attached to the outbound call.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::None => true,
            RequestBody::Json(text) | RequestBody::Xml(text) | RequestBody::Text(text) => {
                text.is_empty()
            }
            RequestBody::Form(fields) => fields.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    None,
    Basic {
        user: String,
        pass: String,
    },
    Bearer {
        token: String,
        prefix: String,
    },
}

/// One HTTP call as edited in a tab.
///
/// The in-memory form keeps body and auth as sum types; the on-disk form
/// is the flat [`RequestDocument`] and conversion happens through serde.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RequestDocument", into = "RequestDocument")]
pub struct Request {
    pub id: Option<String>,
    pub method: HttpMethod,
    pub url: String,
    pub query_params: Vec<FormType>,
    pub headers: Vec<FormType>,
    pub body: RequestBody,
    pub auth: Auth,
    pub is_dirty: bool,
}

// Equality ignores the transient dirty flag.
impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.method == other.method
            && self.url == other.url
            && self.query_params == other.query_params
            && self.headers == other.headers
            && self.body == other.body
            && self.auth == other.auth
    }
}

impl Default for Request {
    fn default() -> Self {
        Request::with_user_agent(&config::default_user_agent())
    }
}

impl Request {
    /// A fresh tab: one blank query row and the stock header set.
    pub fn with_user_agent(user_agent: &str) -> Self {
        Request {
            id: None,
            method: HttpMethod::GET,
            url: String::new(),
            query_params: vec![FormType::new("", "")],
            headers: vec![
                FormType::new("Accept", "*/*"),
                FormType::new("User-Agent", user_agent),
                FormType::new("Connection", "keep-alive"),
            ],
            body: RequestBody::None,
            auth: Auth::None,
            is_dirty: false,
        }
    }

    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Request {
            id: None,
            method,
            url: url.into(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::None,
            auth: Auth::None,
            is_dirty: false,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Routes one query-param edit through the URL/list reconciliation and
    /// stores both sides back on the request.
    pub fn apply_param_event(&mut self, event: ParamEvent) {
        let state = params::apply(&self.url, &self.query_params, event);
        self.url = state.url;
        self.query_params = state.params;
        self.mark_dirty();
    }
}

/// Persisted shape of a [`Request`], one JSON document per history file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RequestDocument {
    #[serde(rename = "ID")]
    pub id: String,
    pub method: String,
    #[serde(rename = "URL")]
    pub url: String,
    pub query_params: Option<Vec<FormType>>,
    pub headers: Option<Vec<FormType>>,
    pub body_type: String,
    pub body: BodyDocument,
    pub auth_type: String,
    pub auth: Option<AuthDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BodyDocument {
    pub json: String,
    pub text: String,
    pub xml: String,
    pub form: Option<Vec<FormType>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AuthDocument {
    pub basic_user: String,
    pub basic_pass: String,
    pub bearer_auth: String,
    pub bearer_prefix: String,
}

impl From<Request> for RequestDocument {
    fn from(request: Request) -> Self {
        let body_type = request.body.body_type().as_str().to_string();
        let mut body = BodyDocument::default();
        match request.body {
            RequestBody::None => {}
            RequestBody::Json(text) => body.json = text,
            RequestBody::Xml(text) => body.xml = text,
            RequestBody::Text(text) => body.text = text,
            RequestBody::Form(fields) => body.form = Some(fields),
        }

        let mut auth = AuthDocument::default();
        let auth_type = match request.auth {
            Auth::None => "None",
            Auth::Basic { user, pass } => {
                auth.basic_user = user;
                auth.basic_pass = pass;
                "Basic"
            }
            Auth::Bearer { token, prefix } => {
                auth.bearer_auth = token;
                auth.bearer_prefix = prefix;
                "Bearer"
            }
        };

        RequestDocument {
            id: request.id.unwrap_or_default(),
            method: request.method.to_string(),
            url: request.url,
            query_params: Some(request.query_params),
            headers: Some(request.headers),
            body_type,
            body,
            auth_type: auth_type.to_string(),
            auth: Some(auth),
        }
    }
}

impl TryFrom<RequestDocument> for Request {
    type Error = HttpMethodParseError;

    fn try_from(doc: RequestDocument) -> Result<Self, Self::Error> {
        let method = doc.method.parse()?;
        let body = match BodyType::parse(&doc.body_type) {
            BodyType::JSON => RequestBody::Json(doc.body.json),
            BodyType::XML => RequestBody::Xml(doc.body.xml),
            BodyType::Text => RequestBody::Text(doc.body.text),
            BodyType::Form => RequestBody::Form(doc.body.form.unwrap_or_default()),
            BodyType::None => RequestBody::None,
        };
        let auth_fields = doc.auth.unwrap_or_default();
        let auth = match doc.auth_type.as_str() {
            "Basic" => Auth::Basic {
                user: auth_fields.basic_user,
                pass: auth_fields.basic_pass,
            },
            "Bearer" => Auth::Bearer {
                token: auth_fields.bearer_auth,
                prefix: auth_fields.bearer_prefix,
            },
            _ => Auth::None,
        };

        Ok(Request {
            id: Some(doc.id).filter(|id| !id.is_empty()),
            method,
            url: doc.url,
            query_params: doc.query_params.unwrap_or_default(),
            headers: doc.headers.unwrap_or_default(),
            body,
            auth,
            is_dirty: false,
        })
    }
}
