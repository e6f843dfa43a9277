use super::request::FormType;

/// One edit to a request's query parameters, from either the list view or
/// the URL bar. Indices address the list as it was when the event fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamEvent {
    Add,
    Toggle { index: usize, checked: bool },
    SetKey { index: usize, key: String },
    SetValue { index: usize, value: String },
    Remove { index: usize },
    UrlEdited(String),
}

/// Both views of the query after an event has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    pub url: String,
    pub params: Vec<FormType>,
}
