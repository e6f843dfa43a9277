//! Keeps a request's URL and its query-param list describing the same
//! checked pairs, whichever side was edited.
//!
//! The URL is never parsed as a whole: everything before `?` and from `#`
//! on is carried over byte for byte, so a hand-typed scheme, host or path
//! survives any edit made through the list.

use url::form_urlencoded;

use crate::domain::params::{ParamEvent, QueryState};
use crate::domain::request::FormType;

/// Splits into `(base, query, fragment)`; the fragment keeps its `#`.
fn split_url(url: &str) -> (&str, &str, &str) {
    let (rest, fragment) = match url.find('#') {
        Some(i) => url.split_at(i),
        None => (url, ""),
    };
    match rest.find('?') {
        Some(i) => (&rest[..i], &rest[i + 1..], fragment),
        None => (rest, "", fragment),
    }
}

/// Query pairs grouped by key in order of first appearance.
fn parse_query(query: &str) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => groups.push((key.into_owned(), vec![value.into_owned()])),
        }
    }
    groups
}

/// Form-encodes every checked row with a key, in list order.
pub fn encode_query(params: &[FormType]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for param in params.iter().filter(|p| p.checked && !p.key.is_empty()) {
        serializer.append_pair(&param.key, &param.value);
    }
    serializer.finish()
}

/// Rebuilds the query string of `url` from the checked rows of `params`.
pub fn reconcile_from_list(url: &str, params: &[FormType]) -> String {
    let (base, _, fragment) = split_url(url);
    let query = encode_query(params);
    if query.is_empty() {
        format!("{base}{fragment}")
    } else {
        format!("{base}?{query}{fragment}")
    }
}

/// Folds the query string of `url` back into `params`.
///
/// Rows are matched to URL keys by name, checked rows first. When several
/// rows share a key they take the URL's values in order and the last row
/// takes the last value, so a single row always ends up with the last
/// value. Rows with no key, and checked rows whose key left the URL, adopt
/// the next URL key nobody matched; a checked row left with nothing to
/// adopt is removed, as is a checked row whose value was emptied. Unchecked
/// rows are never removed. URL keys still unmatched are appended.
///
/// Going URL -> rows -> URL reproduces the query up to encoding: a bare key
/// comes back as `key=`, `%20` comes back as `+`, and repeated keys collapse
/// to their last value.
pub fn reconcile_from_url(url: &str, params: &[FormType]) -> Vec<FormType> {
    let (_, query, _) = split_url(url);
    let groups = parse_query(query);
    let mut rows: Vec<Option<FormType>> = params.iter().cloned().map(Some).collect();
    let mut taken = vec![false; groups.len()];

    for (group, (key, values)) in groups.iter().enumerate() {
        let mut holders: Vec<usize> = (0..params.len())
            .filter(|&i| params[i].checked && params[i].key == *key)
            .collect();
        if holders.is_empty() {
            holders = (0..params.len())
                .filter(|&i| !params[i].checked && params[i].key == *key)
                .collect();
        }
        if holders.is_empty() {
            continue;
        }
        taken[group] = true;

        let last = values.len() - 1;
        for (j, &i) in holders.iter().enumerate() {
            let value = if j + 1 == holders.len() {
                &values[last]
            } else {
                &values[j.min(last)]
            };
            let before = &params[i];
            if before.checked && !before.value.is_empty() && value.is_empty() {
                rows[i] = None;
            } else if let Some(row) = rows[i].as_mut() {
                row.value = value.clone();
                row.checked = true;
            }
        }
    }

    let unmatched: Vec<usize> = (0..groups.len()).filter(|&g| !taken[g]).collect();
    let mut free = unmatched.into_iter();
    for (i, param) in params.iter().enumerate() {
        let orphaned =
            param.checked && !param.key.is_empty() && !groups.iter().any(|(k, _)| *k == param.key);
        if !param.key.is_empty() && !orphaned {
            continue;
        }
        match free.next() {
            Some(group) => {
                taken[group] = true;
                let (key, values) = &groups[group];
                rows[i] = Some(FormType::new(key.clone(), values[values.len() - 1].clone()));
            }
            None if orphaned => rows[i] = None,
            None => {}
        }
    }

    let mut result: Vec<FormType> = rows.into_iter().flatten().collect();
    for (group, (key, values)) in groups.iter().enumerate() {
        if !taken[group] {
            result.push(FormType::new(key.clone(), values[values.len() - 1].clone()));
        }
    }
    result
}

/// Applies one edit and returns both views of the query afterwards.
///
/// List-side edits rewrite the URL unless it is still empty. Indices past
/// the end of the list leave everything as it was.
pub fn apply(url: &str, params: &[FormType], event: ParamEvent) -> QueryState {
    let mut list = params.to_vec();
    match event {
        ParamEvent::UrlEdited(url) => {
            let params = reconcile_from_url(&url, params);
            return QueryState { url, params };
        }
        ParamEvent::Add => list.push(FormType::new("", "")),
        ParamEvent::Toggle { index, checked } => match list.get_mut(index) {
            Some(row) => row.checked = checked,
            None => return unchanged(url, params),
        },
        ParamEvent::SetKey { index, key } => match list.get_mut(index) {
            Some(row) => row.key = key,
            None => return unchanged(url, params),
        },
        ParamEvent::SetValue { index, value } => match list.get_mut(index) {
            Some(row) => row.value = value,
            None => return unchanged(url, params),
        },
        ParamEvent::Remove { index } => {
            if index >= list.len() {
                return unchanged(url, params);
            }
            list.remove(index);
        }
    }

    let url = if url.is_empty() {
        String::new()
    } else {
        reconcile_from_list(url, &list)
    };
    QueryState { url, params: list }
}

fn unchanged(url: &str, params: &[FormType]) -> QueryState {
    QueryState {
        url: url.to_string(),
        params: params.to_vec(),
    }
}
