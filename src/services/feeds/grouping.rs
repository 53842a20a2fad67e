//! Grouping, flattening and search helpers shared by the feed views

use serde::Serialize;
use serde_json::Value;

/// An item tagged with the category it was listed under
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grouped<T> {
    pub item: T,
    pub group_label: String,
}

/// Flatten `{ "<label>": [item, ...], ... }` into `(item, label)` pairs
/// sorted by label. Order inside a label follows the payload.
///
/// Only array members are read; entries that fail to decode are skipped.
/// Group membership comes from the payload keys alone.
pub fn flatten_grouped<T, F>(object: &serde_json::Map<String, Value>, mut decode: F) -> Vec<Grouped<T>>
where
    F: FnMut(&Value) -> Option<T>,
{
    let mut out: Vec<Grouped<T>> = Vec::new();
    for (label, members) in object {
        let Some(members) = members.as_array() else {
            continue;
        };
        for member in members {
            if let Some(item) = decode(member) {
                out.push(Grouped {
                    item,
                    group_label: label.clone(),
                });
            }
        }
    }
    out.sort_by(|a, b| a.group_label.cmp(&b.group_label));
    out
}

/// Group items by a label, labels ascending, items in input order.
/// Empty labels land in "Other".
pub fn group_by_label<T, F>(items: impl IntoIterator<Item = T>, label_of: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> Option<String>,
{
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for item in items {
        let label = label_of(&item)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "Other".to_string());
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, list)) => list.push(item),
            None => groups.push((label, vec![item])),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// Trim and lower-case a search query. `None` means "no filter".
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// Case-insensitive substring match against any of the fields
pub fn matches_query(normalized: &str, fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(normalized))
}
