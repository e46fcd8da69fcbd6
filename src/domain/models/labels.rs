//! Views over a service's `deploy.labels`.
//!
//! Compose accepts labels either as a list of `key=value` strings or as a
//! `key: value` mapping. Lookups treat both the same way; writes keep
//! whichever form the document already uses.

use serde_yaml::{Mapping, Value};

/// Read-only label view.
#[derive(Debug, Clone, Copy)]
pub enum Labels<'a> {
    List(&'a [Value]),
    Map(&'a Mapping),
    /// `labels` is declared but null or a scalar.
    Empty,
}

impl Labels<'_> {
    /// Whether the exact `key=value` label is present.
    pub fn contains(&self, label: &str) -> bool {
        match self {
            Self::List(list) => list.iter().any(|entry| entry.as_str() == Some(label)),
            Self::Map(_) => {
                let (key, value) = split_label(label);
                self.value_of(key).as_deref() == Some(value)
            }
            Self::Empty => false,
        }
    }

    /// Value of the first label with the given key.
    pub fn value_of(&self, key: &str) -> Option<String> {
        match self {
            Self::List(list) => list.iter().filter_map(Value::as_str).find_map(|entry| {
                let (k, v) = split_label(entry);
                (k == key).then(|| v.to_string())
            }),
            Self::Map(map) => map.get(key).map(scalar_to_string),
            Self::Empty => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::List(list) => list.len(),
            Self::Map(map) => map.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What an upsert did to the label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelChange {
    Added,
    Replaced,
    Unchanged,
}

/// Mutable label view.
#[derive(Debug)]
pub enum LabelsMut<'a> {
    List(&'a mut Vec<Value>),
    Map(&'a mut Mapping),
}

impl LabelsMut<'_> {
    /// Set `key` to `value`.
    ///
    /// An existing label with the same key is rewritten in place, so
    /// running the injection twice never duplicates a label.
    pub fn upsert(&mut self, key: &str, value: &str) -> LabelChange {
        match self {
            Self::List(list) => {
                let rendered = format!("{key}={value}");
                let existing = list
                    .iter_mut()
                    .find(|entry| entry.as_str().is_some_and(|s| split_label(s).0 == key));
                match existing {
                    Some(entry) if entry.as_str() == Some(rendered.as_str()) => LabelChange::Unchanged,
                    Some(entry) => {
                        *entry = Value::String(rendered);
                        LabelChange::Replaced
                    }
                    None => {
                        list.push(Value::String(rendered));
                        LabelChange::Added
                    }
                }
            }
            Self::Map(map) => {
                let current = map.get(key).map(scalar_to_string);
                match current {
                    Some(ref v) if v == value => LabelChange::Unchanged,
                    Some(_) => {
                        map.insert(key.into(), value.into());
                        LabelChange::Replaced
                    }
                    None => {
                        map.insert(key.into(), value.into());
                        LabelChange::Added
                    }
                }
            }
        }
    }
}

/// Split `key=value` at the first `=`. A bare `key` has an empty value.
pub fn split_label(label: &str) -> (&str, &str) {
    label.split_once('=').unwrap_or((label, ""))
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<Value> {
        entries.iter().map(|e| Value::from(*e)).collect()
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("traefik.enable=true"), ("traefik.enable", "true"));
        assert_eq!(split_label("a=b=c"), ("a", "b=c"));
        assert_eq!(split_label("bare"), ("bare", ""));
    }

    #[test]
    fn test_list_contains_is_exact() {
        let entries = list(&["traefik.enable=true", "other=1"]);
        let labels = Labels::List(&entries);
        assert!(labels.contains("traefik.enable=true"));
        assert!(!labels.contains("traefik.enable=false"));
        assert_eq!(labels.value_of("other").as_deref(), Some("1"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_map_contains_accepts_boolean_values() {
        let map: Mapping = serde_yaml::from_str("traefik.enable: true\nport: 8080\n").unwrap();
        let labels = Labels::Map(&map);
        assert!(labels.contains("traefik.enable=true"));
        assert_eq!(labels.value_of("port").as_deref(), Some("8080"));
    }

    #[test]
    fn test_empty_contains_nothing() {
        assert!(!Labels::Empty.contains("traefik.enable=true"));
        assert!(Labels::Empty.is_empty());
    }

    #[test]
    fn test_list_upsert() {
        let mut entries = list(&["a=1", "b=2"]);
        let mut labels = LabelsMut::List(&mut entries);
        assert_eq!(labels.upsert("c", "3"), LabelChange::Added);
        assert_eq!(labels.upsert("a", "1"), LabelChange::Unchanged);
        assert_eq!(labels.upsert("b", "20"), LabelChange::Replaced);
        assert_eq!(entries, list(&["a=1", "b=20", "c=3"]));
    }

    #[test]
    fn test_map_upsert() {
        let mut map: Mapping = serde_yaml::from_str("a: '1'\n").unwrap();
        let mut labels = LabelsMut::Map(&mut map);
        assert_eq!(labels.upsert("a", "1"), LabelChange::Unchanged);
        assert_eq!(labels.upsert("a", "2"), LabelChange::Replaced);
        assert_eq!(labels.upsert("b", "x"), LabelChange::Added);
        assert_eq!(map.get("a").and_then(Value::as_str), Some("2"));
        assert_eq!(map.get("b").and_then(Value::as_str), Some("x"));
    }
}
