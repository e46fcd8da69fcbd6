//! In-memory representation of a stack file.
//!
//! The document is otherwise schemaless, so it is kept as an
//! order-preserving `serde_yaml` tree and only the policy-relevant paths
//! get typed accessors. Everything else round-trips untouched.

use serde_yaml::{Mapping, Value};

use super::labels::{Labels, LabelsMut};
use crate::domain::errors::{DocumentError, DocumentResult};

/// Parsed stack file: a top-level mapping with `networks` and `services`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentDocument {
    root: Mapping,
}

impl DeploymentDocument {
    /// Wrap a parsed YAML value. The root must be a mapping.
    ///
    /// Scalar service names such as `123:` or `true:` are rewritten as
    /// strings, which is how compose reads them.
    pub fn from_value(value: Value) -> DocumentResult<Self> {
        let mut root = match value {
            Value::Mapping(root) => root,
            other => return Err(DocumentError::NotAMapping(kind_of(&other))),
        };
        if let Some(Value::Mapping(services)) = root.get_mut("services") {
            *services = normalize_service_names(std::mem::take(services))?;
        }
        Ok(Self { root })
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Mapping(self.root)
    }

    /// Top-level `networks` entry, if the key exists (its value may be null).
    pub fn networks(&self) -> Option<&Value> {
        self.root.get("networks")
    }

    /// Top-level `services` mapping. `None` if absent or not a mapping.
    pub fn services(&self) -> Option<&Mapping> {
        self.root.get("services").and_then(Value::as_mapping)
    }

    /// Service names in document order.
    pub fn service_names(&self) -> Vec<String> {
        self.services()
            .map(|services| {
                services
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn service(&self, name: &str) -> Option<&Value> {
        self.services().and_then(|services| services.get(name))
    }

    /// Mutable access to a service body, turning an empty (`null`) service
    /// into a mapping so fields can be set on it.
    pub fn service_mut(&mut self, name: &str) -> DocumentResult<Option<&mut Mapping>> {
        let Some(service) = self
            .root
            .get_mut("services")
            .and_then(Value::as_mapping_mut)
            .and_then(|services| services.get_mut(name))
        else {
            return Ok(None);
        };

        if service.is_null() {
            *service = Value::Mapping(Mapping::new());
        }
        match service {
            Value::Mapping(body) => Ok(Some(body)),
            other => Err(DocumentError::MalformedService {
                service: name.to_string(),
                found: kind_of(other),
            }),
        }
    }

    /// Mutable label view for a service that declares `deploy.labels`.
    pub fn labels_mut(&mut self, name: &str) -> DocumentResult<LabelsMut<'_>> {
        let labels = self
            .service_mut(name)?
            .and_then(|body| body.get_mut("deploy"))
            .and_then(|deploy| deploy.get_mut("labels"));

        match labels {
            Some(Value::Sequence(list)) => Ok(LabelsMut::List(list)),
            Some(Value::Mapping(map)) => Ok(LabelsMut::Map(map)),
            _ => Err(DocumentError::MalformedLabels(name.to_string())),
        }
    }
}

fn normalize_service_names(services: Mapping) -> DocumentResult<Mapping> {
    let mut normalized = Mapping::with_capacity(services.len());
    for (key, body) in services {
        let name = match key {
            Value::String(name) => name,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => return Err(DocumentError::InvalidServiceName(kind_of(&other))),
        };
        if normalized.contains_key(name.as_str()) {
            return Err(DocumentError::DuplicateService(name));
        }
        normalized.insert(Value::String(name), body);
    }
    Ok(normalized)
}

/// `deploy.labels` of a service, if the service declares one.
///
/// A declared but empty or scalar `labels` is returned as an empty view so
/// that callers still treat the service as a main service.
pub fn deploy_labels(service: &Value) -> Option<Labels<'_>> {
    let labels = service.get("deploy")?.get("labels")?;
    Some(match labels {
        Value::Sequence(list) => Labels::List(list),
        Value::Mapping(map) => Labels::Map(map),
        _ => Labels::Empty,
    })
}

/// Whether a service lists `network` under its own `networks` key, in
/// either the short (sequence) or long (mapping) compose syntax.
pub fn joins_network(service: &Value, network: &str) -> bool {
    match service.get("networks") {
        Some(Value::Sequence(list)) => list.iter().any(|n| n.as_str() == Some(network)),
        Some(Value::Mapping(map)) => map.contains_key(network),
        _ => false,
    }
}

/// Human-readable YAML type name, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
