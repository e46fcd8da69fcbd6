use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Organisational policy applied to every stack file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PolicyConfig {
    /// Shared (edge router) network requirements
    #[serde(default)]
    pub network: SharedNetworkConfig,

    /// Label that marks a main service as routable
    #[serde(default = "default_routing_label")]
    pub routing_label: String,

    /// Whether every labelled service is a main service, or only the first
    #[serde(default)]
    pub main_services: MainServiceMode,

    /// Main services must list the shared network under their own `networks`
    #[serde(default = "default_true")]
    pub require_service_network: bool,

    /// Injected metadata labels
    #[serde(default)]
    pub labels: LabelConfig,

    /// Log shipping tag templates
    #[serde(default)]
    pub logging: LogShippingConfig,
}

fn default_routing_label() -> String {
    "traefik.enable=true".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            network: SharedNetworkConfig::default(),
            routing_label: default_routing_label(),
            main_services: MainServiceMode::default(),
            require_service_network: default_true(),
            labels: LabelConfig::default(),
            logging: LogShippingConfig::default(),
        }
    }
}

/// Shared network declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SharedNetworkConfig {
    /// Name of the network under top-level `networks`
    #[serde(default = "default_network_name")]
    pub name: String,

    /// Required declaration shape
    #[serde(default)]
    pub shape: NetworkShape,
}

fn default_network_name() -> String {
    "proxy".to_string()
}

impl Default for SharedNetworkConfig {
    fn default() -> Self {
        Self {
            name: default_network_name(),
            shape: NetworkShape::default(),
        }
    }
}

/// How the shared network has to be declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkShape {
    /// Exactly `{external: true}`
    #[default]
    External,
    /// `null` or an empty mapping
    Bare,
}

impl NetworkShape {
    pub fn matches(self, declaration: &Value) -> bool {
        match self {
            Self::External => declaration.as_mapping().is_some_and(|m| {
                m.len() == 1 && m.get("external").and_then(Value::as_bool) == Some(true)
            }),
            Self::Bare => match declaration {
                Value::Null => true,
                Value::Mapping(m) => m.is_empty(),
                _ => false,
            },
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::External => "external: true",
            Self::Bare => "an empty declaration",
        }
    }
}

/// Which labelled services count as main services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainServiceMode {
    /// Every service with `deploy.labels`
    #[default]
    All,
    /// Only the first one in document order
    First,
}

/// Injected metadata labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LabelConfig {
    /// Prefix for `<prefix>.github_url`, `<prefix>.owner`, `<prefix>.name`
    #[serde(default = "default_label_prefix")]
    pub prefix: String,

    /// Hostname in the CI project URL to rewrite
    #[serde(default = "default_source_host")]
    pub source_host: String,

    /// Public hostname it is rewritten to
    #[serde(default = "default_public_host")]
    pub public_host: String,
}

fn default_label_prefix() -> String {
    "org.fredhutch.app".to_string()
}

fn default_source_host() -> String {
    "ci.fredhutch.org".to_string()
}

fn default_public_host() -> String {
    "github.com".to_string()
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            prefix: default_label_prefix(),
            source_host: default_source_host(),
            public_host: default_public_host(),
        }
    }
}

impl LabelConfig {
    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.prefix, suffix)
    }

    pub fn name_key(&self) -> String {
        self.key("name")
    }

    pub fn public_url(&self, project_url: &str) -> String {
        if self.source_host.is_empty() {
            return project_url.to_string();
        }
        project_url.replace(&self.source_host, &self.public_host)
    }
}

/// Log shipping tag templates. `{project}` and `{service}` are substituted;
/// anything else (such as Docker's `{{.Name}}`) is passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogShippingConfig {
    #[serde(default = "default_splunk_tag")]
    pub splunk_tag: String,

    #[serde(default = "default_fluentd_tag")]
    pub fluentd_tag: String,
}

fn default_splunk_tag() -> String {
    "{project}/{service}/{{.Name}}".to_string()
}

fn default_fluentd_tag() -> String {
    "docker.{project}".to_string()
}

impl Default for LogShippingConfig {
    fn default() -> Self {
        Self {
            splunk_tag: default_splunk_tag(),
            fluentd_tag: default_fluentd_tag(),
        }
    }
}

/// Expand a tag template for one service.
pub fn render_tag(template: &str, project: &str, service: &str) -> String {
    template
        .replace("{project}", project)
        .replace("{service}", service)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.network.name, "proxy");
        assert_eq!(policy.network.shape, NetworkShape::External);
        assert_eq!(policy.routing_label, "traefik.enable=true");
        assert_eq!(policy.main_services, MainServiceMode::All);
        assert!(policy.require_service_network);
        assert_eq!(policy.labels.name_key(), "org.fredhutch.app.name");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let policy: PolicyConfig =
            serde_yaml::from_str("network:\n  shape: bare\nmain_services: first\n").unwrap();
        assert_eq!(policy.network.name, "proxy");
        assert_eq!(policy.network.shape, NetworkShape::Bare);
        assert_eq!(policy.main_services, MainServiceMode::First);
        assert_eq!(policy.logging, LogShippingConfig::default());
    }

    #[test]
    fn test_external_shape_is_exact() {
        let shape = NetworkShape::External;
        assert!(shape.matches(&yaml("external: true")));
        assert!(!shape.matches(&yaml("external: false")));
        assert!(!shape.matches(&yaml("external: true\ndriver: overlay")));
        assert!(!shape.matches(&Value::Null));
    }

    #[test]
    fn test_bare_shape() {
        let shape = NetworkShape::Bare;
        assert!(shape.matches(&Value::Null));
        assert!(shape.matches(&yaml("{}")));
        assert!(!shape.matches(&yaml("external: true")));
    }

    #[test]
    fn test_public_url_rewrites_host() {
        let labels = LabelConfig::default();
        assert_eq!(
            labels.public_url("https://ci.fredhutch.org/FredHutch/app"),
            "https://github.com/FredHutch/app"
        );
        assert_eq!(labels.public_url("https://gitlab.com/a/b"), "https://gitlab.com/a/b");
    }

    #[test]
    fn test_render_tag_keeps_docker_template() {
        assert_eq!(
            render_tag(&default_splunk_tag(), "shiny", "web"),
            "shiny/web/{{.Name}}"
        );
        assert_eq!(render_tag(&default_fluentd_tag(), "shiny", "web"), "docker.shiny");
    }
}
