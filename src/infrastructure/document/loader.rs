use std::io::Read;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::domain::models::DeploymentDocument;
use crate::domain::{DocumentError, DocumentResult};

/// Where the stack file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` selects standard input, anything else is a path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    fn display_path(&self) -> PathBuf {
        match self {
            Self::Stdin => PathBuf::from("<stdin>"),
            Self::File(path) => path.clone(),
        }
    }
}

/// Read and parse a stack file.
pub fn load_document(source: &InputSource) -> DocumentResult<DeploymentDocument> {
    let path = source.display_path();
    let contents = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| DocumentError::Read {
                    path: path.clone(),
                    source,
                })?;
            buf
        }
        InputSource::File(file) => {
            std::fs::read_to_string(file).map_err(|source| DocumentError::Read {
                path: path.clone(),
                source,
            })?
        }
    };

    let doc = parse_document(&contents).map_err(|err| match err {
        DocumentError::Serialize(source) => DocumentError::Parse { path: path.clone(), source },
        other => other,
    })?;
    debug!(path = %path.display(), services = doc.service_names().len(), "stack file loaded");
    Ok(doc)
}

/// Parse stack file contents already in memory.
///
/// `<<` merge keys are resolved here, so services that pull their
/// `deploy` or `networks` in from an anchor are seen with those fields.
pub fn parse_document(contents: &str) -> DocumentResult<DeploymentDocument> {
    let mut value: Value = serde_yaml::from_str(contents)?;
    value.apply_merge()?;
    DeploymentDocument::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Path::new("stack.yml")),
            InputSource::File(PathBuf::from("stack.yml"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "services:\n  web:\n    image: nginx").unwrap();
        let doc = load_document(&InputSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(doc.service_names(), vec!["web"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(&InputSource::File("/nonexistent/stack.yml".into())).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/stack.yml"));
    }

    #[test]
    fn test_malformed_yaml_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "services: [unclosed").unwrap();
        let err = load_document(&InputSource::File(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_merge_keys_are_resolved() {
        let doc = parse_document(
            r"
x-routed: &routed
  networks: [proxy]
  deploy:
    labels: [traefik.enable=true]
services:
  web:
    <<: *routed
    image: nginx
",
        )
        .unwrap();

        let web = doc.service("web").unwrap();
        assert!(web.get("<<").is_none());
        assert_eq!(web["image"], "nginx");
        assert_eq!(web["networks"][0], "proxy");
        assert_eq!(web["deploy"]["labels"][0], "traefik.enable=true");
    }

    #[test]
    fn test_local_keys_win_over_merged_keys() {
        let doc = parse_document(
            r"
x-base: &base
  image: busybox
  restart: always
services:
  worker:
    <<: *base
    image: alpine
",
        )
        .unwrap();

        let worker = doc.service("worker").unwrap();
        assert_eq!(worker["image"], "alpine");
        assert_eq!(worker["restart"], "always");
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = parse_document("just a string").unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping("a string")));
    }
}
