use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::models::DeploymentDocument;
use crate::domain::{DocumentError, DocumentResult};

/// Where the transformed stack file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Serialize the document to YAML.
pub fn render(doc: &DeploymentDocument) -> DocumentResult<String> {
    Ok(serde_yaml::to_string(doc.as_mapping())?)
}

/// Render first, then write in one go, so a serialization failure never
/// leaves partial output behind.
pub fn emit(doc: &DeploymentDocument, target: &OutputTarget) -> DocumentResult<()> {
    let rendered = render(doc)?;
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| DocumentError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
        OutputTarget::File(path) => {
            std::fs::write(path, rendered.as_bytes()).map_err(|source| DocumentError::Write {
                path: path.clone(),
                source,
            })?;
        }
    }
    debug!(bytes = rendered.len(), ?target, "stack file written");
    Ok(())
}
