//! Document transformations applied after a clean validation pass.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::domain::models::config::render_tag;
use crate::domain::models::{
    DeploymentDocument, InjectionContext, LabelChange, LogShipping, PolicyConfig,
};
use crate::domain::DocumentResult;

/// A single in-place rewrite of the stack file.
pub trait Injector {
    /// Apply the rewrite, returning how many services were touched.
    fn inject(&self, doc: &mut DeploymentDocument) -> DocumentResult<usize>;
}

/// Appends the repository, owner and project labels to main services.
#[derive(Debug, Clone)]
pub struct LabelInjector {
    services: Vec<String>,
    labels: Vec<(String, String)>,
}

impl LabelInjector {
    pub fn new(policy: &PolicyConfig, ctx: &InjectionContext, services: Vec<String>) -> Self {
        let prefix = &policy.labels;
        let labels = vec![
            (prefix.key("github_url"), prefix.public_url(&ctx.project_url)),
            (prefix.key("owner"), ctx.owner.clone()),
            (prefix.name_key(), ctx.project_name.clone()),
        ];
        Self { services, labels }
    }
}

impl Injector for LabelInjector {
    fn inject(&self, doc: &mut DeploymentDocument) -> DocumentResult<usize> {
        for service in &self.services {
            let mut labels = doc.labels_mut(service)?;
            for (key, value) in &self.labels {
                let change = labels.upsert(key, value);
                if change != LabelChange::Added {
                    debug!(service = %service, label = %key, ?change, "label already present");
                }
            }
        }
        info!(services = self.services.len(), "metadata labels injected");
        Ok(self.services.len())
    }
}

/// Sets the `logging` block of every service for the selected backend.
#[derive(Debug, Clone)]
pub struct LoggingInjector {
    shipping: LogShipping,
    project_name: String,
    tag_template: String,
}

impl LoggingInjector {
    pub fn new(policy: &PolicyConfig, ctx: &InjectionContext) -> Self {
        let tag_template = match ctx.shipping {
            LogShipping::Splunk { .. } => policy.logging.splunk_tag.clone(),
            LogShipping::Fluentd { .. } => policy.logging.fluentd_tag.clone(),
        };
        Self {
            shipping: ctx.shipping.clone(),
            project_name: ctx.project_name.clone(),
            tag_template,
        }
    }

    fn logging_block(&self, service: &str) -> Value {
        let mut options = Mapping::new();
        match &self.shipping {
            LogShipping::Splunk { token, url } => {
                options.insert("splunk-token".into(), token.as_str().into());
                options.insert("splunk-url".into(), url.as_str().into());
                options.insert("splunk-insecureskipverify".into(), "true".into());
            }
            LogShipping::Fluentd { host, port } => {
                options.insert("fluentd-address".into(), format!("{host}:{port}").into());
            }
        }
        options.insert(
            "tag".into(),
            render_tag(&self.tag_template, &self.project_name, service).into(),
        );

        let mut block = Mapping::new();
        block.insert("driver".into(), self.shipping.backend().driver().into());
        block.insert("options".into(), Value::Mapping(options));
        Value::Mapping(block)
    }
}

impl Injector for LoggingInjector {
    fn inject(&self, doc: &mut DeploymentDocument) -> DocumentResult<usize> {
        let names = doc.service_names();
        for name in &names {
            let block = self.logging_block(name);
            if let Some(body) = doc.service_mut(name)? {
                body.insert("logging".into(), block);
            }
        }
        info!(
            services = names.len(),
            driver = self.shipping.backend().driver(),
            "logging configuration injected"
        );
        Ok(names.len())
    }
}
