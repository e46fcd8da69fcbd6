pub mod config;
pub mod document;
pub mod environment;
pub mod labels;
pub mod violation;

pub use config::{
    LabelConfig, LogShippingConfig, MainServiceMode, NetworkShape, PolicyConfig,
    SharedNetworkConfig,
};
pub use document::DeploymentDocument;
pub use environment::{CiEnvironment, InjectionContext, LogShipping, LoggingBackend};
pub use labels::{LabelChange, Labels, LabelsMut};
pub use violation::{ValidationReport, Violation, ViolationKind};
