pub mod injector;
pub mod pipeline;
pub mod validator;

pub use injector::{Injector, LabelInjector, LoggingInjector};
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, PipelineOutcome};
pub use validator::{PolicyValidator, ValidateOptions};
