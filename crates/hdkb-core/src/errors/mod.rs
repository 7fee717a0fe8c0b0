//! Error handling for hdkb.
//! One error enum per subsystem, `thiserror` only.

pub mod article_error;
pub mod config_error;
pub mod error_code;
pub mod output_error;
pub mod pipeline_error;
pub mod reference_error;

pub use article_error::ArticleError;
pub use config_error::ConfigError;
pub use error_code::HdkbErrorCode;
pub use output_error::OutputError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use reference_error::ReferenceError;
