//! Errors raised at the process boundary.

use thiserror::Error;

use crate::application::ApplicationError;

/// Application errors plus I/O failures outside any service, such as
/// writing a rendered report to stdout.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
