//! Error types for stub registration and resolution.

use std::path::PathBuf;

/// Boxed error type produced by user-supplied content factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by builders, the registry, and bundle loading.
///
/// A resolution miss is not an error; `try_resolve` reports it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setter or operation was given an unusable value.
    #[error("invalid value for `{parameter}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A URI or URI component could not be parsed.
    #[error("malformed URI in `{parameter}`")]
    InvalidUri {
        /// Name of the offending parameter.
        parameter: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// A content factory or serializer failed while building a response body.
    ///
    /// Raised out of `try_resolve`, never swallowed: a broken content source
    /// is a caller-visible defect in the registration.
    #[error("failed to produce response content: {0}")]
    Content(#[source] BoxError),

    /// A stub bundle file could not be read.
    #[error("failed to read stub bundle {path}")]
    BundleIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stub bundle file could not be parsed.
    #[error("failed to parse stub bundle {path}: {message}")]
    BundleParse { path: PathBuf, message: String },

    /// A single bundle item failed validation or registration.
    #[error("stub bundle item {index}: {source}")]
    BundleItem {
        /// Zero-based index of the item within the bundle.
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(parameter: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            parameter,
            message: message.into(),
        }
    }
}
