//! Response body sources.
//!
//! A `ContentSource` describes how to produce the body bytes of a stubbed
//! response. Evaluation happens at resolution time, fresh on every call, so a
//! lazy source backed by a shared value reflects that value's state at each
//! individual lookup rather than its state when the stub was registered.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::error::{BoxError, Error};

/// Deferred producer of response body bytes.
pub type ContentFactory = Arc<dyn Fn() -> Result<Vec<u8>, BoxError> + Send + Sync>;

/// How JSON content sources serialize the captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Compact single-line output.
    #[default]
    Compact,
    /// Pretty-printed output.
    Pretty,
}

/// The body of a stubbed response.
#[derive(Clone, Default)]
pub enum ContentSource {
    /// Zero-length body.
    #[default]
    Empty,
    /// Fixed raw bytes, copied at evaluation.
    Bytes(Vec<u8>),
    /// Fixed UTF-8 text, encoded at evaluation.
    Text(String),
    /// A factory invoked at every evaluation. Never memoized.
    Lazy {
        factory: ContentFactory,
        /// Media type implied by the factory's output, used when the
        /// template does not override it.
        media_type: Option<&'static str>,
    },
}

impl ContentSource {
    /// A lazy JSON source over a shared, caller-owned value.
    ///
    /// Serialization happens at evaluation time; mutations to the value
    /// between two resolutions are observed by the second one.
    pub fn json<T>(value: &Arc<RwLock<T>>, format: JsonFormat) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        let value = Arc::clone(value);
        ContentSource::Lazy {
            factory: Arc::new(move || {
                let guard = value
                    .read()
                    .map_err(|_| BoxError::from("json content value lock poisoned"))?;
                let bytes = match format {
                    JsonFormat::Compact => serde_json::to_vec(&*guard)?,
                    JsonFormat::Pretty => serde_json::to_vec_pretty(&*guard)?,
                };
                Ok(bytes)
            }),
            media_type: Some("application/json"),
        }
    }

    /// A lazy source over an arbitrary byte factory.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        ContentSource::Lazy {
            factory: Arc::new(factory),
            media_type: Some("application/octet-stream"),
        }
    }

    /// Produce the body bytes now.
    ///
    /// Factory failures propagate to the caller as [`Error::Content`].
    pub fn evaluate(&self) -> Result<Vec<u8>, Error> {
        match self {
            ContentSource::Empty => Ok(Vec::new()),
            ContentSource::Bytes(bytes) => Ok(bytes.clone()),
            ContentSource::Text(text) => Ok(text.clone().into_bytes()),
            ContentSource::Lazy { factory, .. } => factory().map_err(Error::Content),
        }
    }

    /// Media type implied by the content kind, when no override is set.
    pub fn default_media_type(&self) -> Option<&'static str> {
        match self {
            ContentSource::Empty => None,
            ContentSource::Bytes(_) => Some("application/octet-stream"),
            ContentSource::Text(_) => Some("text/plain"),
            ContentSource::Lazy { media_type, .. } => *media_type,
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Empty => f.write_str("Empty"),
            ContentSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            ContentSource::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ContentSource::Lazy { media_type, .. } => f
                .debug_struct("Lazy")
                .field("media_type", media_type)
                .finish_non_exhaustive(),
        }
    }
}
