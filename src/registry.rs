//! The interception registry.
//!
//! Maps normalized match keys to response templates. Registration is
//! last-write-wins; resolution synthesizes a fresh response on every hit and
//! treats a miss as an ordinary outcome, not an error.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, trace};

use crate::builder::StubBuilder;
use crate::bundle::StubBundle;
use crate::error::Error;
use crate::key::MatchKey;
use crate::template::{ResponseTemplate, StubResponse};

/// Thread-safe registry of stubbed responses, shared between test setup and
/// the transport shim that intercepts outgoing requests.
///
/// `register` and `try_resolve` are safe to call concurrently from
/// independent threads without external locking; a reader never observes a
/// partially inserted registration.
#[derive(Debug, Default)]
pub struct StubRegistry {
    stubs: RwLock<HashMap<MatchKey, ResponseTemplate>>,
}

impl StubRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize a builder and insert its registration, overwriting any prior
    /// registration with the same match key.
    ///
    /// Re-registering a URL across test cases is normal; the most recent
    /// registration wins, so setup order is the single source of truth.
    /// Returns `&self` so multiple rules chain.
    pub fn register(&self, builder: &StubBuilder) -> Result<&Self, Error> {
        let (key, template) = builder.build()?;
        debug!(method = %key.method(), uri = %key.uri(), "registered stub");

        let mut stubs = self.stubs.write().unwrap_or_else(PoisonError::into_inner);
        stubs.insert(key, template);
        Ok(self)
    }

    /// Load a stub bundle file and register every non-skipped item.
    pub fn register_bundle(&self, path: impl AsRef<Path>) -> Result<&Self, Error> {
        let path = path.as_ref();
        let bundle = StubBundle::from_file(path)?;
        let builders = bundle.to_builders()?;
        let count = builders.len();
        for (index, builder) in &builders {
            self.register(builder).map_err(|source| Error::BundleItem {
                index: *index,
                source: Box::new(source),
            })?;
        }
        info!(path = %path.display(), stubs = count, "registered stub bundle");
        Ok(self)
    }

    /// Look up a matching registration for `(method, uri)` and synthesize its
    /// response.
    ///
    /// The key is normalized exactly as at registration time. A miss returns
    /// `Ok(None)`. Content is evaluated fresh on every hit, never cached, and
    /// content-source failures propagate as [`Error::Content`].
    pub fn try_resolve(&self, method: &str, uri: &str) -> Result<Option<StubResponse>, Error> {
        let key = MatchKey::parse(method, uri)?;

        // Clone the template out of the lock so user content factories run
        // without holding it.
        let template = {
            let stubs = self.stubs.read().unwrap_or_else(PoisonError::into_inner);
            stubs.get(&key).cloned()
        };

        match template {
            Some(template) => {
                debug!(method = %key.method(), uri = %key.uri(), "request matched stub");
                Ok(Some(template.synthesize()?))
            }
            None => {
                trace!(method = %key.method(), uri = %key.uri(), "no matching stub");
                Ok(None)
            }
        }
    }

    /// Number of registered stubs.
    pub fn len(&self) -> usize {
        self.stubs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registration.
    pub fn clear(&self) {
        self.stubs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
