//! httpstub
//!
//! In-process HTTP interception for tests: register stub responses against
//! `(method, URL)` pairs and resolve outgoing requests against them, with no
//! network and no server. Perfect for deterministic tests of HTTP client
//! code.
//!
//! # Features
//!
//! - **Exact matching**: requests match on the normalized method and URL, so
//!   equivalent URLs assembled differently collapse to the same stub
//! - **Fluent builders**: `for_*` setters describe the request, `with_*`
//!   setters the response
//! - **Deferred content**: JSON bodies capture a shared value and serialize
//!   at resolution time, reflecting mutations made after registration
//! - **Last-write-wins**: re-registering a URL replaces the earlier stub
//! - **Thread-safe**: one registry can be shared across parallel test cases
//! - **Stub bundles**: load fixture files in YAML or JSON
//!
//! # Example
//!
//! ```
//! use httpstub::{StubBuilder, StubRegistry};
//!
//! let mut stub = StubBuilder::new();
//! stub.for_get()
//!     .for_url("https://example.org/status")?
//!     .with_content(Some(r#"{"ok":true}"#));
//!
//! let registry = StubRegistry::new();
//! registry.register(&stub)?;
//!
//! // What a transport shim does for every outgoing request:
//! let response = registry.try_resolve("GET", "https://example.org/status")?;
//!
//! let response = response.expect("stub should match");
//! assert_eq!(response.status, 200);
//! assert_eq!(response.text(), r#"{"ok":true}"#);
//! # Ok::<(), httpstub::Error>(())
//! ```

pub mod builder;
pub mod bundle;
pub mod content;
pub mod error;
pub mod header;
pub mod key;
pub mod registry;
pub mod template;

pub use builder::StubBuilder;
pub use bundle::StubBundle;
pub use content::{ContentFactory, ContentSource, JsonFormat};
pub use error::{BoxError, Error};
pub use header::HeaderSet;
pub use key::MatchKey;
pub use registry::StubRegistry;
pub use template::{ResponseTemplate, StubResponse};
