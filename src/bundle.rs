//! Stub bundle files.
//!
//! A bundle is a YAML or JSON file describing a set of stubs to register in
//! one call, so shared fixtures can live next to the tests that use them.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::builder::StubBuilder;
use crate::error::Error;
use crate::header::HeaderSet;

/// A file-loadable set of stub definitions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StubBundle {
    /// Optional identifier for the bundle
    #[serde(default)]
    pub id: Option<String>,

    /// Optional free-form description
    #[serde(default)]
    pub comment: Option<String>,

    /// Stub definitions
    #[serde(default)]
    pub items: Vec<BundleItem>,
}

/// One stub definition within a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleItem {
    /// HTTP method to match (GET when omitted)
    #[serde(default)]
    pub method: Option<String>,

    /// Absolute request URI to match
    pub uri: String,

    /// Response status code
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response media type
    #[serde(default)]
    pub media_type: Option<String>,

    /// Response headers, each a single value or a value list
    #[serde(default)]
    pub headers: HashMap<String, HeaderValues>,

    /// Response body
    #[serde(default)]
    pub body: Option<BundleBody>,

    /// Skip this item when registering the bundle
    #[serde(default)]
    pub skip: bool,
}

fn default_status() -> u16 {
    200
}

/// Header values: a bare string or a list of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValues {
    Single(String),
    Many(Vec<String>),
}

impl HeaderValues {
    fn to_vec(&self) -> Vec<String> {
        match self {
            HeaderValues::Single(value) => vec![value.clone()],
            HeaderValues::Many(values) => values.clone(),
        }
    }
}

/// Response body of a bundle item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BundleBody {
    /// Plain text body
    Text { content: String },
    /// JSON body, serialized once at registration (bundle content is static)
    Json { content: serde_json::Value },
    /// Base64 encoded binary body
    Base64 { content: String },
}

impl StubBundle {
    /// Load a bundle from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|source| Error::BundleIo {
            path: path.to_owned(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parse = |message: String| Error::BundleParse {
            path: path.to_owned(),
            message,
        };

        if is_json {
            serde_json::from_str(&raw).map_err(|e| parse(e.to_string()))
        } else {
            serde_yaml::from_str(&raw).map_err(|e| parse(e.to_string()))
        }
    }

    /// Convert every non-skipped item into a validated builder.
    ///
    /// A single bad item fails the whole bundle, with the error naming its
    /// index.
    pub(crate) fn to_builders(&self) -> Result<Vec<(usize, StubBuilder)>, Error> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.skip)
            .map(|(index, item)| {
                item.to_builder()
                    .map(|builder| (index, builder))
                    .map_err(|source| Error::BundleItem {
                        index,
                        source: Box::new(source),
                    })
            })
            .collect()
    }
}

impl BundleItem {
    fn to_builder(&self) -> Result<StubBuilder, Error> {
        let mut builder = StubBuilder::new();

        if let Some(method) = &self.method {
            builder.for_method(method)?;
        }
        builder.for_url(&self.uri)?;
        builder.with_status(self.status)?;
        if let Some(media_type) = &self.media_type {
            builder.with_media_type(media_type.as_str());
        }

        if !self.headers.is_empty() {
            let mut headers = HeaderSet::new();
            for (name, values) in &self.headers {
                headers.set(name.clone(), values.to_vec());
            }
            builder.with_headers(headers);
        }

        match &self.body {
            None => {}
            Some(BundleBody::Text { content }) => {
                builder.with_content(Some(content.as_str()));
            }
            Some(BundleBody::Json { content }) => {
                let bytes =
                    serde_json::to_vec(content).map_err(|e| Error::Content(Box::new(e)))?;
                builder.with_body(bytes);
                if self.media_type.is_none() {
                    builder.with_media_type("application/json");
                }
            }
            Some(BundleBody::Base64 { content }) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(content)
                    .map_err(|e| {
                        Error::invalid_argument("content", format!("invalid base64: {e}"))
                    })?;
                builder.with_body(bytes);
            }
        }

        Ok(builder)
    }
}
