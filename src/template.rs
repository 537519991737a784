//! Response templates and synthesized responses.

use std::borrow::Cow;

use crate::content::ContentSource;
use crate::error::Error;
use crate::header::HeaderSet;

/// Immutable description of the response a registered stub produces.
///
/// Built by finalizing a [`StubBuilder`](crate::StubBuilder); the content
/// source stays deferred until the template is synthesized at resolution
/// time.
#[derive(Debug, Clone)]
pub struct ResponseTemplate {
    pub(crate) status: u16,
    pub(crate) media_type: Option<String>,
    pub(crate) headers: HeaderSet,
    pub(crate) content: ContentSource,
}

impl Default for ResponseTemplate {
    fn default() -> Self {
        Self {
            status: 200,
            media_type: None,
            headers: HeaderSet::new(),
            content: ContentSource::Empty,
        }
    }
}

impl ResponseTemplate {
    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Explicit media type override, if any.
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Body content source.
    pub fn content(&self) -> &ContentSource {
        &self.content
    }

    /// Build a concrete response from this template, evaluating the content
    /// source now.
    ///
    /// When no media type was set explicitly, the content kind's default is
    /// used (text bodies report `text/plain`, JSON bodies `application/json`,
    /// raw bytes `application/octet-stream`, empty bodies none).
    pub fn synthesize(&self) -> Result<StubResponse, Error> {
        let body = self.content.evaluate()?;
        let media_type = self
            .media_type
            .clone()
            .or_else(|| self.content.default_media_type().map(String::from));

        Ok(StubResponse {
            status: self.status,
            media_type,
            headers: self.headers.clone(),
            body,
        })
    }
}

/// A concrete synthesized response, ready for a transport shim to hand back
/// to the HTTP client instead of performing a network call.
#[derive(Debug, Clone)]
pub struct StubResponse {
    /// HTTP status code.
    pub status: u16,
    /// Media type, if any.
    pub media_type: Option<String>,
    /// Ordered response headers.
    pub headers: HeaderSet,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl StubResponse {
    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_empty_200() {
        let template = ResponseTemplate::default();
        assert_eq!(template.status(), 200);
        assert_eq!(template.media_type(), None);
        assert!(template.headers().is_empty());

        let response = template.synthesize().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.media_type, None);
        assert!(response.body.is_empty());
        assert_eq!(response.text(), "");
    }

    #[test]
    fn media_type_falls_back_to_content_kind() {
        let template = ResponseTemplate {
            content: ContentSource::Text("hello".to_string()),
            ..ResponseTemplate::default()
        };
        let response = template.synthesize().unwrap();
        assert_eq!(response.media_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn explicit_media_type_wins_over_content_kind() {
        let template = ResponseTemplate {
            media_type: Some("text/html".to_string()),
            content: ContentSource::Text("<html></html>".to_string()),
            ..ResponseTemplate::default()
        };
        let response = template.synthesize().unwrap();
        assert_eq!(response.media_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn synthesize_carries_status_and_headers() {
        let mut headers = HeaderSet::new();
        headers.set("x-request-id", vec!["abc".to_string()]);

        let template = ResponseTemplate {
            status: 404,
            headers,
            content: ContentSource::Text("Not found".to_string()),
            ..ResponseTemplate::default()
        };

        let response = template.synthesize().unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.headers.get("X-Request-Id").unwrap(), &["abc"]);
        assert_eq!(response.text(), "Not found");
    }
}
