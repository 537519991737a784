//! Fluent builder for stub registrations.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use url::Url;

use crate::content::{ContentSource, JsonFormat};
use crate::error::{BoxError, Error};
use crate::header::HeaderSet;
use crate::key::{normalize_method, MatchKey};
use crate::template::ResponseTemplate;

/// Mutable accumulator for one stub: the request signature to match and the
/// response to synthesize.
///
/// Setters chain; `for_*` methods describe the request side, `with_*` methods
/// the response side. Registering the builder snapshots its current state, so
/// it can be reconfigured and registered again afterwards without affecting
/// earlier registrations.
///
/// ```
/// use httpstub::StubBuilder;
///
/// let mut stub = StubBuilder::new();
/// stub.for_get()
///     .for_https()
///     .for_host("api.example.org")
///     .for_path("v1/orders")
///     .with_status(201)?
///     .with_content(Some(r#"{"id":1}"#));
/// # Ok::<(), httpstub::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct StubBuilder {
    method: String,
    scheme: String,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    status: u16,
    media_type: Option<String>,
    headers: HeaderSet,
    content: ContentSource,
}

impl Default for StubBuilder {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            scheme: "http".to_string(),
            host: None,
            port: None,
            path: None,
            query: None,
            status: 200,
            media_type: None,
            headers: HeaderSet::new(),
            content: ContentSource::Empty,
        }
    }
}

impl StubBuilder {
    /// A builder with defaults: `GET http://localhost/`, status 200, empty
    /// body, no headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `GET` requests.
    pub fn for_get(&mut self) -> &mut Self {
        self.method = "GET".to_string();
        self
    }

    /// Match `POST` requests.
    pub fn for_post(&mut self) -> &mut Self {
        self.method = "POST".to_string();
        self
    }

    /// Match requests with the given method token. Last call wins.
    ///
    /// Fails if the token is empty.
    pub fn for_method(&mut self, method: &str) -> Result<&mut Self, Error> {
        self.method = normalize_method(method)?;
        Ok(self)
    }

    /// Match the `http` scheme. Last scheme set wins.
    pub fn for_http(&mut self) -> &mut Self {
        self.scheme = "http".to_string();
        self
    }

    /// Match the `https` scheme. Last scheme set wins.
    pub fn for_https(&mut self) -> &mut Self {
        self.scheme = "https".to_string();
        self
    }

    /// Match the given host.
    pub fn for_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = Some(host.into());
        self
    }

    /// Match the given port. An explicit default port for the scheme is the
    /// same as no port at all.
    pub fn for_port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    /// Match the given path. A missing leading `/` is added.
    pub fn for_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Match the given query string, without the leading `?`.
    pub fn for_query(&mut self, query: impl Into<String>) -> &mut Self {
        let query = query.into();
        self.query = Some(match query.strip_prefix('?') {
            Some(stripped) => stripped.to_string(),
            None => query,
        });
        self
    }

    /// Match an absolute URL, overwriting every previously set URI component.
    ///
    /// Fails if the URL does not parse.
    pub fn for_url(&mut self, url: &str) -> Result<&mut Self, Error> {
        let parsed = Url::parse(url).map_err(|source| Error::InvalidUri {
            parameter: "url",
            source,
        })?;
        Ok(self.for_uri(&parsed))
    }

    /// Match an already-parsed URL, overwriting every previously set URI
    /// component.
    pub fn for_uri(&mut self, url: &Url) -> &mut Self {
        self.scheme = url.scheme().to_string();
        self.host = url.host_str().map(String::from);
        self.port = url.port();
        self.path = Some(url.path().to_string());
        self.query = url.query().map(String::from);
        self
    }

    /// Respond with the given status code. Last call wins.
    ///
    /// Fails outside the 100..=599 range.
    pub fn with_status(&mut self, status: u16) -> Result<&mut Self, Error> {
        if !(100..=599).contains(&status) {
            return Err(Error::invalid_argument(
                "status",
                format!("invalid status code: {status}"),
            ));
        }
        self.status = status;
        Ok(self)
    }

    /// Respond with the given media type. Last call wins.
    pub fn with_media_type(&mut self, media_type: impl Into<String>) -> &mut Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Respond with a fixed text body. `None` means an empty body, not an
    /// error.
    pub fn with_content(&mut self, text: Option<&str>) -> &mut Self {
        self.content = match text {
            Some(text) => ContentSource::Text(text.to_string()),
            None => ContentSource::Empty,
        };
        self
    }

    /// Respond with a fixed byte body.
    pub fn with_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.content = ContentSource::Bytes(body.into());
        self
    }

    /// Respond with bytes produced by a factory invoked at every resolution.
    pub fn with_content_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        self.content = ContentSource::factory(factory);
        self
    }

    /// Respond with the JSON serialization of a shared value, in compact
    /// format.
    ///
    /// Only the reference is captured here; serialization runs at each
    /// resolution, so mutations to the value made after registration show up
    /// in later responses.
    pub fn with_json_content<T>(&mut self, value: &Arc<RwLock<T>>) -> &mut Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.with_json_content_using(value, JsonFormat::default())
    }

    /// Respond with the JSON serialization of a shared value, using the given
    /// serializer format.
    pub fn with_json_content_using<T>(
        &mut self,
        value: &Arc<RwLock<T>>,
        format: JsonFormat,
    ) -> &mut Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.content = ContentSource::json(value, format);
        self
    }

    /// Respond with a prebuilt content source.
    pub fn with_content_source(&mut self, content: ContentSource) -> &mut Self {
        self.content = content;
        self
    }

    /// Set all values for one response header, replacing any previously set
    /// values for that name.
    pub fn with_header(&mut self, name: impl Into<String>, values: &[&str]) -> &mut Self {
        self.headers
            .set(name, values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Replace the whole response header set.
    pub fn with_headers(&mut self, headers: HeaderSet) -> &mut Self {
        self.headers = headers;
        self
    }

    /// Finalize the current state into a `(MatchKey, ResponseTemplate)` pair.
    ///
    /// Invoked by [`StubRegistry::register`](crate::StubRegistry::register).
    /// The builder stays usable; later mutation does not affect the returned
    /// pair. Fails if the accumulated URI components do not form a valid URL.
    pub fn build(&self) -> Result<(MatchKey, ResponseTemplate), Error> {
        let url = self.assemble_uri()?;
        let key = MatchKey::new(self.method.clone(), &url);
        let template = ResponseTemplate {
            status: self.status,
            media_type: self.media_type.clone(),
            headers: self.headers.clone(),
            content: self.content.clone(),
        };
        Ok((key, template))
    }

    fn assemble_uri(&self) -> Result<Url, Error> {
        let host = self.host.as_deref().unwrap_or("localhost");
        let mut uri = format!("{}://{}", self.scheme, host);
        if let Some(port) = self.port {
            uri.push_str(&format!(":{port}"));
        }
        if let Some(path) = self.path.as_deref() {
            if !path.is_empty() && !path.starts_with('/') {
                uri.push('/');
            }
            uri.push_str(path);
        }
        if let Some(query) = self.query.as_deref() {
            uri.push('?');
            uri.push_str(query);
        }
        // Url::parse performs the canonicalization: default-port elision,
        // lowercasing, and `/` for the empty path.
        Url::parse(&uri).map_err(|source| Error::InvalidUri {
            parameter: "uri",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_get_localhost() {
        let (key, template) = StubBuilder::new().build().unwrap();
        assert_eq!(key.method(), "GET");
        assert_eq!(key.uri(), "http://localhost/");
        assert_eq!(template.status(), 200);
        assert!(template.headers().is_empty());
    }

    #[test]
    fn uri_is_assembled_from_components() {
        let mut builder = StubBuilder::new();
        builder
            .for_https()
            .for_host("something.com")
            .for_port(444)
            .for_path("my-path")
            .for_query("q=1");

        let (key, _) = builder.build().unwrap();
        assert_eq!(key.uri(), "https://something.com:444/my-path?q=1");
    }

    #[test]
    fn last_scheme_wins_and_default_port_is_elided() {
        let mut builder = StubBuilder::new();
        builder
            .for_https()
            .for_http()
            .for_host("x.com")
            .for_port(80);

        let (key, _) = builder.build().unwrap();
        assert_eq!(key.uri(), "http://x.com/");
        assert_eq!(key, MatchKey::parse("GET", "http://x.com").unwrap());
    }

    #[test]
    fn for_url_overwrites_previous_components() {
        let mut builder = StubBuilder::new();
        builder
            .for_https()
            .for_host("old.example.org")
            .for_port(8080)
            .for_path("old")
            .for_query("stale=1");
        builder.for_url("http://github.com/octocat").unwrap();

        let (key, _) = builder.build().unwrap();
        assert_eq!(key.uri(), "http://github.com/octocat");
    }

    #[test]
    fn for_uri_uses_parsed_url() {
        let url = Url::parse("https://github.com/octocat").unwrap();
        let mut builder = StubBuilder::new();
        builder.for_uri(&url);

        let (key, _) = builder.build().unwrap();
        assert_eq!(key, MatchKey::parse("GET", "https://github.com/octocat").unwrap());
    }

    #[test]
    fn for_method_normalizes_and_validates() {
        let mut builder = StubBuilder::new();
        builder.for_method("delete").unwrap();
        let (key, _) = builder.build().unwrap();
        assert_eq!(key.method(), "DELETE");

        let err = builder.for_method("").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument { parameter: "method", .. }
        ));
    }

    #[test]
    fn last_method_wins() {
        let mut builder = StubBuilder::new();
        builder.for_post().for_get();
        let (key, _) = builder.build().unwrap();
        assert_eq!(key.method(), "GET");
    }

    #[test]
    fn malformed_url_is_rejected_eagerly() {
        let err = StubBuilder::new().for_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUri { parameter: "url", .. }));
    }

    #[test]
    fn empty_host_fails_at_build() {
        let mut builder = StubBuilder::new();
        builder.for_host("");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::InvalidUri { parameter: "uri", .. }));
    }

    #[test]
    fn status_outside_http_range_is_rejected() {
        let mut builder = StubBuilder::new();
        let err = builder.with_status(999).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument { parameter: "status", .. }
        ));
    }

    #[test]
    fn absent_content_means_empty_body() {
        let mut builder = StubBuilder::new();
        builder.for_url("https://google.com/").unwrap();
        builder.with_content(None);

        let (_, template) = builder.build().unwrap();
        let response = template.synthesize().unwrap();
        assert_eq!(response.text(), "");
        assert_eq!(response.media_type, None);
    }

    #[test]
    fn query_setter_strips_leading_question_mark() {
        let mut builder = StubBuilder::new();
        builder.for_host("example.org").for_query("?q=1");
        let (key, _) = builder.build().unwrap();
        assert_eq!(key.uri(), "http://example.org/?q=1");
    }

    #[test]
    fn build_snapshots_state() {
        let mut builder = StubBuilder::new();
        builder.for_host("example.org");
        let (_, first) = builder.build().unwrap();

        builder.with_status(503).unwrap();
        builder.with_content(Some("later"));

        assert_eq!(first.status(), 200);
        assert_eq!(first.synthesize().unwrap().text(), "");

        let (_, second) = builder.build().unwrap();
        assert_eq!(second.status(), 503);
    }
}
