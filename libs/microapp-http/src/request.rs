use crate::error::HttpError;
use bytes::Bytes;
use http::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// A named file carried by a multipart upload.
#[derive(Clone)]
pub struct FilePart {
    filename: String,
    content: Bytes,
}

impl FilePart {
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Drain `reader` into memory under `filename`.
    ///
    /// # Errors
    /// Returns the reader's I/O error.
    pub fn from_reader(filename: impl Into<String>, mut reader: impl Read) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::new(filename, buf))
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("filename", &self.filename)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .finish()
    }
}

/// Text fields and files for a `multipart/form-data` body.
///
/// Both maps are ordered, so the encoded body is deterministic apart from
/// its boundary.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, FilePart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.files.insert(name.into(), part);
        self
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    #[must_use]
    pub fn files(&self) -> &BTreeMap<String, FilePart> {
        &self.files
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }
}

/// A value that knows how to present itself as a multipart upload.
pub trait FormRender {
    /// Plain text fields.
    fn params(&self) -> BTreeMap<String, String>;

    /// File fields keyed by form name.
    fn multipart_params(&self) -> BTreeMap<String, FilePart>;
}

/// Body of an [`ApiRequest`].
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Already serialized JSON
    Json(Bytes),
    Multipart(MultipartForm),
}

/// Description of one API call, relative to the client's base URL.
///
/// ```ignore
/// let request = ApiRequest::post("v1/auth/tp/token")
///     .query(&[("component_appid", app_id)])?
///     .json(&payload)?;
/// let (token, _meta) = client.send::<Token>(&ctx, request).await?;
/// ```
#[derive(Debug, Clone)]
#[must_use = "ApiRequest does nothing until passed to Client::execute"]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<String>,
    body: RequestBody,
}

impl ApiRequest {
    /// `path` is relative and must not start with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append URL-encoded query parameters.
    ///
    /// Repeated calls accumulate.
    ///
    /// # Errors
    /// Returns `HttpError::QueryEncode` if `params` cannot be encoded.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, HttpError> {
        let encoded = serde_urlencoded::to_string(params)?;
        if !encoded.is_empty() {
            self.query = Some(match self.query.take() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                _ => encoded,
            });
        }
        Ok(self)
    }

    /// Set a JSON body. HTML-sensitive characters are written as-is.
    ///
    /// # Errors
    /// Returns `HttpError::Json` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        self.body = RequestBody::Json(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Multipart body built from a [`FormRender`] value.
    pub fn form<F: FormRender + ?Sized>(self, form: &F) -> Self {
        let multipart = MultipartForm {
            fields: form.params(),
            files: form.multipart_params(),
        };
        self.multipart(multipart)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (Method, String, Option<String>, RequestBody) {
        (self.method, self.path, self.query, self.body)
    }
}
