//! Per-request context handed to bound handler methods.
//!
//! A [`RequestContext`] is a read-only view of the incoming request (method,
//! URI, headers, path and query parameters, buffered body) together with the
//! response under construction. Handlers of the `unit` shape write their own
//! response through it; the other shapes leave the writing to the responder.

use crate::ids::{RequestId, REQUEST_ID_HEADER};
use axum::body::{Body, Bytes};
use axum::response::Response;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smallvec::SmallVec;

/// Number of path/query parameters kept inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the dispatch path.
pub type ParamVec = SmallVec<[(String, String); MAX_INLINE_PARAMS]>;

#[derive(Debug)]
struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    written: bool,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            written: false,
        }
    }
}

#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    path_params: ParamVec,
    query_params: ParamVec,
    body: Bytes,
    response: ResponseState,
}

impl RequestContext {
    /// Build a context from already split request parts.
    #[must_use]
    pub fn new(parts: http::request::Parts, path_params: ParamVec, body: Bytes) -> Self {
        let request_id = RequestId::from_header_or_new(
            parts
                .headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );
        let query_params = parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            request_id,
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            path_params,
            query_params,
            body,
            response: ResponseState::default(),
        }
    }

    /// Build a context from a fully buffered request with no path parameters.
    #[must_use]
    pub fn from_request(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, ParamVec::new(), body)
    }

    /// Add a path parameter, as the routing layer would have captured it.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value by name, if present and valid visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Path parameter by name. Duplicate names resolve to the last capture.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameter by name. Repeated keys resolve to the last occurrence.
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn path_params(&self) -> &[(String, String)] {
        &self.path_params
    }

    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.response.status = status;
        self.response.written = true;
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.headers.insert(name, value);
        self.response.written = true;
    }

    /// Replace the response with `status` and a body of the given content type.
    pub fn write_body(&mut self, status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) {
        self.response.status = status;
        self.response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.response.body = body.into();
        self.response.written = true;
    }

    pub fn write_text(&mut self, status: StatusCode, text: impl Into<String>) {
        self.write_body(status, "text/plain; charset=utf-8", text.into());
    }

    /// Serialize `value` as the JSON response body.
    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.write_body(status, "application/json", body);
        Ok(())
    }

    /// Whether anything has been written to the response yet.
    #[must_use]
    pub fn response_written(&self) -> bool {
        self.response.written
    }

    #[must_use]
    pub fn response_status(&self) -> StatusCode {
        self.response.status
    }

    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response.headers
    }

    #[must_use]
    pub fn response_body(&self) -> &Bytes {
        &self.response.body
    }

    /// Finish the exchange. An untouched response is an empty `200 OK`.
    #[must_use]
    pub fn into_response(self) -> Response {
        let ResponseState {
            status,
            mut headers,
            body,
            ..
        } = self.response;

        if let Ok(value) = HeaderValue::from_str(&self.request_id.to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
