use axum::routing::MethodFilter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs a route file may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Match a route-entry key against the known verbs, ignoring case.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(key))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    #[must_use]
    pub fn method_filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Head => MethodFilter::HEAD,
            HttpMethod::Options => MethodFilter::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Head => http::Method::HEAD,
            HttpMethod::Options => http::Method::OPTIONS,
        }
    }
}

/// One validated route entry: verb, path pattern and the handler method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub path: String,
    pub handler: String,
}

/// Parsed route file: group name to the group's routes in declaration order.
///
/// Iteration across groups is by name. Nothing relies on that order; only the
/// order inside a group decides which registration wins a `(method, path)`
/// collision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteDocument {
    groups: BTreeMap<String, Vec<RouteSpec>>,
}

impl RouteDocument {
    #[must_use]
    pub fn new(groups: BTreeMap<String, Vec<RouteSpec>>) -> Self {
        Self { groups }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    #[must_use]
    pub fn routes(&self, group: &str) -> Option<&[RouteSpec]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RouteSpec])> {
        self.groups
            .iter()
            .map(|(name, routes)| (name.as_str(), routes.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_ignores_case() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("Get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("oPtIoNs"), Some(HttpMethod::Options));
        assert_eq!(HttpMethod::from_key("trace"), None);
        assert_eq!(HttpMethod::from_key("handler"), None);
    }

    #[test]
    fn test_into_http_method() {
        for method in HttpMethod::ALL {
            let converted: http::Method = method.into();
            assert_eq!(converted.as_str(), method.as_str());
        }
    }

    #[test]
    fn test_document_counts() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "users".to_string(),
            vec![
                RouteSpec {
                    method: HttpMethod::Get,
                    path: "/users".into(),
                    handler: "ListUsers".into(),
                },
                RouteSpec {
                    method: HttpMethod::Post,
                    path: "/users".into(),
                    handler: "CreateUser".into(),
                },
            ],
        );
        groups.insert("health".to_string(), Vec::new());
        let doc = RouteDocument::new(groups);

        assert_eq!(doc.group_count(), 2);
        assert_eq!(doc.route_count(), 2);
        assert_eq!(doc.routes("users").map(<[RouteSpec]>::len), Some(2));
        assert!(doc.routes("missing").is_none());
    }
}
