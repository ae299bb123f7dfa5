use super::types::{HttpMethod, RouteDocument, RouteSpec};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Key under each group that holds the list of route entries.
const ROUTE_LIST_KEY: &str = "route";
/// Key inside a route entry that names the handler method.
const HANDLER_KEY: &str = "handler";

/// Reasons a route file cannot be turned into a [`RouteDocument`].
///
/// Every entry-level variant carries the group name and the zero-based index
/// of the entry inside that group's `route` list.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed route file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("route file must be a mapping of group names to route lists")]
    NotAMapping,

    #[error("no route groups defined")]
    EmptyDocument,

    #[error("group key {key} must be a string")]
    InvalidGroupName { key: String },

    #[error("group {group:?} must be a mapping with a `route` list")]
    InvalidGroup { group: String },

    #[error("{group}.route[{index}]: route entry must be a mapping")]
    InvalidEntry { group: String, index: usize },

    #[error("{group}.route[{index}]: route {method:?} must map to a path string")]
    InvalidPathType {
        group: String,
        index: usize,
        method: String,
    },

    #[error("{group}.route[{index}]: route declares more than one HTTP method ({})", .methods.join(", "))]
    MultipleMethods {
        group: String,
        index: usize,
        methods: Vec<String>,
    },

    #[error("{group}.route[{index}]: route does not declare an HTTP method")]
    MissingMethod { group: String, index: usize },

    #[error("{group}.route[{index}]: route does not declare a path for {method}")]
    MissingPath {
        group: String,
        index: usize,
        method: HttpMethod,
    },

    #[error("{group}.route[{index}]: route does not declare a handler")]
    MissingHandler { group: String, index: usize },
}

/// Parse the raw bytes of a route file.
///
/// ```
/// let doc = routebind::routes::parse_route_document(b"
/// users:
///   route:
///     - get: /users/{id}
///       handler: GetUser
/// ").unwrap();
/// assert_eq!(doc.route_count(), 1);
/// ```
pub fn parse_route_document(bytes: &[u8]) -> Result<RouteDocument, ParseError> {
    let value: Value = serde_yaml::from_slice(bytes)?;
    let top = match value {
        Value::Null => return Err(ParseError::EmptyDocument),
        Value::Mapping(map) => map,
        _ => return Err(ParseError::NotAMapping),
    };

    let mut groups = BTreeMap::new();
    for (key, section) in top {
        let group = match key {
            Value::String(name) => name,
            other => {
                return Err(ParseError::InvalidGroupName {
                    key: describe_key(&other),
                })
            }
        };
        let routes = parse_group(&group, section)?;
        groups.insert(group, routes);
    }

    if groups.is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    Ok(RouteDocument::new(groups))
}

impl RouteDocument {
    /// Parse a route document held in a string.
    pub fn from_yaml_str(content: &str) -> Result<Self, ParseError> {
        parse_route_document(content.as_bytes())
    }
}

fn parse_group(group: &str, section: Value) -> Result<Vec<RouteSpec>, ParseError> {
    let mut section = match section {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(map) => map,
        _ => {
            return Err(ParseError::InvalidGroup {
                group: group.to_string(),
            })
        }
    };

    let entries = match section.remove(ROUTE_LIST_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => {
            return Err(ParseError::InvalidGroup {
                group: group.to_string(),
            })
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Mapping(map) => parse_entry(group, index, &map),
            _ => Err(ParseError::InvalidEntry {
                group: group.to_string(),
                index,
            }),
        })
        .collect()
}

/// Scan every key of one entry. Keys are compared lower-cased; unknown keys
/// and non-string keys are ignored.
fn parse_entry(group: &str, index: usize, entry: &Mapping) -> Result<RouteSpec, ParseError> {
    let mut handler: Option<&str> = None;
    let mut declared: Vec<(HttpMethod, &str)> = Vec::with_capacity(1);

    for (key, value) in entry {
        let Value::String(key) = key else {
            continue;
        };

        if key.eq_ignore_ascii_case(HANDLER_KEY) {
            // A non-string handler is ignored rather than rejected; the entry
            // then fails below as missing its handler.
            if let Value::String(name) = value {
                handler = Some(name.as_str());
            }
            continue;
        }

        let Some(method) = HttpMethod::from_key(key) else {
            continue;
        };
        let Value::String(path) = value else {
            return Err(ParseError::InvalidPathType {
                group: group.to_string(),
                index,
                method: key.clone(),
            });
        };
        declared.push((method, path.as_str()));
    }

    if declared.len() > 1 {
        return Err(ParseError::MultipleMethods {
            group: group.to_string(),
            index,
            methods: declared.iter().map(|(m, _)| m.to_string()).collect(),
        });
    }

    let Some((method, path)) = declared.pop() else {
        return Err(ParseError::MissingMethod {
            group: group.to_string(),
            index,
        });
    };

    if path.is_empty() {
        return Err(ParseError::MissingPath {
            group: group.to_string(),
            index,
            method,
        });
    }

    let handler = match handler {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ParseError::MissingHandler {
                group: group.to_string(),
                index,
            })
        }
    };

    Ok(RouteSpec {
        method,
        path: path.to_string(),
        handler: handler.to_string(),
    })
}

fn describe_key(key: &Value) -> String {
    match serde_yaml::to_string(key) {
        Ok(text) => text.trim_end().to_string(),
        Err(_) => format!("{key:?}"),
    }
}
