//! Endpoint lookup tree.
//!
//! # Responsibilities
//! - Store endpoint records per hostname in a segment trie
//! - Resolve (hostname, method, path) to the most specific record
//! - Return an explicit miss rather than a guessed record
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) host lookup via HashMap, then one trie level per path segment
//! - Precedence per level: literal, suffixed param, param, suffixed catch-all, catch-all
//! - Method is part of the key: a branch without the method backtracks to the
//!   next branch in precedence order instead of ending the search

use std::collections::HashMap;

use hyper::http::Method;

use crate::endpoints::pattern::{matches_with_suffix, PathPattern, Segment};

/// A leaf classification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRecord {
    /// Logical backend service, e.g. `storage`.
    pub service_name: String,
    /// Logical operation, e.g. `storage.objects.get`.
    pub resource_name: String,
    /// Template the record was registered under.
    pub path_template: String,
}

/// Returned when the same (host, method, template) is registered twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEndpoint;

type Endpoints = HashMap<Method, EndpointRecord>;

#[derive(Debug, Default)]
struct Node {
    literals: HashMap<String, Node>,
    /// Kept sorted: longest suffix first, unsuffixed last.
    params: Vec<(Option<String>, Node)>,
    /// Same ordering as `params`.
    catch_alls: Vec<(Option<String>, Endpoints)>,
    endpoints: Endpoints,
}

impl Node {
    fn param_child(&mut self, suffix: &Option<String>) -> &mut Node {
        let idx = match self.params.iter().position(|(s, _)| s == suffix) {
            Some(idx) => idx,
            None => {
                self.params.push((suffix.clone(), Node::default()));
                self.params.sort_by(|a, b| suffix_order(&a.0, &b.0));
                self.params
                    .iter()
                    .position(|(s, _)| s == suffix)
                    .unwrap_or_default()
            }
        };
        &mut self.params[idx].1
    }

    fn catch_all(&mut self, suffix: &Option<String>) -> &mut Endpoints {
        let idx = match self.catch_alls.iter().position(|(s, _)| s == suffix) {
            Some(idx) => idx,
            None => {
                self.catch_alls.push((suffix.clone(), Endpoints::new()));
                self.catch_alls.sort_by(|a, b| suffix_order(&a.0, &b.0));
                self.catch_alls
                    .iter()
                    .position(|(s, _)| s == suffix)
                    .unwrap_or_default()
            }
        };
        &mut self.catch_alls[idx].1
    }

    /// `path` is the unmatched remainder without its leading `/`; `None`
    /// once every segment is consumed.
    fn find(&self, path: Option<&str>, method: &Method) -> Option<&EndpointRecord> {
        let Some(path) = path else {
            return self.endpoints.get(method);
        };
        let (head, rest) = match path.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        if let Some(child) = self.literals.get(head) {
            if let Some(found) = child.find(rest, method) {
                return Some(found);
            }
        }

        for (suffix, child) in &self.params {
            if matches_with_suffix(head, suffix.as_deref()) {
                if let Some(found) = child.find(rest, method) {
                    return Some(found);
                }
            }
        }

        self.catch_alls
            .iter()
            .filter(|(suffix, _)| matches_with_suffix(path, suffix.as_deref()))
            .find_map(|(_, endpoints)| endpoints.get(method))
    }

    fn count(&self) -> usize {
        self.endpoints.len()
            + self.literals.values().map(Node::count).sum::<usize>()
            + self.params.iter().map(|(_, n)| n.count()).sum::<usize>()
            + self.catch_alls.iter().map(|(_, e)| e.len()).sum::<usize>()
    }
}

/// Longer suffixes are more specific; no suffix sorts last.
fn suffix_order(a: &Option<String>, b: &Option<String>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.len().cmp(&a.len()).then_with(|| a.cmp(b)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

/// Hostname-keyed index of known endpoints.
#[derive(Debug, Default)]
pub struct EndpointTree {
    hosts: HashMap<String, Node>,
}

impl EndpointTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record for `(host, method, pattern)`.
    pub fn insert(
        &mut self,
        host: &str,
        method: Method,
        pattern: &PathPattern,
        record: EndpointRecord,
    ) -> Result<(), DuplicateEndpoint> {
        let mut node = self.hosts.entry(host.to_string()).or_default();

        for segment in pattern.segments() {
            match segment {
                Segment::Literal(text) => {
                    node = node.literals.entry(text.clone()).or_default();
                }
                Segment::Param { suffix } => {
                    node = node.param_child(suffix);
                }
                Segment::CatchAll { suffix } => {
                    return insert_once(node.catch_all(suffix), method, record);
                }
            }
        }
        insert_once(&mut node.endpoints, method, record)
    }

    /// Look up the record for a request.
    ///
    /// The hostname is matched exactly. An empty path is treated as `/`.
    pub fn get(&self, host: &str, method: &Method, path: &str) -> Option<&EndpointRecord> {
        let root = self.hosts.get(host)?;
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        root.find((!trimmed.is_empty()).then_some(trimmed), method)
    }

    /// Returns true if the hostname has any registered endpoint.
    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// Known hostnames with their endpoint counts, sorted by hostname.
    pub fn hosts(&self) -> Vec<(&str, usize)> {
        let mut hosts: Vec<_> = self
            .hosts
            .iter()
            .map(|(host, node)| (host.as_str(), node.count()))
            .collect();
        hosts.sort_unstable();
        hosts
    }

    /// Total number of (host, method, template) entries.
    pub fn len(&self) -> usize {
        self.hosts.values().map(Node::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

fn insert_once(
    endpoints: &mut Endpoints,
    method: Method,
    record: EndpointRecord,
) -> Result<(), DuplicateEndpoint> {
    if endpoints.contains_key(&method) {
        return Err(DuplicateEndpoint);
    }
    endpoints.insert(method, record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "api.example.com";

    fn record(resource: &str, template: &str) -> EndpointRecord {
        EndpointRecord {
            service_name: "example".into(),
            resource_name: resource.into(),
            path_template: template.into(),
        }
    }

    fn tree(entries: &[(&str, Method, &str)]) -> EndpointTree {
        let mut tree = EndpointTree::new();
        for (template, method, resource) in entries {
            let pattern = PathPattern::parse(template).unwrap();
            tree.insert(HOST, method.clone(), &pattern, record(resource, template))
                .unwrap();
        }
        tree
    }

    fn resource<'a>(tree: &'a EndpointTree, method: Method, path: &str) -> Option<&'a str> {
        tree.get(HOST, &method, path).map(|r| r.resource_name.as_str())
    }

    #[test]
    fn test_literal_beats_param() {
        let t = tree(&[
            ("/v1/b/{bucket}", Method::GET, "buckets.get"),
            ("/v1/b/defaults", Method::GET, "defaults.get"),
        ]);
        assert_eq!(resource(&t, Method::GET, "/v1/b/defaults"), Some("defaults.get"));
        assert_eq!(resource(&t, Method::GET, "/v1/b/mine"), Some("buckets.get"));
    }

    #[test]
    fn test_precedence_independent_of_insert_order() {
        let t = tree(&[
            ("/v1/{name}", Method::GET, "param"),
            ("/v1/{+name}", Method::GET, "catch_all"),
            ("/v1/{name}:run", Method::GET, "verb"),
            ("/v1/list", Method::GET, "literal"),
        ]);
        assert_eq!(resource(&t, Method::GET, "/v1/list"), Some("literal"));
        assert_eq!(resource(&t, Method::GET, "/v1/job:run"), Some("verb"));
        assert_eq!(resource(&t, Method::GET, "/v1/job"), Some("param"));
        assert_eq!(resource(&t, Method::GET, "/v1/a/b"), Some("catch_all"));
    }

    #[test]
    fn test_longer_suffix_wins() {
        let t = tree(&[
            ("/v1/{name}:get", Method::POST, "short"),
            ("/v1/{name}:batchGet", Method::POST, "long"),
        ]);
        assert_eq!(resource(&t, Method::POST, "/v1/x:batchGet"), Some("long"));
        assert_eq!(resource(&t, Method::POST, "/v1/x:get"), Some("short"));
    }

    #[test]
    fn test_method_isolation() {
        let t = tree(&[("/v1/b/{bucket}", Method::GET, "buckets.get")]);
        assert_eq!(resource(&t, Method::GET, "/v1/b/x"), Some("buckets.get"));
        assert_eq!(resource(&t, Method::POST, "/v1/b/x"), None);
    }

    #[test]
    fn test_backtracks_when_literal_lacks_method() {
        let t = tree(&[
            ("/v1/b/{bucket}", Method::DELETE, "buckets.delete"),
            ("/v1/b/defaults", Method::GET, "defaults.get"),
        ]);
        assert_eq!(resource(&t, Method::DELETE, "/v1/b/defaults"), Some("buckets.delete"));
    }

    #[test]
    fn test_backtracks_from_dead_end_literal() {
        let t = tree(&[
            ("/v1/{project}/topics", Method::GET, "topics.list"),
            ("/v1/special/queues", Method::GET, "queues.list"),
        ]);
        assert_eq!(resource(&t, Method::GET, "/v1/special/topics"), Some("topics.list"));
    }

    #[test]
    fn test_root_and_empty_path() {
        let t = tree(&[("/", Method::GET, "root")]);
        assert_eq!(resource(&t, Method::GET, "/"), Some("root"));
        assert_eq!(resource(&t, Method::GET, ""), Some("root"));
        assert_eq!(resource(&t, Method::GET, "/x"), None);

        let without_root = tree(&[("/x", Method::GET, "x")]);
        assert_eq!(resource(&without_root, Method::GET, "/"), None);
    }

    #[test]
    fn test_param_needs_whole_segment() {
        let t = tree(&[("/v1/b/{bucket}", Method::GET, "buckets.get")]);
        assert_eq!(resource(&t, Method::GET, "/v1/b/"), None);
        assert_eq!(resource(&t, Method::GET, "/v1/b/x/y"), None);
        assert_eq!(resource(&t, Method::GET, "/v1/b"), None);
    }

    #[test]
    fn test_catch_all_with_suffix() {
        let t = tree(&[
            ("/v1/{+name}:cancel", Method::POST, "operations.cancel"),
            ("/v1/{+name}", Method::POST, "generic"),
        ]);
        assert_eq!(
            resource(&t, Method::POST, "/v1/projects/p/operations/o:cancel"),
            Some("operations.cancel")
        );
        assert_eq!(resource(&t, Method::POST, "/v1/projects/p"), Some("generic"));
        assert_eq!(resource(&t, Method::POST, "/v1/projects/p/"), Some("generic"));
        assert_eq!(resource(&t, Method::POST, "/v1/a/"), Some("generic"));
        assert_eq!(resource(&t, Method::POST, "/v1/o:cancel/"), Some("generic"));
        assert_eq!(resource(&t, Method::POST, "/v1/"), None);
        assert_eq!(resource(&t, Method::POST, "/v1"), None);
    }

    #[test]
    fn test_literal_case_sensitive_and_exact_host() {
        let t = tree(&[("/v1/Objects", Method::GET, "objects")]);
        assert_eq!(resource(&t, Method::GET, "/v1/objects"), None);
        assert!(t.get("API.example.com", &Method::GET, "/v1/Objects").is_none());
        assert!(t.get("api.example.com:443", &Method::GET, "/v1/Objects").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut t = EndpointTree::new();
        let p = PathPattern::parse("/v1/{x}").unwrap();
        t.insert(HOST, Method::GET, &p, record("a", "/v1/{x}")).unwrap();
        let other = PathPattern::parse("/v1/{y}").unwrap();
        assert_eq!(
            t.insert(HOST, Method::GET, &other, record("b", "/v1/{y}")),
            Err(DuplicateEndpoint)
        );
        t.insert(HOST, Method::PUT, &p, record("c", "/v1/{x}")).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_hosts_summary() {
        let mut t = tree(&[("/a", Method::GET, "a"), ("/b/**", Method::GET, "b")]);
        let p = PathPattern::parse("/").unwrap();
        t.insert("other.example.com", Method::GET, &p, record("r", "/")).unwrap();
        assert_eq!(t.hosts(), vec![(HOST, 2), ("other.example.com", 1)]);
        assert_eq!(t.len(), 3);
        assert!(t.contains_host(HOST));
        assert!(!t.is_empty());
    }
}
