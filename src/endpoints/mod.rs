//! Endpoint classification subsystem.
//!
//! # Data Flow
//! ```text
//! Table Compilation (at startup):
//!     data/google_api_endpoints.json (or a configured file)
//!     → loader.rs (deserialize, validate labels and methods)
//!     → host.rs (canonical hostname: lowercase, no port, no trailing dot)
//!     → pattern.rs (parse path templates into segments)
//!     → tree.rs (insert into per-host segment trie)
//!     → Freeze as immutable Arc<EndpointTree>
//!
//! Request Lookup:
//!     (hostname, method, path)
//!     → host.rs (same canonical form as the table)
//!     → tree.rs (host map, then one trie level per segment)
//!     → Return: EndpointRecord or None
//! ```
//!
//! # Design Decisions
//! - Tables compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always resolves to the same record
//! - Most specific segment wins; see `tree.rs` for the precedence ladder

pub mod host;
pub mod loader;
pub mod pattern;
pub mod table;
pub mod tree;

pub use host::normalize_host;
pub use loader::{load_from_path, load_from_str, TableError};
pub use pattern::{PathPattern, PatternError, Segment};
pub use table::{api_endpoints, init};
pub use tree::{EndpointRecord, EndpointTree};
