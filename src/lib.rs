//! # numaport
//!
//! `numaport` answers a handful of questions about NUMA memory placement in a
//! portable way: is NUMA available, how many nodes are there, which node holds
//! each page of a memory region, and how large is a page.
//!
//! ## Modes
//!
//! - With the `numa` feature on Linux, queries go through libnuma and its
//!   internal warnings are routed into `tracing`.
//! - Otherwise a stub backend reports NUMA as unavailable and page queries
//!   do nothing. The page size is still answered from the OS.
//!
//! The mode is fixed at build time; there is no runtime dispatch.
//!
//! ## Example
//!
//! ```
//! use numaport::{numa_available, numa_max_node, numa_pagesize};
//!
//! let page_size = numa_pagesize();
//! assert!(page_size > 0);
//!
//! if numa_available() {
//!     println!("NUMA nodes: 0..={}", numa_max_node());
//! } else {
//!     println!("NUMA not available, page size {}", page_size);
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod huge_pages;
pub mod numa;
pub mod page_size;
pub mod platform;
pub mod utils;

pub use bridge::{DiagnosticsSink, ErrnoGuard, LogBridge};
pub use config::HugePagesStatus;
pub use error::{decode_status, Error, NodeQueryError, Result};
pub use huge_pages::HugePageSize;
pub use numa::{node_count, numa_available, query_page_nodes, query_pages, NodeUsage, PageNode};
pub use page_size::{numa_pagesize, try_numa_pagesize};
pub use platform::{numa_init, numa_max_node, numa_query_pages, NumaBackend};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
