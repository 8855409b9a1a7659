//! Safe NUMA topology and page placement queries.
//!
//! These wrap the raw operations in [`crate::platform`] with slice length
//! checks, typed per-page results and helpers for turning a memory region
//! into the page addresses the kernel expects.

use std::io;
use std::ptr;

use libc::{c_int, c_void};

use crate::error::{decode_status, Error, NodeQueryError, Result};
use crate::platform::{self, NUMA_UNAVAILABLE};
use crate::utils::alignment;

/// Placement of one page: the hosting node id, or why it is unknown.
pub type PageNode = std::result::Result<u32, NodeQueryError>;

/// Whether NUMA topology information is available.
#[inline]
pub fn numa_available() -> bool {
    platform::numa_init() != NUMA_UNAVAILABLE
}

/// Number of NUMA nodes, or `None` when NUMA is unavailable.
#[inline]
pub fn node_count() -> Option<usize> {
    if !numa_available() {
        return None;
    }
    let max = platform::numa_max_node();
    if max < 0 {
        None
    } else {
        Some(max as usize + 1)
    }
}

/// Fill `status` with the node of each page in `pages`.
///
/// `pages` and `status` must have the same length. On success every slot
/// holds a node id or a negative per-page error; see [`decode_status`].
/// Without libnuma this succeeds and leaves `status` untouched.
pub fn query_pages(pid: c_int, pages: &[*mut c_void], status: &mut [c_int]) -> Result<()> {
    if pages.len() != status.len() {
        return Err(Error::LengthMismatch {
            pages: pages.len(),
            status: status.len(),
        });
    }
    if pages.is_empty() {
        return Ok(());
    }

    let code = platform::numa_query_pages(pid, pages, status);
    if code < 0 {
        return Err(Error::QueryFailed {
            code,
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

/// Query the node of each page in `pages` and decode the results.
///
/// Fails with [`Error::NotAvailable`] when NUMA is unavailable, since the
/// status vector would never be filled.
pub fn query_page_nodes(pid: c_int, pages: &[*mut c_void]) -> Result<Vec<PageNode>> {
    if pages.is_empty() {
        return Ok(Vec::new());
    }
    if !numa_available() {
        return Err(Error::NotAvailable);
    }

    let mut status: Vec<c_int> = vec![-libc::ENOENT; pages.len()];
    query_pages(pid, pages, &mut status)?;
    Ok(status.into_iter().map(decode_status).collect())
}

/// Page-aligned addresses of every page overlapping `[ptr, ptr + len)`.
///
/// `page_size` must be a power of two.
pub fn page_addresses(ptr: *const u8, len: usize, page_size: usize) -> Result<Vec<*mut c_void>> {
    if page_size == 0 || !page_size.is_power_of_two() {
        return Err(Error::InvalidArgument(format!(
            "page size {} is not a power of two",
            page_size
        )));
    }
    if (ptr as usize).checked_add(len).is_none() {
        return Err(Error::InvalidArgument("region wraps the address space".into()));
    }

    let start = alignment::align_down(ptr as usize, page_size);
    let count = alignment::page_count(ptr as usize, len, page_size);
    Ok((0..count)
        .map(|i| (start + i * page_size) as *mut c_void)
        .collect())
}

/// Page-aligned addresses of every page lying wholly inside `[ptr, ptr + len)`.
///
/// Unlike [`page_addresses`], the partial pages at either end are left out,
/// so every returned page belongs to the region.
pub fn contained_page_addresses(
    ptr: *const u8,
    len: usize,
    page_size: usize,
) -> Result<Vec<*mut c_void>> {
    if page_size == 0 || !page_size.is_power_of_two() {
        return Err(Error::InvalidArgument(format!(
            "page size {} is not a power of two",
            page_size
        )));
    }
    let end = (ptr as usize)
        .checked_add(len)
        .ok_or_else(|| Error::InvalidArgument("region wraps the address space".into()))?;

    let start = match (ptr as usize).checked_add(page_size - 1) {
        Some(_) => alignment::align_up(ptr as usize, page_size),
        None => return Ok(Vec::new()),
    };
    let end = alignment::align_down(end, page_size);
    if end <= start {
        return Ok(Vec::new());
    }
    Ok((start..end)
        .step_by(page_size)
        .map(|addr| addr as *mut c_void)
        .collect())
}

/// Read one byte from each page so it is resident before a query.
///
/// Pages that were never touched have no node and report
/// [`NodeQueryError::NotPresent`].
///
/// # Safety
///
/// Every address must point into readable memory owned by this process.
pub unsafe fn touch_pages(pages: &[*mut c_void]) {
    for &page in pages {
        ptr::read_volatile(page as *const u8);
    }
}

/// Page counts per node for a set of query results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeUsage {
    /// Pages hosted on each node, indexed by node id.
    pub pages_per_node: Vec<u64>,

    /// Pages whose node could not be determined.
    pub failed: u64,
}

impl NodeUsage {
    /// Tally `nodes` into per-node counts for nodes `0..=max_node`.
    ///
    /// Node ids above `max_node` grow the table rather than being dropped.
    pub fn from_statuses(nodes: &[PageNode], max_node: usize) -> Self {
        let mut usage = NodeUsage {
            pages_per_node: vec![0; max_node + 1],
            failed: 0,
        };

        for node in nodes {
            match *node {
                Ok(id) => {
                    let id = id as usize;
                    if id >= usage.pages_per_node.len() {
                        usage.pages_per_node.resize(id + 1, 0);
                    }
                    usage.pages_per_node[id] += 1;
                }
                Err(_) => usage.failed += 1,
            }
        }
        usage
    }

    /// Bytes hosted on each node for pages of `page_size` bytes.
    pub fn bytes_per_node(&self, page_size: usize) -> Vec<u64> {
        self.pages_per_node
            .iter()
            .map(|&pages| pages * page_size as u64)
            .collect()
    }

    /// Total number of pages tallied, including failures.
    pub fn total(&self) -> u64 {
        self.pages_per_node.iter().sum::<u64>() + self.failed
    }
}
