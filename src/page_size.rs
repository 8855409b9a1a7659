//! Page size resolution.
//!
//! Behaves the same whether or not libnuma is linked: the answer comes from
//! the OS, replaced by the huge page size when shared memory uses huge pages.

use crate::config::{self, HugePagesStatus};
use crate::error::{Error, Result};
use crate::huge_pages;
use crate::platform;

/// Page size reported when the OS answer is unusable.
pub const FALLBACK_PAGE_SIZE: usize = 4096;

/// Resolve the memory page size in bytes, surfacing a bad OS answer.
///
/// Not cached: the huge pages status may change between calls.
pub fn try_numa_pagesize() -> Result<usize> {
    let raw = platform::os_page_size();
    if raw <= 0 {
        return Err(Error::InvalidPageSize(raw));
    }

    Ok(resolve(raw as usize, config::huge_pages_status()))
}

/// Resolve the memory page size in bytes.
///
/// Always strictly positive. A zero or negative OS answer is logged and
/// replaced with [`FALLBACK_PAGE_SIZE`].
pub fn numa_pagesize() -> usize {
    match try_numa_pagesize() {
        Ok(size) => size,
        Err(err) => {
            tracing::warn!("{}, assuming {} bytes", err, FALLBACK_PAGE_SIZE);
            resolve(FALLBACK_PAGE_SIZE, config::huge_pages_status())
        }
    }
}

#[inline]
fn resolve(os_page_size: usize, status: HugePagesStatus) -> usize {
    if status == HugePagesStatus::On {
        huge_pages::huge_page_size()
    } else {
        os_page_size
    }
}
