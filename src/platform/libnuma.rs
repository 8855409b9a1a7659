//! libnuma-backed implementation for Linux.

use std::ptr;

use errno::{set_errno, Errno};
use libc::{c_int, c_ulong, c_void};

use super::NumaBackend;

#[link(name = "numa", kind = "dylib")]
extern "C" {
    /// Must be called before any other libnuma function. Returns -1 if NUMA
    /// is not supported, in which case the other functions are undefined.
    fn numa_available() -> c_int;

    /// Highest node number available on the system.
    fn numa_max_node() -> c_int;

    /// Wrapper around `move_pages(2)`. With `nodes` null, only reports the
    /// current node of each page in `status`.
    fn numa_move_pages(
        pid: c_int,
        count: c_ulong,
        pages: *mut *mut c_void,
        nodes: *const c_int,
        status: *mut c_int,
        flags: c_int,
    ) -> c_int;
}

/// Queries NUMA state through libnuma.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibNuma;

impl NumaBackend for LibNuma {
    fn init(&self) -> c_int {
        let r = unsafe { numa_available() };
        tracing::debug!(result = r, "libnuma availability probe");
        r
    }

    fn query_pages(&self, pid: c_int, pages: &[*mut c_void], status: &mut [c_int]) -> c_int {
        if pages.len() != status.len() {
            set_errno(Errno(libc::EINVAL));
            return -1;
        }
        if pages.is_empty() {
            return 0;
        }

        // move_pages(2) never writes to the page array
        unsafe {
            numa_move_pages(
                pid,
                pages.len() as c_ulong,
                pages.as_ptr() as *mut *mut c_void,
                ptr::null(),
                status.as_mut_ptr(),
                0,
            )
        }
    }

    #[inline]
    fn max_node(&self) -> c_int {
        unsafe { numa_max_node() }
    }
}
