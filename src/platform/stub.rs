//! Backend for builds without libnuma.

use libc::{c_int, c_void};

use super::{NumaBackend, NUMA_UNAVAILABLE};

/// Reports NUMA as unavailable and never touches caller memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stub;

impl NumaBackend for Stub {
    #[inline]
    fn init(&self) -> c_int {
        NUMA_UNAVAILABLE
    }

    #[inline]
    fn query_pages(&self, _pid: c_int, _pages: &[*mut c_void], _status: &mut [c_int]) -> c_int {
        0
    }

    #[inline]
    fn max_node(&self) -> c_int {
        0
    }
}
