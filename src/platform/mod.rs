//! Platform-specific NUMA backends.
//!
//! Two implementations of [`NumaBackend`] exist: [`LibNuma`], which links
//! libnuma and performs real queries, and [`Stub`], which reports NUMA as
//! unavailable. The `numa` feature picks one at build time as
//! [`ActiveBackend`]; the free functions below call it statically.

use libc::{c_int, c_void};

mod stub;
pub use self::stub::Stub;

#[cfg(all(target_os = "linux", feature = "numa"))]
mod libnuma;
#[cfg(all(target_os = "linux", feature = "numa"))]
pub use self::libnuma::LibNuma;

/// The backend selected for this build.
#[cfg(all(target_os = "linux", feature = "numa"))]
pub type ActiveBackend = LibNuma;

/// The backend selected for this build.
#[cfg(not(all(target_os = "linux", feature = "numa")))]
pub type ActiveBackend = Stub;

/// Value returned by [`NumaBackend::init`] when NUMA is unavailable.
pub const NUMA_UNAVAILABLE: c_int = -1;

/// The NUMA query contract shared by every backend.
pub trait NumaBackend {
    /// Probe the NUMA facility.
    ///
    /// Returns a non-negative value when topology information is available
    /// and [`NUMA_UNAVAILABLE`] otherwise.
    fn init(&self) -> c_int;

    /// Write the node hosting each page of `pages` into `status`.
    ///
    /// `pid` zero means the calling process. Returns 0 on success and a
    /// negative value if the query failed as a whole; per-page failures are
    /// negative values in the matching status slot.
    fn query_pages(&self, pid: c_int, pages: &[*mut c_void], status: &mut [c_int]) -> c_int;

    /// Highest valid node id.
    fn max_node(&self) -> c_int;
}

/// Whether this build links libnuma.
#[inline]
pub const fn is_capability_gated() -> bool {
    cfg!(all(target_os = "linux", feature = "numa"))
}

/// Probe NUMA availability with the active backend.
#[inline]
pub fn numa_init() -> c_int {
    ActiveBackend::default().init()
}

/// Query page placement with the active backend.
#[inline]
pub fn numa_query_pages(pid: c_int, pages: &[*mut c_void], status: &mut [c_int]) -> c_int {
    ActiveBackend::default().query_pages(pid, pages, status)
}

/// Highest NUMA node id according to the active backend.
#[inline]
pub fn numa_max_node() -> c_int {
    ActiveBackend::default().max_node()
}

/// Get the page size the operating system reports, in bytes.
///
/// The raw value is returned unchecked; it may be zero or negative if the
/// platform query fails.
#[inline]
pub fn os_page_size() -> i64 {
    #[cfg(unix)]
    {
        unsafe { libc::sysconf(libc::_SC_PAGESIZE) as i64 }
    }

    #[cfg(windows)]
    {
        use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};

        unsafe {
            let mut system_info: SYSTEM_INFO = std::mem::zeroed();
            GetSystemInfo(&mut system_info);
            system_info.dwPageSize as i64
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        4096
    }
}
