//! Huge page size detection.
//!
//! This module answers how large a huge page is on the current system, which
//! the page-size resolver needs when shared memory lives on huge pages.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config;

/// Size of a huge page in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HugePageSize(usize);

impl HugePageSize {
    /// 2MB huge pages.
    pub const TWO_MB: HugePageSize = HugePageSize(2 * 1024 * 1024);

    /// 1GB huge pages.
    pub const ONE_GB: HugePageSize = HugePageSize(1024 * 1024 * 1024);

    /// Create a huge page size from a kilobyte count.
    ///
    /// Returns `None` for zero or when the byte count does not fit in `usize`.
    #[inline]
    pub fn from_kb(kb: usize) -> Option<Self> {
        match kb.checked_mul(1024) {
            Some(0) | None => None,
            Some(bytes) => Some(HugePageSize(bytes)),
        }
    }

    /// The size in bytes.
    #[inline]
    pub fn bytes(self) -> usize {
        self.0
    }
}

/// Size used when the system does not say otherwise.
pub const DEFAULT_HUGE_PAGE_SIZE: HugePageSize = HugePageSize::TWO_MB;

/// Location of the kernel memory summary on Linux.
pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// Resolve the huge page size in bytes.
///
/// An explicitly configured size wins; otherwise the system default is used.
pub fn huge_page_size() -> usize {
    let configured = config::huge_page_size_kb();
    if configured != 0 {
        match HugePageSize::from_kb(configured) {
            Some(size) => return size.bytes(),
            None => tracing::warn!(
                "configured huge page size of {} kB is too large, using the system default",
                configured
            ),
        }
    }

    system_default().unwrap_or(DEFAULT_HUGE_PAGE_SIZE).bytes()
}

/// The default huge page size reported by the operating system, if any.
#[inline]
pub fn system_default() -> Option<HugePageSize> {
    #[cfg(all(target_os = "linux", feature = "huge_pages"))]
    {
        match read_meminfo_huge_page_size(MEMINFO_PATH) {
            Ok(size) => size,
            Err(err) => {
                tracing::debug!("could not read {}: {}", MEMINFO_PATH, err);
                None
            }
        }
    }

    #[cfg(windows)]
    {
        use winapi::um::memoryapi::GetLargePageMinimum;

        let size = unsafe { GetLargePageMinimum() };
        if size == 0 {
            None
        } else {
            Some(HugePageSize(size as usize))
        }
    }

    #[cfg(not(any(all(target_os = "linux", feature = "huge_pages"), windows)))]
    {
        None
    }
}

/// Read the `Hugepagesize:` entry from a meminfo-formatted file.
pub fn read_meminfo_huge_page_size<P: AsRef<Path>>(path: P) -> io::Result<Option<HugePageSize>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(parse_meminfo(&contents))
}

/// Extract the huge page size from meminfo contents.
///
/// The kernel reports the value in kB, e.g. `Hugepagesize:       2048 kB`.
pub fn parse_meminfo(contents: &str) -> Option<HugePageSize> {
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("Hugepagesize:") {
            let mut parts = rest.split_whitespace();
            let size = parts.next()?.parse::<usize>().ok()?;
            return match parts.next() {
                Some("kB") | None => HugePageSize::from_kb(size),
                Some(_) => None,
            };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MEMINFO: &str = "MemTotal:       32768000 kB\n\
                           HugePages_Total:       0\n\
                           HugePages_Free:        0\n\
                           Hugepagesize:       2048 kB\n\
                           Hugetlb:               0 kB\n";

    #[test]
    fn test_parse_meminfo() {
        assert_eq!(parse_meminfo(MEMINFO), Some(HugePageSize::TWO_MB));
        assert_eq!(
            parse_meminfo("Hugepagesize:    1048576 kB\n"),
            Some(HugePageSize::ONE_GB)
        );
    }

    #[test]
    fn test_parse_meminfo_missing_or_malformed() {
        assert_eq!(parse_meminfo("MemTotal: 1024 kB\n"), None);
        assert_eq!(parse_meminfo("Hugepagesize: lots kB\n"), None);
        assert_eq!(parse_meminfo("Hugepagesize: 0 kB\n"), None);
        assert_eq!(parse_meminfo("Hugepagesize: 2048 MB\n"), None);
    }

    #[test]
    fn test_read_meminfo_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Hugepagesize:      16384 kB\n").unwrap();

        let size = read_meminfo_huge_page_size(file.path()).unwrap();
        assert_eq!(size, HugePageSize::from_kb(16384));
        assert_eq!(size.map(HugePageSize::bytes), Some(16 * 1024 * 1024));
    }

    #[test]
    fn test_read_meminfo_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_meminfo_huge_page_size(dir.path().join("meminfo")).is_err());
    }

    #[test]
    fn test_configured_size_wins() {
        let _guard = config::test_lock::lock();
        let saved = config::huge_page_size_kb();

        config::set_huge_page_size_kb(1024 * 1024);
        assert_eq!(huge_page_size(), HugePageSize::ONE_GB.bytes());

        config::set_huge_page_size_kb(saved);
    }

    #[test]
    fn test_from_kb_rejects_overflow() {
        assert_eq!(HugePageSize::from_kb(2048), Some(HugePageSize::TWO_MB));
        assert_eq!(HugePageSize::from_kb(0), None);
        assert_eq!(HugePageSize::from_kb(usize::MAX / 512), None);
        assert_eq!(HugePageSize::from_kb(usize::MAX), None);
    }

    #[test]
    fn test_oversized_configuration_falls_back() {
        let _guard = config::test_lock::lock();
        let saved = config::huge_page_size_kb();

        config::set_huge_page_size_kb(usize::MAX / 512);
        let expected = system_default().unwrap_or(DEFAULT_HUGE_PAGE_SIZE).bytes();
        assert_eq!(huge_page_size(), expected);
        assert!(huge_page_size() > 0);

        config::set_huge_page_size_kb(saved);
    }

    #[test]
    fn test_default_is_positive() {
        let _guard = config::test_lock::lock();
        assert!(huge_page_size() > 0);
    }
}
