//! Process-wide page configuration.
//!
//! The shared-memory subsystem decides whether huge pages are in use and
//! records the outcome here; the page-size resolver reads it on every call.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::error::Error;

/// Whether the shared memory segment ended up on huge pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HugePagesStatus {
    /// Huge pages are not in use.
    Off,

    /// Huge pages are in use.
    On,

    /// Shared memory has not been set up yet.
    #[default]
    Unknown,
}

impl HugePagesStatus {
    fn to_raw(self) -> u8 {
        match self {
            HugePagesStatus::Off => 0,
            HugePagesStatus::On => 1,
            HugePagesStatus::Unknown => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => HugePagesStatus::Off,
            1 => HugePagesStatus::On,
            _ => HugePagesStatus::Unknown,
        }
    }
}

impl fmt::Display for HugePagesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HugePagesStatus::Off => "off",
            HugePagesStatus::On => "on",
            HugePagesStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for HugePagesStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(HugePagesStatus::On),
            "off" | "false" | "0" => Ok(HugePagesStatus::Off),
            "unknown" => Ok(HugePagesStatus::Unknown),
            other => Err(Error::InvalidArgument(format!("invalid huge pages status: {}", other))),
        }
    }
}

static HUGE_PAGES_STATUS: AtomicU8 = AtomicU8::new(2);
static HUGE_PAGE_SIZE_KB: AtomicUsize = AtomicUsize::new(0);

/// Record whether huge pages are in use.
#[inline]
pub fn set_huge_pages_status(status: HugePagesStatus) {
    HUGE_PAGES_STATUS.store(status.to_raw(), Ordering::Relaxed);
}

/// Current huge pages status.
#[inline]
pub fn huge_pages_status() -> HugePagesStatus {
    HugePagesStatus::from_raw(HUGE_PAGES_STATUS.load(Ordering::Relaxed))
}

/// Set an explicit huge page size in kilobytes. Zero selects the system default.
#[inline]
pub fn set_huge_page_size_kb(kb: usize) {
    HUGE_PAGE_SIZE_KB.store(kb, Ordering::Relaxed);
}

/// Explicit huge page size in kilobytes, or zero when unset.
#[inline]
pub fn huge_page_size_kb() -> usize {
    HUGE_PAGE_SIZE_KB.load(Ordering::Relaxed)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("on".parse::<HugePagesStatus>().unwrap(), HugePagesStatus::On);
        assert_eq!(" OFF ".parse::<HugePagesStatus>().unwrap(), HugePagesStatus::Off);
        assert_eq!("unknown".parse::<HugePagesStatus>().unwrap(), HugePagesStatus::Unknown);
        assert!("try".parse::<HugePagesStatus>().is_err());
    }

    #[test]
    fn test_status_round_trip_through_atomic() {
        let _guard = test_lock::lock();
        let saved = huge_pages_status();

        set_huge_pages_status(HugePagesStatus::On);
        assert_eq!(huge_pages_status(), HugePagesStatus::On);
        set_huge_pages_status(HugePagesStatus::Off);
        assert_eq!(huge_pages_status(), HugePagesStatus::Off);

        set_huge_pages_status(saved);
    }

    #[test]
    fn test_display() {
        assert_eq!(HugePagesStatus::On.to_string(), "on");
        assert_eq!(HugePagesStatus::default().to_string(), "unknown");
    }
}
