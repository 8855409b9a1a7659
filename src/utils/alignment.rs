//! Memory alignment utilities.
//!
//! This module provides utilities for rounding addresses to page boundaries.

/// Round up to the next multiple of `align`.
///
/// # Arguments
///
/// * `value` - The value to round up.
/// * `align` - The alignment, which must be a power of two.
///
/// # Returns
///
/// The smallest multiple of `align` that is greater than or equal to `value`.
#[inline]
pub fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
    (value + align - 1) & !(align - 1)
}

/// Round down to the previous multiple of `align`.
///
/// # Arguments
///
/// * `value` - The value to round down.
/// * `align` - The alignment, which must be a power of two.
///
/// # Returns
///
/// The largest multiple of `align` that is less than or equal to `value`.
#[inline]
pub fn align_down(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
    value & !(align - 1)
}

/// Check if a value is aligned to a given alignment.
#[inline]
pub fn is_aligned(value: usize, align: usize) -> bool {
    debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
    (value & (align - 1)) == 0
}

/// Number of pages of `page_size` bytes that overlap `[addr, addr + len)`.
///
/// An empty range spans no pages.
#[inline]
pub fn page_count(addr: usize, len: usize, page_size: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let start = align_down(addr, page_size);
    let end = align_up(addr + len, page_size);
    (end - start) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align_up(0, 4096), 0);
        assert_eq!(align_up(1, 4096), 4096);
        assert_eq!(align_up(4096, 4096), 4096);
        assert_eq!(align_down(4097, 4096), 4096);
        assert_eq!(align_down(4095, 4096), 0);
        assert!(is_aligned(8192, 4096));
        assert!(!is_aligned(8193, 4096));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 0, 4096), 0);
        assert_eq!(page_count(0, 1, 4096), 1);
        assert_eq!(page_count(0, 4096, 4096), 1);
        assert_eq!(page_count(4095, 2, 4096), 2);
        assert_eq!(page_count(100, 3 * 4096, 4096), 4);
    }
}
