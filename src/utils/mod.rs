//! Utility functions for page address arithmetic.

pub mod alignment;

pub use alignment::{align_down, align_up, is_aligned, page_count};
