//! Error handling for NUMA queries.

use std::io;
use std::result;

/// A specialized `Result` type for NUMA operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur in the safe NUMA query layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The page address set and the node status vector differ in length.
    #[error("page count {pages} does not match status slot count {status}")]
    LengthMismatch {
        /// Number of page addresses.
        pages: usize,
        /// Number of status slots.
        status: usize,
    },

    /// The page-node query failed as a whole.
    #[error("page node query failed with code {code}: {source}")]
    QueryFailed {
        /// Return code of the underlying call.
        code: i32,
        /// OS error captured right after the call.
        source: io::Error,
    },

    /// The OS reported a page size that is zero or negative.
    #[error("OS reported an invalid page size: {0}")]
    InvalidPageSize(i64),

    /// NUMA topology information is not available.
    #[error("NUMA is not available on this system")]
    NotAvailable,

    /// Invalid argument provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Why a single page could not be attributed to a node.
///
/// `move_pages(2)` reports these as negative errno values in the status slot
/// of the affected page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NodeQueryError {
    /// The page is not mapped, or is the shared zero page.
    #[error("page is not mapped or is the zero page")]
    Fault,

    /// The page is mapped but not present in memory.
    #[error("page is not present")]
    NotPresent,

    /// The page is mapped by more than one process.
    #[error("page is shared with other processes")]
    Access,

    /// The page is busy, e.g. under I/O or locked.
    #[error("page is busy")]
    Busy,

    /// The page could not be read.
    #[error("I/O error on page")]
    Io,

    /// The page cannot be queried, e.g. a special mapping.
    #[error("page cannot be queried")]
    Invalid,

    /// The kernel ran out of memory while answering.
    #[error("out of memory")]
    NoMemory,

    /// Any other negative status.
    #[error("unknown page status {0}")]
    Other(i32),
}

impl NodeQueryError {
    /// Classify a negative status slot value.
    pub fn from_status(status: i32) -> Self {
        match status.checked_neg() {
            Some(libc::EFAULT) => NodeQueryError::Fault,
            Some(libc::ENOENT) => NodeQueryError::NotPresent,
            Some(libc::EACCES) => NodeQueryError::Access,
            Some(libc::EBUSY) => NodeQueryError::Busy,
            Some(libc::EIO) => NodeQueryError::Io,
            Some(libc::EINVAL) => NodeQueryError::Invalid,
            Some(libc::ENOMEM) => NodeQueryError::NoMemory,
            _ => NodeQueryError::Other(status),
        }
    }

    /// The status value the kernel uses for this error.
    pub fn as_status(&self) -> i32 {
        match *self {
            NodeQueryError::Fault => -libc::EFAULT,
            NodeQueryError::NotPresent => -libc::ENOENT,
            NodeQueryError::Access => -libc::EACCES,
            NodeQueryError::Busy => -libc::EBUSY,
            NodeQueryError::Io => -libc::EIO,
            NodeQueryError::Invalid => -libc::EINVAL,
            NodeQueryError::NoMemory => -libc::ENOMEM,
            NodeQueryError::Other(status) => status,
        }
    }
}

/// Decode one slot of a node status vector.
///
/// Non-negative values are node ids; negative values are per-page failures.
#[inline]
pub fn decode_status(status: i32) -> result::Result<u32, NodeQueryError> {
    if status >= 0 {
        Ok(status as u32)
    } else {
        Err(NodeQueryError::from_status(status))
    }
}
