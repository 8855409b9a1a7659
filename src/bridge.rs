//! Logging bridge for libnuma diagnostics.
//!
//! libnuma reports internal problems through two weak symbols, `numa_warn`
//! and `numa_error`, whose default versions print to stderr. When libnuma is
//! linked this crate supplies both, and they forward into `tracing` through a
//! [`DiagnosticsSink`]. Library errors are logged at WARN level; nothing is
//! propagated to the caller that triggered the callback.
//!
//! `errno` is saved before a hook does anything and restored before it
//! returns, so the code that called into libnuma sees the error state libnuma
//! left, not whatever logging did.
//!
//! The dynamic linker only hands the hooks to libnuma if the executable
//! exports them, e.g. when linked with `-C link-arg=-rdynamic`.

use errno::{errno, set_errno, Errno};

/// Target used for every event the bridge emits.
pub const LOG_TARGET: &str = "numaport::libnuma";

/// Error class attached to bridged events.
pub const ERRCODE_EXTERNAL_ROUTINE: &str = "external_routine_exception";

/// Receiver for diagnostics raised inside libnuma.
pub trait DiagnosticsSink {
    /// A rendered `numa_warn` message. `num` is libnuma's warning class.
    fn warn(&self, num: i32, message: &str);

    /// A `numa_error` report naming the failing call.
    fn error(&self, location: &str);
}

/// Sink that writes libnuma diagnostics to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBridge;

impl DiagnosticsSink for LogBridge {
    fn warn(&self, num: i32, message: &str) {
        tracing::warn!(
            target: LOG_TARGET,
            errcode = ERRCODE_EXTERNAL_ROUTINE,
            num,
            "libnuma: WARNING: {}",
            message
        );
    }

    fn error(&self, location: &str) {
        // TODO: raise to ERROR once strict mode (numa_set_strict) is honoured
        tracing::warn!(
            target: LOG_TARGET,
            errcode = ERRCODE_EXTERNAL_ROUTINE,
            "libnuma: ERROR: {}",
            location
        );
    }
}

/// Restores the saved `errno` when dropped.
#[derive(Debug)]
pub struct ErrnoGuard {
    saved: Errno,
}

impl ErrnoGuard {
    /// Capture the current `errno`.
    #[inline]
    pub fn save() -> Self {
        ErrnoGuard { saved: errno() }
    }

    /// The captured value.
    #[inline]
    pub fn saved(&self) -> Errno {
        self.saved
    }
}

impl Drop for ErrnoGuard {
    #[inline]
    fn drop(&mut self) {
        set_errno(self.saved);
    }
}

/// Deliver a warning to `sink` without disturbing `errno`.
pub fn dispatch_warn<S: DiagnosticsSink + ?Sized>(sink: &S, num: i32, message: &str) {
    let _errno = ErrnoGuard::save();
    sink.warn(num, message);
}

/// Deliver an error report to `sink` without disturbing `errno`.
pub fn dispatch_error<S: DiagnosticsSink + ?Sized>(sink: &S, location: &str) {
    let _errno = ErrnoGuard::save();
    sink.error(location);
}

#[cfg(all(target_os = "linux", feature = "numa", not(feature = "frontend")))]
pub use self::hooks::numa_warn;

#[cfg(all(target_os = "linux", feature = "numa", not(feature = "frontend")))]
mod hooks {
    use std::borrow::Cow;
    use std::ffi::CStr;

    use libc::{c_char, c_int};

    use super::{dispatch_error, dispatch_warn, LogBridge};

    extern "C" {
        /// Defined in `csrc/numa_warn.c`; renders the message and calls
        /// [`numaport_emit_warning`].
        pub fn numa_warn(num: c_int, fmt: *mut c_char, ...);
    }

    // The archive is linked whole (see build.rs); this keeps the reference
    // alive in the crate as well.
    #[used]
    static NUMA_WARN_HOOK: unsafe extern "C" fn(c_int, *mut c_char, ...) = numa_warn;

    unsafe fn text<'a>(ptr: *const c_char) -> Cow<'a, str> {
        if ptr.is_null() {
            Cow::Borrowed("(null)")
        } else {
            CStr::from_ptr(ptr).to_string_lossy()
        }
    }

    /// Receives the message rendered by `numa_warn`.
    ///
    /// # Safety
    ///
    /// `msg` must be null or a valid NUL-terminated string.
    #[no_mangle]
    pub unsafe extern "C" fn numaport_emit_warning(num: c_int, msg: *const c_char) {
        dispatch_warn(&LogBridge, num, &text(msg));
    }

    /// Override of libnuma's `numa_error`.
    ///
    /// # Safety
    ///
    /// `location` must be null or a valid NUL-terminated string.
    #[no_mangle]
    pub unsafe extern "C" fn numa_error(location: *mut c_char) {
        dispatch_error(&LogBridge, &text(location));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::capture_logs;
    use super::*;
    use std::cell::RefCell;

    /// Sink that clobbers errno the way a logging backend might.
    #[derive(Default)]
    struct Clobbering {
        seen: RefCell<Vec<String>>,
    }

    impl DiagnosticsSink for Clobbering {
        fn warn(&self, num: i32, message: &str) {
            set_errno(Errno(libc::ENOSPC));
            self.seen.borrow_mut().push(format!("warn {} {}", num, message));
        }

        fn error(&self, location: &str) {
            set_errno(Errno(libc::EPIPE));
            self.seen.borrow_mut().push(format!("error {}", location));
        }
    }

    #[test]
    fn test_warning_is_logged_with_text() {
        let logs = capture_logs(|| dispatch_warn(&LogBridge, 0, "code=7"));
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("libnuma: WARNING: code=7"), "{}", logs);
        assert!(logs.contains(ERRCODE_EXTERNAL_ROUTINE), "{}", logs);
    }

    #[test]
    fn test_error_is_downgraded_to_warning() {
        let logs = capture_logs(|| dispatch_error(&LogBridge, "move_pages"));
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(!logs.contains(" ERROR numaport"), "{}", logs);
        assert!(logs.contains("libnuma: ERROR: move_pages"), "{}", logs);
    }

    #[test]
    fn test_errno_restored_after_warn() {
        let sink = Clobbering::default();
        set_errno(Errno(libc::EAGAIN));

        dispatch_warn(&sink, 3, "code=7");

        assert_eq!(errno().0, libc::EAGAIN);
        assert_eq!(sink.seen.borrow().as_slice(), ["warn 3 code=7"]);
    }

    #[test]
    fn test_errno_restored_after_error() {
        let sink = Clobbering::default();
        set_errno(Errno(libc::EINTR));

        dispatch_error(&sink, "numa_node_to_cpus");

        assert_eq!(errno().0, libc::EINTR);
        assert_eq!(sink.seen.borrow().as_slice(), ["error numa_node_to_cpus"]);
    }

    #[test]
    fn test_guard_captures_current_errno() {
        set_errno(Errno(libc::EBADF));
        let guard = ErrnoGuard::save();
        assert_eq!(guard.saved().0, libc::EBADF);

        set_errno(Errno(0));
        drop(guard);
        assert_eq!(errno().0, libc::EBADF);
    }

    #[cfg(all(target_os = "linux", feature = "numa", not(feature = "frontend")))]
    mod hooks {
        use super::*;
        use libc::{c_char, c_int};

        #[test]
        fn test_numa_warn_renders_format() {
            let mut after = 0;
            let logs = capture_logs(|| unsafe {
                set_errno(Errno(libc::ENOENT));
                numa_warn(0, b"code=%d\0".as_ptr() as *mut c_char, 7 as c_int);
                after = errno().0;
            });

            // libnuma's own handler prints "libnuma: Warning:" to stderr instead
            assert!(logs.contains("libnuma: WARNING: code=7"), "{}", logs);
            assert_eq!(after, libc::ENOENT);
        }

        #[test]
        fn test_numa_warn_grows_for_long_messages() {
            let long = "x".repeat(1000);
            let arg = std::ffi::CString::new(long.clone()).unwrap();
            let logs = capture_logs(|| unsafe {
                numa_warn(1, b"%s!\0".as_ptr() as *mut c_char, arg.as_ptr());
            });

            assert!(logs.contains(&format!("{}!", long)), "{}", logs);
        }

        #[test]
        fn test_numa_error_restores_errno() {
            let mut after = 0;
            let logs = capture_logs(|| unsafe {
                set_errno(Errno(libc::EPERM));
                super::super::hooks::numa_error(b"set_mempolicy\0".as_ptr() as *mut c_char);
                after = errno().0;
            });

            assert!(logs.contains("libnuma: ERROR: set_mempolicy"), "{}", logs);
            assert_eq!(after, libc::EPERM);
        }
    }
}
