//! Per-clause evaluation traces.
//!
//! Every evaluated clause emits one `operator key => outcome` line on
//! [`TRACE_TARGET`]. Tests read the lines back through [`capture`], which
//! collects them in a thread-local buffer instead of going through the global
//! logger.

use std::cell::RefCell;

/// Log target for per-clause evaluation traces.
pub const TRACE_TARGET: &str = "docmatch::trace";

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

// Puts back whatever buffer was active before, so captures nest.
struct Restore(Option<Vec<String>>);

impl Drop for Restore {
    fn drop(&mut self) {
        let outer = self.0.take();
        CAPTURED.with(|c| *c.borrow_mut() = outer);
    }
}

/// Run `f` and return its result with the trace lines it produced on this thread.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let outer = CAPTURED.with(|c| c.borrow_mut().replace(Vec::new()));
    let restore = Restore(outer);
    let out = f();
    let lines = CAPTURED.with(|c| c.borrow_mut().take()).unwrap_or_default();
    drop(restore);
    (out, lines)
}

/// Whether a [`capture`] is active on the current thread.
pub fn is_capturing() -> bool {
    CAPTURED.with(|c| c.borrow().is_some())
}

#[doc(hidden)]
pub fn record(line: String) {
    log::trace!(target: TRACE_TARGET, "{line}");
    CAPTURED.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line);
        }
    });
}

/// Emit one evaluation trace line.
/// Nothing is formatted unless a capture is active or the trace target is enabled.
#[macro_export]
macro_rules! eval_trace {
    ($($arg:tt)*) => {{
        if $crate::utils::devlog::is_capturing()
            || log::log_enabled!(target: $crate::utils::devlog::TRACE_TARGET, log::Level::Trace)
        {
            $crate::utils::devlog::record(format!($($arg)*));
        }
    }};
}
