// Thread-scoped reason collector, grounded in the source project's
// `_explain.py` (a Python `threading.local()`-backed context). Rust's
// equivalent is `std::cell::RefCell` behind `std::thread::LocalKey`.
//
// Set-on-entry, clear-on-exit: `Collector::scoped` runs a closure with a
// fresh collector installed for the current thread only, and restores
// whatever was installed before (normally nothing) on the way out. This
// keeps concurrent decisions on different threads from seeing each
// other's reasons.

use std::cell::RefCell;

thread_local! {
    static CURRENT: RefCell<Option<Collector>> = const { RefCell::new(None) };
}

/// A path segment stack plus the ordered list of failure reasons
/// collected for the current decision.
#[derive(Debug, Default, Clone)]
pub struct Collector {
    path: Vec<String>,
    reasons: Vec<String>,
}

impl Collector {
    fn new() -> Self {
        Collector::default()
    }

    fn path_str(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.path.join("/"))
        }
    }
}

/// Runs `f` with a fresh thread-local reason collector installed, and
/// returns `f`'s result together with whatever reasons were recorded.
pub fn scoped<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    CURRENT.with(|cell| {
        let previous = cell.borrow_mut().replace(Collector::new());
        let result = f();
        let collector = cell.borrow_mut().take().unwrap_or_default();
        *cell.borrow_mut() = previous;
        (result, collector.reasons)
    })
}

/// Pushes a path segment for the duration of `f`, restoring the stack on
/// the way out even if `f` returns early through `?`.
pub fn with_path<T>(segment: impl Into<String>, f: impl FnOnce() -> T) -> T {
    CURRENT.with(|cell| {
        if let Some(c) = cell.borrow_mut().as_mut() {
            c.path.push(segment.into());
        }
    });
    let result = f();
    CURRENT.with(|cell| {
        if let Some(c) = cell.borrow_mut().as_mut() {
            c.path.pop();
        }
    });
    result
}

/// Records `[code] message (at path)` using the current path stack.
/// A no-op outside of [`scoped`].
pub fn add_reason(code: &str, message: impl Into<String>) {
    CURRENT.with(|cell| {
        if let Some(c) = cell.borrow_mut().as_mut() {
            let path = c.path_str();
            c.reasons.push(format!("[{code}] {} (at {path})", message.into()));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_code_message_and_path() {
        let (_, reasons) = scoped(|| {
            with_path("properties", || {
                with_path("name", || {
                    add_reason("num__01", "minimum constraint violated");
                });
            });
        });
        assert_eq!(
            reasons,
            vec!["[num__01] minimum constraint violated (at /properties/name)".to_string()]
        );
    }

    #[test]
    fn empty_path_renders_as_root() {
        let (_, reasons) = scoped(|| {
            add_reason("obj__required", "missing required key");
        });
        assert_eq!(
            reasons,
            vec!["[obj__required] missing required key (at /)".to_string()]
        );
    }

    #[test]
    fn scopes_do_not_leak_across_calls() {
        let (_, first) = scoped(|| {
            add_reason("num__01", "a");
        });
        let (_, second) = scoped(|| Vec::<String>::new());
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
