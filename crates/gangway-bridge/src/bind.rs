//! Thread Identity Binding
//!
//! A thread created in native code has no execution context inside the
//! managed runtime. Before its first managed call it must bind: acquire a
//! fresh context, hold it for the duration of its work, and release it on
//! exit. Contexts are strictly per-thread — there is no pooling or reuse,
//! which rules out context-leak and cross-thread-context bugs by
//! construction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use dashmap::DashMap;

use crate::{BridgeError, BridgeResult};

/// Execution-context identity held by one bound native thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundThreadContext {
    thread_id: ThreadId,
    display_name: String,
    context_id: u64,
}

impl BoundThreadContext {
    /// Identifier of the bound native thread
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Diagnostic name assigned at bind time
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Managed execution context handle
    pub fn context_id(&self) -> u64 {
        self.context_id
    }
}

/// Registry of execution contexts for native-originated threads.
#[derive(Debug, Default)]
pub struct ThreadBinder {
    contexts: DashMap<ThreadId, BoundThreadContext>,
    next_context_id: AtomicU64,
}

/// Removes the calling thread's context when the bound callback unwinds or
/// returns.
struct BindGuard<'a> {
    binder: &'a ThreadBinder,
    thread_id: ThreadId,
}

impl Drop for BindGuard<'_> {
    fn drop(&mut self) {
        self.binder.contexts.remove(&self.thread_id);
    }
}

impl ThreadBinder {
    /// Create an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the calling thread to a fresh execution context, run `callback`
    /// with the context attached, tear the context down, and return the
    /// callback's result code.
    ///
    /// Any number of distinct threads may bind concurrently. A thread that
    /// is already bound must not bind again; doing so is an error rather
    /// than a nested context.
    pub fn bind_and_run<F>(&self, display_name: &str, callback: F) -> BridgeResult<i32>
    where
        F: FnOnce() -> i32,
    {
        let thread_id = thread::current().id();
        if self.contexts.contains_key(&thread_id) {
            return Err(BridgeError::AlreadyBound(display_name.to_string()));
        }

        let context_id = self.next_context_id.fetch_add(1, Ordering::Relaxed);
        self.contexts.insert(
            thread_id,
            BoundThreadContext {
                thread_id,
                display_name: display_name.to_string(),
                context_id,
            },
        );
        log::debug!("bound native thread '{display_name}' to context {context_id}");

        let guard = BindGuard {
            binder: self,
            thread_id,
        };
        let code = callback();
        drop(guard);

        log::debug!("native thread '{display_name}' released context {context_id}");
        Ok(code)
    }

    /// Context of the calling thread, if it is currently bound.
    pub fn current_context(&self) -> Option<BoundThreadContext> {
        self.contexts.get(&thread::current().id()).map(|c| c.clone())
    }

    /// Whether the calling thread is bound.
    pub fn is_bound(&self) -> bool {
        self.contexts.contains_key(&thread::current().id())
    }

    /// Number of currently bound threads.
    pub fn bound_count(&self) -> usize {
        self.contexts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_bind_runs_callback_and_returns_code() {
        let binder = ThreadBinder::new();
        let code = binder.bind_and_run("worker", || 42).unwrap();
        assert_eq!(code, 42);
        assert_eq!(binder.bound_count(), 0);
    }

    #[test]
    fn test_context_visible_during_callback() {
        let binder = ThreadBinder::new();
        binder
            .bind_and_run("worker", || {
                let ctx = binder.current_context().expect("bound");
                assert_eq!(ctx.display_name(), "worker");
                assert!(binder.is_bound());
                0
            })
            .unwrap();
        assert!(!binder.is_bound());
        assert!(binder.current_context().is_none());
    }

    #[test]
    fn test_double_bind_rejected() {
        let binder = ThreadBinder::new();
        let result = binder.bind_and_run("outer", || {
            match binder.bind_and_run("inner", || 0) {
                Err(BridgeError::AlreadyBound(name)) => assert_eq!(name, "inner"),
                other => panic!("expected AlreadyBound, got {other:?}"),
            }
            7
        });
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_rebind_after_release() {
        let binder = ThreadBinder::new();
        let first = binder.bind_and_run("worker", || 1).unwrap();
        let second = binder.bind_and_run("worker", || 2).unwrap();
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn test_contexts_are_per_thread() {
        let binder = Arc::new(ThreadBinder::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let binder = binder.clone();
            handles.push(thread::spawn(move || {
                binder
                    .bind_and_run(&format!("worker-{i}"), || {
                        binder.current_context().unwrap().context_id() as i32
                    })
                    .unwrap()
            }));
        }

        let mut ids: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        // Every thread got its own context.
        assert_eq!(ids.len(), 8);
        assert_eq!(binder.bound_count(), 0);
    }

    #[test]
    fn test_context_released_on_panic() {
        let binder = Arc::new(ThreadBinder::new());
        let cloned = binder.clone();
        let result = thread::spawn(move || {
            let _ = cloned.bind_and_run("doomed", || panic!("boom"));
        })
        .join();
        assert!(result.is_err());
        assert_eq!(binder.bound_count(), 0);
    }
}
