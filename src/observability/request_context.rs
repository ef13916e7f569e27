//! Correlation context for one CLI command.
//!
//! `main` activates a context before dispatching a command. Service spans
//! pick it up and record `request_id` and `command`, so every log line of
//! one invocation shares an ID.

use std::cell::Cell;
use uuid::Uuid;

/// Identity of the command currently being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    id: Uuid,
    command: &'static str,
}

impl RequestContext {
    /// Creates a context with a fresh v4 ID for the named command.
    #[must_use]
    pub fn for_command(command: &'static str) -> Self {
        Self::with_id(Uuid::new_v4(), command)
    }

    /// Creates a context with a caller-supplied ID.
    #[must_use]
    pub const fn with_id(id: Uuid, command: &'static str) -> Self {
        Self { id, command }
    }

    /// Correlation ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Command name, e.g. `view` or `mark-read`.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        self.command
    }
}

thread_local! {
    static ACTIVE: Cell<Option<RequestContext>> = const { Cell::new(None) };
}

/// Keeps a context active on this thread until dropped.
///
/// Dropping reinstates whatever context was active before, so contexts nest.
#[must_use = "the context is deactivated as soon as the guard is dropped"]
pub struct ActiveRequest {
    previous: Option<RequestContext>,
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        ACTIVE.with(|slot| slot.set(self.previous));
    }
}

/// Activates `context` on the current thread.
pub fn activate(context: RequestContext) -> ActiveRequest {
    ActiveRequest {
        previous: ACTIVE.with(|slot| slot.replace(Some(context))),
    }
}

/// The context active on the current thread, if any.
#[must_use]
pub fn current_request() -> Option<RequestContext> {
    ACTIVE.with(Cell::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_is_visible_while_active() {
        let context = RequestContext::for_command("view");
        let _active = activate(context);

        let current = current_request().unwrap();
        assert_eq!(current, context);
        assert_eq!(current.command(), "view");
        assert_eq!(current.id().get_version_num(), 4);
    }

    #[test]
    fn test_dropping_guard_reinstates_previous_command() {
        let boundaries = RequestContext::with_id(Uuid::nil(), "boundaries");
        let _outer = activate(boundaries);
        {
            let _inner = activate(RequestContext::for_command("mark-read"));
            assert_eq!(current_request().map(|c| c.command()), Some("mark-read"));
        }
        assert_eq!(current_request(), Some(boundaries));
    }

    #[test]
    fn test_other_threads_see_no_context() {
        let _active = activate(RequestContext::for_command("view"));
        std::thread::spawn(|| assert!(current_request().is_none()))
            .join()
            .unwrap();
    }

    #[test]
    fn test_each_command_gets_its_own_id() {
        let first = RequestContext::for_command("view");
        let second = RequestContext::for_command("view");
        assert_ne!(first.id(), second.id());
    }
}
