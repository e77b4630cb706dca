//! Script lifecycle: teardown registry, shared state, script startup and
//! the navigation signals that drive them.
//!
//! Every script follows one discipline: setup attaches listeners,
//! observers and timers and returns a [`Disposer`]; the disposer releases
//! all of it. On a navigation-start signal the [`Runtime`] runs the
//! non-persistent disposers, purges navigation-scoped state and forgets
//! cached elements; on navigation-complete it runs the setups again.

mod cleanup;
mod init;
pub mod keys;
mod runtime;
mod state;

pub use cleanup::{CleanupRegistry, Disposer};
pub use init::{InitFn, InitManager, RegisterOptions, ScriptConfig};
pub use runtime::{Runtime, NAVIGATION_COMPLETE_EVENT, NAVIGATION_START_EVENT};
pub use state::{StateKey, StateManager, Subscription, PERSISTENT_KEYS};
