//! Spinbind Binding Controller
//!
//! Binds a declarative, re-rendered configuration to an imperative spinner
//! engine so that neither side corrupts the other's notion of the value.
//!
//! # Architecture
//!
//! A [`SpinBinding`] is composed of five parts:
//!
//! - **Lifecycle** ([`lifecycle`]) - constructs the engine on mount, destroys
//!   it on unmount, re-creates it when the [`StructuralKey`] changes
//! - **Reconciler** ([`reconciler`]) - resolves the [`Authority`] and pushes
//!   corrections into the engine in one direction only
//! - **Settings bridge** ([`settings`]) - forwards constraint and affix
//!   changes to the live engine
//! - **Event bridge** - turns host `change` and `on.*` events into caller
//!   callbacks
//! - **Handle** ([`SpinHandle`]) - focus, blur, increment, decrement,
//!   get and set for external callers
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use spinbind_binding::{BindingConfig, SpinBinding};
//! use spinbind_core::memory::{MemoryFactory, MemoryHost};
//!
//! let reported = Rc::new(Cell::new(f64::NAN));
//! let sink = reported.clone();
//! let config = BindingConfig::bootstrap5()
//!     .value(42.0)
//!     .min(0.0)
//!     .max(100.0)
//!     .on_change(move |value, _meta| sink.set(value));
//!
//! let mut binding = SpinBinding::new(MemoryFactory::new(), config);
//! binding.mount(MemoryHost::new())?;
//!
//! binding.handle().increment();
//! assert_eq!(reported.get(), 43.0);
//! # Ok::<(), spinbind_binding::BindingError>(())
//! ```

pub mod authority;
pub mod binding;
pub mod config;
pub mod error;
mod event_bridge;
pub mod form;
pub mod handle;
pub mod lifecycle;
pub mod reconciler;
pub mod settings;
mod state;

// Re-export all public types
pub use authority::{Authority, ChangeAction, ChangeMeta, ChangeSource, Ownership};
pub use binding::SpinBinding;
pub use config::{BindingConfig, Callbacks, ChangeCallback, DomainCallback, SpinProps};
pub use error::{BindingError, Result};
pub use form::FormEntry;
pub use handle::SpinHandle;
pub use lifecycle::StructuralKey;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::authority::{Authority, ChangeAction, ChangeMeta, ChangeSource};
    pub use crate::binding::SpinBinding;
    pub use crate::config::{BindingConfig, SpinProps};
    pub use crate::error::{BindingError, Result};
    pub use crate::handle::SpinHandle;
    pub use spinbind_core::{DomainEvent, Renderer};
}
