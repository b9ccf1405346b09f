//! Spinbind Core
//!
//! Contracts shared by every spinner binding: the engine a binding drives,
//! the host element the engine attaches to, the engine's domain events, and
//! the options object the engine is constructed with.
//!
//! # Architecture
//!
//! - [`SpinEngine`] - A live spinner widget (stepping, clamping, formatting)
//! - [`EngineFactory`] - Constructs engines against host elements
//! - [`HostElement`] - Input-like element with raw text and a listener table
//! - [`DomainEvent`] - The `on.*` events an engine emits besides `change`
//!
//! The [`memory`] module provides headless implementations of all three
//! traits for tests and simulation.
//!
//! # Example
//!
//! ```
//! use spinbind_core::prelude::*;
//! use spinbind_core::memory::{MemoryFactory, MemoryHost};
//!
//! let factory = MemoryFactory::new();
//! let host = MemoryHost::with_value("5");
//! let options = EngineOptions::derive(
//!     Renderer::Bootstrap5,
//!     &SettingsPatch { max: Some(6.0), ..Default::default() },
//!     &Default::default(),
//! );
//!
//! let engine = factory.construct(host.clone(), options)?;
//! engine.up_once();
//! engine.up_once();
//! assert_eq!(engine.get_value(), 6.0);
//! # Ok::<(), EngineError>(())
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod memory;
pub mod number;
pub mod options;

// Re-export all public types
pub use engine::{EngineFactory, SpinEngine};
pub use error::{EngineError, Result};
pub use events::{BLUR_EVENT, CHANGE_EVENT, FOCUS_EVENT, DomainEvent, DomainEventSet};
pub use host::{HostAttributes, HostElement, HostListener, ListenerId};
pub use number::{format_fixed, format_number, parse_number};
pub use options::{EngineOptions, Renderer, SettingsPatch};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{EngineFactory, SpinEngine};
    pub use crate::error::{EngineError, Result};
    pub use crate::events::{BLUR_EVENT, CHANGE_EVENT, FOCUS_EVENT, DomainEvent, DomainEventSet};
    pub use crate::host::{HostAttributes, HostElement, HostListener, ListenerId};
    pub use crate::options::{EngineOptions, Renderer, SettingsPatch};
}
