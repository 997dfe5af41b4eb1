//! Core of the render/rewind component lifecycle.
//!
//! A page is a tree of components walked twice per form round trip: a
//! *render* pass that produces markup, and — when the form comes back — a
//! *rewind* pass that walks the same tree in the same order, re-deriving
//! each component's state from the submitted parameters instead of
//! producing output.
//!
//! This crate owns everything both passes share:
//!
//! - [`RequestCycle`]: per-request state, the [`WalkPhase`] state machine,
//!   and the active-form stack
//! - [`FormComponent`]: the contract every form component implements
//! - [`Binding`]: named value slots connecting components to application
//!   state, including the pooled script listener binding
//! - [`ActionListener`] and [`Callback`]: post-rewind action dispatch
//! - [`Pool`]: typed-key resource pool with scoped, guaranteed release
//! - [`Engine`]: process-wide host supplying the value codec and the pool
//! - [`render_page`] / [`rewind_page`]: the two tree-walk drivers

pub mod binding;
pub mod component;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod listener;
pub mod pool;
pub mod script;
pub mod walk;

pub use binding::{Binding, BindingError, StaticBinding, ValueBinding};
pub use component::FormComponent;
pub use cycle::{FormState, IdAllocator, RequestCycle, WalkPhase};
pub use engine::{Engine, EngineConfig};
pub use error::{CycleError, CycleResult};
pub use listener::{ActionListener, Callback, invoke};
pub use pool::{Pool, PoolKey, Pooled};
pub use script::{ScriptEngine, ScriptEngineFactory, ScriptListenerBinding, ScriptVars};
pub use walk::{Page, process_request, render_page, rewind_page};
