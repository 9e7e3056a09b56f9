//! Parameter binding.
//!
//! Turns the residual tokens of an [`ActionBinding`](crate::resolve::ActionBinding)
//! into [`BoundArguments`]: one [`Argument`] per declared parameter, in
//! declaration order. Scalars and objects are bound from tokens; services are
//! requested from a [`ServiceLookup`].
//!
//! Tokens may be named (`--name value`, or a boolean `--flag` alone) or
//! positional, mixed freely. Named switches are always claimed before any
//! positional fallback, so a switch anywhere in the input wins over a bare
//! token that happens to precede it.

mod arguments;
mod binder;
mod error;
mod services;

pub use arguments::{Argument, BoundArguments};
pub use binder::ParameterBinder;
pub use error::BindError;
pub use services::{NoServices, ServiceInstance, ServiceLookup, ServiceRegistry};

/// Result type for binding.
pub type BindResult<T> = Result<T, BindError>;
