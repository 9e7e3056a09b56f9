//! cmdkit - Controller/action command dispatch
//!
//! cmdkit turns a list of user-supplied tokens into a call of one registered
//! action with fully typed arguments:
//!
//! - **`command`** - declarations and the validated, immutable command table
//! - **`resolve`** - picks the controller and action at the head of the input
//! - **`bind`** - binds the remaining tokens to the action's parameters
//! - **`coerce`** - token to value conversion for every scalar kind
//! - **`host`** - dispatcher, help listing and (with `shell`) an interactive shell
//! - **`config`** - TOML settings, environment overrides and manifests
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! cmdkit = { version = "0.1", features = ["config"] }
//! # Or enable everything:
//! cmdkit = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Example
//!
//! ```
//! use cmdkit::prelude::*;
//! use serde_json::json;
//!
//! let mut builder = CommandTableBuilder::new();
//! builder.add_controller(
//!     ControllerDeclaration::new("UsersController").action(
//!         ActionDeclaration::new("add")
//!             .param(ParameterDeclaration::scalar("name", ScalarKind::String))
//!             .param(ParameterDeclaration::nullable("age", ScalarKind::Int32)),
//!     ),
//! );
//!
//! let dispatcher = Dispatcher::new(builder.build().unwrap()).on("users", "add", |_, args| {
//!     Ok(json!({ "name": args.get::<String>(0)?, "age": args.get::<Option<i32>>(1)? }))
//! });
//!
//! let outcome = dispatcher.dispatch(&["users", "add", "--age", "21", "Jake"]).unwrap();
//! assert_eq!(outcome, Outcome::Completed(json!({ "name": "Jake", "age": 21 })));
//! ```

#![warn(missing_docs)]

pub mod bind;
pub mod coerce;
pub mod command;
pub mod error;
pub mod host;
pub mod resolve;
pub mod settings;

/// Settings and manifest loading (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

pub use error::{CmdkitError, CmdkitResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bind::{
        Argument, BindError, BoundArguments, NoServices, ParameterBinder, ServiceLookup,
        ServiceRegistry,
    };
    pub use crate::coerce::{ObjectValue, ScalarKind, Value};
    pub use crate::command::{
        ActionDeclaration, BuildError, CommandTable, CommandTableBuilder, ControllerDeclaration,
        DeclarationCollector, ObjectShape, ParameterDeclaration, ServiceKey,
    };
    pub use crate::error::{CmdkitError, CmdkitResult};
    pub use crate::host::{Dispatcher, Invocation, Outcome};
    pub use crate::resolve::{ActionBinding, CommandResolver, ResolveError};
    pub use crate::settings::{ResidualPolicy, Settings};

    #[cfg(feature = "config")]
    pub use crate::config::{ManifestCollector, SettingsLoader};

    #[cfg(feature = "shell")]
    pub use crate::host::Shell;
}
