//! Declarations and the validated command table.
//!
//! Hosts describe controllers, actions and parameters as plain records,
//! register them with a [`CommandTableBuilder`] (directly or through a
//! [`DeclarationCollector`]) and receive an immutable [`CommandTable`].
//!
//! ```text
//! ControllerDeclaration ──┐
//! DeclarationCollector ───┼──▶ CommandTableBuilder ──build()──▶ CommandTable
//! primary_controller() ───┘
//! ```
//!
//! # Example
//!
//! ```
//! use cmdkit::coerce::ScalarKind;
//! use cmdkit::command::{
//!     ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
//!     RegistrationMode,
//! };
//!
//! let mut builder = CommandTableBuilder::new();
//! builder.primary_controller(
//!     ControllerDeclaration::new("SimpleParametersController").action(
//!         ActionDeclaration::new("AsInt")
//!             .with_alias("as-int")
//!             .param(ParameterDeclaration::scalar("value", ScalarKind::Int32)),
//!     ),
//! );
//!
//! let table = builder.build().unwrap();
//! assert_eq!(table.mode(), RegistrationMode::PrimaryController);
//! assert_eq!(table.action_count(), 1);
//! ```

mod collector;
mod declaration;
mod error;
mod table;

pub use collector::{DeclarationCollector, StaticCollector};
pub use declaration::{
    ActionDeclaration, ControllerDeclaration, FieldDeclaration, ObjectShape, ParameterDeclaration,
    ParameterShape, ServiceKey,
};
pub use error::BuildError;
pub use table::{
    CommandTable, CommandTableBuilder, RegisteredAction, RegisteredController, RegistrationMode,
};

pub(crate) use table::fold_case;

/// Result type for table construction.
pub type BuildResult<T> = Result<T, BuildError>;
