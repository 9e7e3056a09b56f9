//! Command table builder and the immutable table it produces.

use super::declaration::{ActionDeclaration, ControllerDeclaration, ParameterShape};
use super::{BuildError, BuildResult, DeclarationCollector};
use crate::coerce::TypeCoercion;
use crate::settings::Settings;
use std::collections::HashMap;
use tracing::debug;

/// Case folding used for every reference and switch comparison.
pub(crate) fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// How controllers were registered. Selected once per table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Users type a controller name (optionally, per settings).
    MultiController,
    /// A single implicit controller; users never type its name.
    PrimaryController,
}

/// An action together with its computed reference name.
#[derive(Clone, Debug)]
pub struct RegisteredAction {
    reference: String,
    declaration: ActionDeclaration,
}

impl RegisteredAction {
    /// Name users type.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Source declaration.
    pub fn declaration(&self) -> &ActionDeclaration {
        &self.declaration
    }
}

/// A controller together with its computed reference name and actions.
#[derive(Clone, Debug)]
pub struct RegisteredController {
    reference: String,
    name: String,
    actions: Vec<RegisteredAction>,
}

impl RegisteredController {
    /// Name users type.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Structural name from the declaration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Actions in declaration order.
    pub fn actions(&self) -> &[RegisteredAction] {
        &self.actions
    }

    /// Find an action by reference name, ignoring case.
    pub fn action(&self, reference: &str) -> Option<&RegisteredAction> {
        let folded = fold_case(reference);
        self.actions.iter().find(|a| fold_case(&a.reference) == folded)
    }
}

/// Validated, read-only registry of controllers and actions.
///
/// A table is produced once by [`CommandTableBuilder::build`] and offers no
/// way to change it afterwards, so it can be shared freely between
/// concurrent invocations.
#[derive(Clone, Debug)]
pub struct CommandTable {
    controllers: Vec<RegisteredController>,
    mode: RegistrationMode,
    settings: Settings,
}

impl CommandTable {
    /// Controllers in registration order.
    pub fn controllers(&self) -> &[RegisteredController] {
        &self.controllers
    }

    /// Find a controller by reference name, ignoring case.
    pub fn controller(&self, reference: &str) -> Option<&RegisteredController> {
        let folded = fold_case(reference);
        self.controllers
            .iter()
            .find(|c| fold_case(&c.reference) == folded)
    }

    /// Registration mode chosen at build time.
    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Settings the table was built with; the resolver and binder use these.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Every controller/action pair in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&RegisteredController, &RegisteredAction)> {
        self.controllers
            .iter()
            .flat_map(|c| c.actions.iter().map(move |a| (c, a)))
    }

    /// Number of controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether the table has no controllers.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Total number of actions.
    pub fn action_count(&self) -> usize {
        self.controllers.iter().map(|c| c.actions.len()).sum()
    }
}

/// Collects controller declarations and validates them into a [`CommandTable`].
///
/// # Example
///
/// ```
/// use cmdkit::coerce::ScalarKind;
/// use cmdkit::command::{
///     ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
/// };
///
/// let mut builder = CommandTableBuilder::new();
/// builder.add_controller(
///     ControllerDeclaration::new("MathController").action(
///         ActionDeclaration::new("add")
///             .param(ParameterDeclaration::scalar("left", ScalarKind::Int32))
///             .param(ParameterDeclaration::scalar("right", ScalarKind::Int32)),
///     ),
/// );
///
/// let table = builder.build().unwrap();
/// assert_eq!(table.len(), 1);
/// assert!(table.controller("math").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandTableBuilder {
    declarations: Vec<ControllerDeclaration>,
    mode: Option<RegistrationMode>,
    conflict: Option<String>,
    settings: Settings,
}

impl CommandTableBuilder {
    /// Create an empty builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `settings` for switch names, defaults and, later, resolution.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a controller in multi-controller mode.
    pub fn add_controller(&mut self, declaration: ControllerDeclaration) -> &mut Self {
        self.note_mode(RegistrationMode::MultiController);
        self.declarations.push(declaration);
        self
    }

    /// Register several controllers in multi-controller mode.
    pub fn add_controllers<I>(&mut self, declarations: I) -> &mut Self
    where
        I: IntoIterator<Item = ControllerDeclaration>,
    {
        for declaration in declarations {
            self.add_controller(declaration);
        }
        self
    }

    /// Register the single implicit controller.
    pub fn primary_controller(&mut self, declaration: ControllerDeclaration) -> &mut Self {
        self.note_mode(RegistrationMode::PrimaryController);
        self.declarations.push(declaration);
        self
    }

    /// Register everything a collector yields, returning how many controllers it added.
    pub fn collect_from(&mut self, collector: &dyn DeclarationCollector) -> BuildResult<usize> {
        collector.register_all(self)
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn note_mode(&mut self, requested: RegistrationMode) {
        let conflict = match (self.mode, requested) {
            (None, mode) => {
                self.mode = Some(mode);
                None
            }
            (Some(RegistrationMode::MultiController), RegistrationMode::MultiController) => None,
            (Some(RegistrationMode::PrimaryController), RegistrationMode::PrimaryController) => {
                Some("a primary controller is already registered".to_string())
            }
            (Some(RegistrationMode::PrimaryController), RegistrationMode::MultiController) => {
                Some("controllers cannot be added once a primary controller is registered".to_string())
            }
            (Some(RegistrationMode::MultiController), RegistrationMode::PrimaryController) => Some(format!(
                "{} controller(s) already registered; a primary controller cannot be added",
                self.declarations.len()
            )),
        };
        if self.conflict.is_none() {
            self.conflict = conflict;
        }
    }

    /// Validate the registered declarations and produce a table.
    ///
    /// Building does not consume the builder; the same declarations always
    /// produce the same table or the same failure.
    pub fn build(&self) -> BuildResult<CommandTable> {
        if let Some(conflict) = &self.conflict {
            return Err(BuildError::registration_conflict(conflict.clone()));
        }
        if self.declarations.is_empty() {
            return Err(BuildError::EmptyTable);
        }

        let coercion = TypeCoercion::from_settings(&self.settings);
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut controllers = Vec::with_capacity(self.declarations.len());

        for declaration in &self.declarations {
            let reference = declaration.reference_name();
            if let Some(first) = seen.insert(fold_case(&reference), &declaration.name) {
                return Err(BuildError::duplicate_controller(
                    reference,
                    first,
                    declaration.name.clone(),
                ));
            }

            let actions = self.register_actions(&reference, declaration, &coercion)?;
            controllers.push(RegisteredController {
                reference,
                name: declaration.name.clone(),
                actions,
            });
        }

        let mode = self.mode.unwrap_or(RegistrationMode::MultiController);
        let table = CommandTable {
            controllers,
            mode,
            settings: self.settings.clone(),
        };
        debug!(
            controllers = table.len(),
            actions = table.action_count(),
            mode = ?mode,
            "built command table"
        );
        Ok(table)
    }

    fn register_actions(
        &self,
        controller: &str,
        declaration: &ControllerDeclaration,
        coercion: &TypeCoercion,
    ) -> BuildResult<Vec<RegisteredAction>> {
        let mut seen: HashMap<String, ()> = HashMap::new();
        let mut actions = Vec::with_capacity(declaration.actions.len());

        for action in &declaration.actions {
            let reference = action.reference_name().to_string();
            if seen.insert(fold_case(&reference), ()).is_some() {
                return Err(BuildError::duplicate_action(controller, reference));
            }
            actions.push(RegisteredAction {
                reference,
                declaration: action.clone(),
            });
        }

        if actions.is_empty() {
            return Err(BuildError::empty_controller(controller));
        }

        for action in &actions {
            self.validate_parameters(controller, action, coercion)?;
        }
        Ok(actions)
    }

    fn validate_parameters(
        &self,
        controller: &str,
        action: &RegisteredAction,
        coercion: &TypeCoercion,
    ) -> BuildResult<()> {
        let declaration = &action.declaration;
        let token_bound: Vec<_> = declaration
            .parameters
            .iter()
            .filter(|p| p.is_token_bound())
            .collect();
        let objects = token_bound.iter().filter(|p| p.is_object()).count();

        if objects > 1 {
            return Err(BuildError::invalid_shape(
                controller,
                &action.reference,
                "more than one object-shaped parameter",
            ));
        }
        if objects == 1 && token_bound.len() > 1 {
            return Err(BuildError::invalid_shape(
                controller,
                &action.reference,
                "an object-shaped parameter cannot be combined with scalar parameters",
            ));
        }
        for parameter in &token_bound {
            if let ParameterShape::Object(shape) = &parameter.shape {
                if contains_service(&shape.fields) {
                    return Err(BuildError::invalid_shape(
                        controller,
                        &action.reference,
                        format!("object '{}' declares a service-shaped field", shape.type_name),
                    ));
                }
            }
        }

        let mut switches: HashMap<String, ()> = HashMap::new();
        for leaf in declaration.scalar_leaves() {
            let switch = self.settings.switch_name(&leaf.name, leaf.alias.as_deref());
            if switches.insert(fold_case(&switch), ()).is_some() {
                return Err(BuildError::duplicate_switch(controller, &action.reference, switch));
            }

            if let (Some(text), Some((kind, _))) = (&leaf.default, leaf.scalar_kind()) {
                coercion
                    .convert(&leaf.name, kind, false, Some(text))
                    .map_err(|source| BuildError::InvalidDefault {
                        controller: controller.to_string(),
                        action: action.reference.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

fn contains_service(fields: &[super::FieldDeclaration]) -> bool {
    fields.iter().any(|field| match &field.shape {
        ParameterShape::Service { .. } => true,
        ParameterShape::Object(shape) => contains_service(&shape.fields),
        ParameterShape::Scalar { .. } => false,
    })
}
