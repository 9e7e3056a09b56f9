//! Collector trait for feeding declarations from an external source.

use super::{BuildResult, CommandTableBuilder, ControllerDeclaration};

/// Produces controller declarations for a [`CommandTableBuilder`].
///
/// A collector is the seam between a host's declaration mechanism (a
/// manifest file, generated code, a hand-written list) and the table.
/// The trait is object-safe and can be used as `dyn DeclarationCollector`.
///
/// # Example
///
/// ```
/// use cmdkit::command::{
///     ActionDeclaration, BuildResult, CommandTableBuilder, ControllerDeclaration,
///     DeclarationCollector,
/// };
///
/// struct Builtins;
///
/// impl DeclarationCollector for Builtins {
///     fn collect(&self) -> BuildResult<Vec<ControllerDeclaration>> {
///         Ok(vec![ControllerDeclaration::new("StatusController")
///             .action(ActionDeclaration::new("show"))])
///     }
/// }
///
/// let mut builder = CommandTableBuilder::new();
/// assert_eq!(Builtins.register_all(&mut builder).unwrap(), 1);
/// ```
pub trait DeclarationCollector {
    /// Produce the declarations this source knows about.
    fn collect(&self) -> BuildResult<Vec<ControllerDeclaration>>;

    /// Register every collected declaration in multi-controller mode.
    ///
    /// Returns the number of controllers added.
    fn register_all(&self, builder: &mut CommandTableBuilder) -> BuildResult<usize> {
        let declarations = self.collect()?;
        let count = declarations.len();
        builder.add_controllers(declarations);
        Ok(count)
    }
}

/// A collector over a fixed list of declarations.
#[derive(Debug, Clone, Default)]
pub struct StaticCollector {
    declarations: Vec<ControllerDeclaration>,
}

impl StaticCollector {
    /// Wrap a list of declarations.
    pub fn new(declarations: Vec<ControllerDeclaration>) -> Self {
        Self { declarations }
    }

    /// Create an empty collector.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a declaration.
    pub fn add(&mut self, declaration: ControllerDeclaration) {
        self.declarations.push(declaration);
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl FromIterator<ControllerDeclaration> for StaticCollector {
    fn from_iter<I: IntoIterator<Item = ControllerDeclaration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl DeclarationCollector for StaticCollector {
    fn collect(&self) -> BuildResult<Vec<ControllerDeclaration>> {
        Ok(self.declarations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ActionDeclaration, BuildError};

    struct FailingCollector;

    impl DeclarationCollector for FailingCollector {
        fn collect(&self) -> BuildResult<Vec<ControllerDeclaration>> {
            Err(BuildError::collector("source unavailable"))
        }
    }

    fn declaration(name: &str) -> ControllerDeclaration {
        ControllerDeclaration::new(name).action(ActionDeclaration::new("index"))
    }

    #[test]
    fn test_static_collector_add() {
        let mut collector = StaticCollector::empty();
        assert!(collector.is_empty());

        collector.add(declaration("One"));
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.collect().unwrap()[0].name, "One");
    }

    #[test]
    fn test_register_all() {
        let collector = StaticCollector::new(vec![declaration("One"), declaration("Two")]);
        let mut builder = CommandTableBuilder::new();

        assert_eq!(collector.register_all(&mut builder).unwrap(), 2);
        assert_eq!(builder.build().unwrap().len(), 2);
    }

    #[test]
    fn test_register_all_propagates_failure() {
        let mut builder = CommandTableBuilder::new();
        let result = FailingCollector.register_all(&mut builder);

        assert!(matches!(result, Err(BuildError::Collector(_))));
        assert!(builder.is_empty());
    }
}
