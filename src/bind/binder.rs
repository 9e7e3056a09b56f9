//! Token to parameter binding.

use super::{Argument, BindError, BindResult, BoundArguments, ServiceLookup};
use crate::coerce::{ObjectValue, ScalarKind, TypeCoercion, Value};
use crate::command::{fold_case, CommandTable, ObjectShape, ParameterDeclaration, ParameterShape};
use crate::resolve::ActionBinding;
use crate::settings::{ResidualPolicy, Settings};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// How a scalar leaf got its token.
#[derive(Debug)]
enum Claim {
    /// A value token, by switch or by position.
    Token(String),
    /// A boolean switch with no value literal after it.
    Present,
}

/// A scalar parameter or object field, flattened depth first.
struct Leaf<'d> {
    declaration: &'d ParameterDeclaration,
    kind: ScalarKind,
    nullable: bool,
    switch: String,
}

/// Builds the argument list for a resolved action from its residual tokens.
///
/// Binding runs in three passes over a private copy of the residual tokens:
///
/// 1. every switch of the action claims its value (the last occurrence wins
///    and all occurrences are consumed);
/// 2. parameters no switch claimed take the first remaining token, in
///    declaration order;
/// 3. claimed tokens are coerced, and unclaimed parameters fall back to their
///    default, to absent when nullable, or to `false` for plain booleans.
///
/// Objects are bound field by field with the same rules, at any depth.
/// Service-shaped parameters come from the [`ServiceLookup`].
///
/// # Example
///
/// ```
/// use cmdkit::bind::{NoServices, ParameterBinder};
/// use cmdkit::coerce::ScalarKind;
/// use cmdkit::command::{
///     ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ParameterDeclaration,
/// };
/// use cmdkit::resolve::CommandResolver;
///
/// let mut builder = CommandTableBuilder::new();
/// builder.add_controller(
///     ControllerDeclaration::new("UsersController").action(
///         ActionDeclaration::new("add")
///             .param(ParameterDeclaration::scalar("name", ScalarKind::String))
///             .param(ParameterDeclaration::scalar("age", ScalarKind::Int32)),
///     ),
/// );
/// let table = builder.build().unwrap();
///
/// let binding = CommandResolver::new(&table)
///     .resolve(&["users", "add", "Jake", "--age", "21"])
///     .unwrap();
/// let args = ParameterBinder::new(&table).bind(&binding, &NoServices).unwrap();
///
/// assert_eq!(args.get::<String>(0).unwrap(), "Jake");
/// assert_eq!(args.get::<i32>(1).unwrap(), 21);
/// ```
#[derive(Debug, Clone)]
pub struct ParameterBinder<'t> {
    settings: &'t Settings,
    coercion: TypeCoercion,
}

impl<'t> ParameterBinder<'t> {
    /// Bind with the settings `table` was built with.
    pub fn new(table: &'t CommandTable) -> Self {
        Self::with_settings(table.settings())
    }

    /// Bind with explicit settings.
    pub fn with_settings(settings: &'t Settings) -> Self {
        Self {
            settings,
            coercion: TypeCoercion::from_settings(settings),
        }
    }

    /// Bind the residual tokens of `binding` to its action's parameters.
    pub fn bind(
        &self,
        binding: &ActionBinding<'_>,
        services: &dyn ServiceLookup,
    ) -> BindResult<BoundArguments> {
        let declaration = binding.action().declaration();
        let mut tokens = binding.residual().to_vec();
        trace!(tokens = ?tokens, "binding tokens");

        let leaves: Vec<Leaf<'_>> = declaration
            .scalar_leaves()
            .into_iter()
            .filter_map(|parameter| {
                let (kind, nullable) = parameter.scalar_kind()?;
                Some(Leaf {
                    declaration: parameter,
                    kind,
                    nullable,
                    switch: self
                        .settings
                        .switch_name(&parameter.name, parameter.alias.as_deref()),
                })
            })
            .collect();
        let switches: HashSet<String> = leaves.iter().map(|l| fold_case(&l.switch)).collect();

        let mut claims = Vec::with_capacity(leaves.len());
        for leaf in &leaves {
            claims.push(self.claim_switch(leaf, &mut tokens, &switches)?);
        }
        for (leaf, claim) in leaves.iter().zip(claims.iter_mut()) {
            if claim.is_none() {
                *claim = self.claim_position(leaf, &mut tokens);
            }
        }

        let values = leaves
            .iter()
            .zip(claims)
            .map(|(leaf, claim)| self.coerce(leaf, claim))
            .collect::<BindResult<Vec<Value>>>()?;
        let mut values = values.into_iter();

        let arguments = declaration
            .parameters
            .iter()
            .map(|parameter| assemble(parameter, &mut values, services))
            .collect::<BindResult<Vec<Argument>>>()?;

        self.check_residual(tokens)?;
        debug!(
            action = binding.action().reference(),
            arguments = arguments.len(),
            "bound arguments"
        );
        Ok(BoundArguments::new(arguments))
    }

    fn claim_switch(
        &self,
        leaf: &Leaf<'_>,
        tokens: &mut Vec<String>,
        switches: &HashSet<String>,
    ) -> BindResult<Option<Claim>> {
        let wanted = fold_case(&leaf.switch);
        let mut claim = None;
        let mut index = 0;

        while index < tokens.len() {
            if fold_case(&tokens[index]) != wanted {
                index += 1;
                continue;
            }

            let next = tokens.get(index + 1);
            if leaf.kind.is_bool() {
                let has_literal = next.is_some_and(|t| self.coercion.is_bool_literal(t));
                tokens.remove(index);
                claim = Some(if has_literal {
                    Claim::Token(tokens.remove(index))
                } else {
                    Claim::Present
                });
            } else {
                let has_value = next.is_some_and(|t| !switches.contains(&fold_case(t)));
                if !has_value {
                    return Err(BindError::missing_switch_value(&leaf.switch));
                }
                tokens.remove(index);
                claim = Some(Claim::Token(tokens.remove(index)));
            }
        }

        if claim.is_some() {
            debug!(parameter = %leaf.declaration.name, switch = %leaf.switch, "claimed by switch");
        }
        Ok(claim)
    }

    fn claim_position(&self, leaf: &Leaf<'_>, tokens: &mut Vec<String>) -> Option<Claim> {
        let first = tokens.first()?;
        if leaf.kind.is_bool() && !self.coercion.is_bool_literal(first) {
            return None;
        }
        debug!(parameter = %leaf.declaration.name, "claimed by position");
        Some(Claim::Token(tokens.remove(0)))
    }

    fn coerce(&self, leaf: &Leaf<'_>, claim: Option<Claim>) -> BindResult<Value> {
        let name = &leaf.declaration.name;
        let text = match claim {
            Some(Claim::Present) => return Ok(Value::Bool(true)),
            Some(Claim::Token(text)) => text,
            None => match &leaf.declaration.default {
                Some(default) => default.clone(),
                None if leaf.nullable => return Ok(Value::Absent),
                None if leaf.kind.is_bool() => return Ok(Value::Bool(false)),
                None => return Err(BindError::missing_required(name)),
            },
        };
        Ok(self
            .coercion
            .convert(name, leaf.kind, leaf.nullable, Some(&text))?)
    }

    fn check_residual(&self, tokens: Vec<String>) -> BindResult<()> {
        if tokens.is_empty() {
            return Ok(());
        }
        match self.settings.residual_tokens {
            ResidualPolicy::Ignore => {
                warn!(tokens = ?tokens, "ignoring unconsumed tokens");
                Ok(())
            }
            ResidualPolicy::Reject => Err(BindError::UnexpectedTokens(tokens)),
        }
    }
}

fn assemble(
    parameter: &ParameterDeclaration,
    values: &mut dyn Iterator<Item = Value>,
    services: &dyn ServiceLookup,
) -> BindResult<Argument> {
    match &parameter.shape {
        ParameterShape::Scalar { .. } => Ok(Argument::Value(values.next().unwrap_or(Value::Absent))),
        ParameterShape::Object(shape) => Ok(Argument::Value(Value::Object(build_object(shape, values)))),
        ParameterShape::Service { service } => services
            .lookup(service)
            .map(Argument::Service)
            .ok_or_else(|| BindError::UnresolvableParameter {
                parameter: parameter.name.clone(),
                service: service.clone(),
            }),
    }
}

fn build_object(shape: &ObjectShape, values: &mut dyn Iterator<Item = Value>) -> ObjectValue {
    let mut object = ObjectValue::new(&shape.type_name);
    for field in &shape.fields {
        let value = match &field.shape {
            ParameterShape::Scalar { .. } => values.next().unwrap_or(Value::Absent),
            ParameterShape::Object(nested) => Value::Object(build_object(nested, values)),
            // Rejected when the table is built.
            ParameterShape::Service { .. } => Value::Absent,
        };
        object.set(&field.name, value);
    }
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{NoServices, ServiceRegistry};
    use crate::command::{ActionDeclaration, CommandTableBuilder, ControllerDeclaration, ServiceKey};
    use serde::Deserialize;
    use std::sync::Arc;

    fn bind_with(
        settings: Settings,
        action: ActionDeclaration,
        tokens: &[&str],
        services: &dyn ServiceLookup,
    ) -> BindResult<BoundArguments> {
        let mut builder = CommandTableBuilder::new().with_settings(settings);
        builder.add_controller(ControllerDeclaration::new("TestController").action(action));
        let table = builder.build().unwrap();

        let controller = &table.controllers()[0];
        let binding = ActionBinding::new(
            controller,
            &controller.actions()[0],
            tokens.iter().map(|t| t.to_string()).collect(),
        );
        ParameterBinder::new(&table).bind(&binding, services)
    }

    fn bind(action: ActionDeclaration, tokens: &[&str]) -> BindResult<BoundArguments> {
        bind_with(Settings::default(), action, tokens, &NoServices)
    }

    fn name_age() -> ActionDeclaration {
        ActionDeclaration::new("add")
            .param(ParameterDeclaration::scalar("name", ScalarKind::String))
            .param(ParameterDeclaration::scalar("age", ScalarKind::Int32))
    }

    fn person_shape() -> ObjectShape {
        ObjectShape::new("Person")
            .field(ParameterDeclaration::scalar("name", ScalarKind::String))
            .field(ParameterDeclaration::scalar("age", ScalarKind::Int32).with_alias("-age"))
    }

    #[test]
    fn test_positional_in_declaration_order() {
        let args = bind(name_age(), &["Jake", "21"]).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "Jake");
        assert_eq!(args.get::<i32>(1).unwrap(), 21);
    }

    #[test]
    fn test_mixed_named_and_positional() {
        let args = bind(name_age(), &["Jake", "--age", "21"]).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "Jake");
        assert_eq!(args.get::<i32>(1).unwrap(), 21);
    }

    #[test]
    fn test_switches_in_any_order() {
        let args = bind(name_age(), &["--AGE", "21", "--Name", "Jake"]).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "Jake");
        assert_eq!(args.get::<i32>(1).unwrap(), 21);
    }

    #[test]
    fn test_switch_wins_over_earlier_positional() {
        // "--name" claims "B" before "21" is taken positionally.
        let args = bind(name_age(), &["21", "--name", "B"]).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "B");
        assert_eq!(args.get::<i32>(1).unwrap(), 21);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let action = ActionDeclaration::new("greet")
            .param(ParameterDeclaration::scalar("name", ScalarKind::String));
        let args = bind(action, &["--name", "A", "--name", "B"]).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "B");
    }

    #[test]
    fn test_repeated_switch_leaves_no_residue() {
        let settings = Settings {
            residual_tokens: ResidualPolicy::Reject,
            ..Settings::default()
        };
        let action = ActionDeclaration::new("greet")
            .param(ParameterDeclaration::scalar("name", ScalarKind::String));
        let args = bind_with(settings, action, &["--name", "A", "--name", "B"], &NoServices).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "B");
    }

    #[test]
    fn test_bool_switch_presence() {
        let action = || {
            ActionDeclaration::new("run")
                .param(ParameterDeclaration::scalar("flag", ScalarKind::Bool))
                .param(ParameterDeclaration::nullable("target", ScalarKind::String))
        };

        let args = bind(action(), &["--flag"]).unwrap();
        assert!(args.get::<bool>(0).unwrap());
        assert_eq!(args.get::<Option<String>>(1).unwrap(), None);

        let args = bind(action(), &["--flag", "true"]).unwrap();
        assert!(args.get::<bool>(0).unwrap());
        assert_eq!(args.get::<Option<String>>(1).unwrap(), None);

        let args = bind(action(), &["--flag", "No"]).unwrap();
        assert!(!args.get::<bool>(0).unwrap());

        let args = bind(action(), &["--flag", "prod"]).unwrap();
        assert!(args.get::<bool>(0).unwrap());
        assert_eq!(args.get::<Option<String>>(1).unwrap(), Some("prod".to_string()));
    }

    #[test]
    fn test_bool_absent_is_false() {
        let action = ActionDeclaration::new("run")
            .param(ParameterDeclaration::scalar("verbose", ScalarKind::Bool))
            .param(ParameterDeclaration::scalar("name", ScalarKind::String));

        let args = bind(action.clone(), &["Jake"]).unwrap();
        assert!(!args.get::<bool>(0).unwrap());
        assert_eq!(args.get::<String>(1).unwrap(), "Jake");

        let args = bind(action, &["yes", "Jake"]).unwrap();
        assert!(args.get::<bool>(0).unwrap());
        assert_eq!(args.get::<String>(1).unwrap(), "Jake");
    }

    #[test]
    fn test_nullable_bool_absent() {
        let action = ActionDeclaration::new("run")
            .param(ParameterDeclaration::nullable("verbose", ScalarKind::Bool));
        let args = bind(action, &[]).unwrap();
        assert_eq!(args.get::<Option<bool>>(0).unwrap(), None);
    }

    #[test]
    fn test_object_parameter() {
        let action = ActionDeclaration::new("index")
            .param(ParameterDeclaration::object("person", person_shape()));
        let args = bind(action, &["--name", "Jake", "-age", "21"]).unwrap();

        let mut expected = ObjectValue::new("Person");
        expected.set("name", Value::String("Jake".into()));
        expected.set("age", Value::Int32(21));
        assert_eq!(args.object(0).unwrap(), &expected);

        #[derive(Debug, Deserialize, PartialEq)]
        struct Person {
            name: String,
            age: i32,
        }
        assert_eq!(
            args.object(0).unwrap().deserialize::<Person>().unwrap(),
            Person {
                name: "Jake".into(),
                age: 21
            }
        );
    }

    #[test]
    fn test_object_fields_positional() {
        let action = ActionDeclaration::new("index")
            .param(ParameterDeclaration::object("person", person_shape()));
        let args = bind(action, &["Jake", "21"]).unwrap();
        let person = args.object(0).unwrap();
        assert_eq!(person.get("name"), Some(&Value::String("Jake".into())));
        assert_eq!(person.get("age"), Some(&Value::Int32(21)));
    }

    #[test]
    fn test_nested_object() {
        let shape = ObjectShape::new("Order")
            .field(ParameterDeclaration::scalar("id", ScalarKind::Int64))
            .field(ParameterDeclaration::object(
                "customer",
                ObjectShape::new("Customer")
                    .field(ParameterDeclaration::scalar("email", ScalarKind::String)),
            ))
            .field(ParameterDeclaration::nullable("note", ScalarKind::String));
        let action = ActionDeclaration::new("place").param(ParameterDeclaration::object("order", shape));

        let args = bind(action, &["--email", "a@b.c", "42"]).unwrap();
        let order = args.object(0).unwrap();
        assert_eq!(order.get("id"), Some(&Value::Int64(42)));
        assert_eq!(order.get("note"), Some(&Value::Absent));
        let customer = order.get("customer").and_then(Value::as_object).unwrap();
        assert_eq!(customer.get("email"), Some(&Value::String("a@b.c".into())));
    }

    #[test]
    fn test_missing_required_argument() {
        let action = ActionDeclaration::new("count")
            .param(ParameterDeclaration::scalar("count", ScalarKind::Int32));
        match bind(action, &[]) {
            Err(BindError::MissingRequiredArgument { parameter }) => assert_eq!(parameter, "count"),
            other => panic!("Expected MissingRequiredArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_default_applies_when_unclaimed() {
        let action = ActionDeclaration::new("repeat")
            .param(ParameterDeclaration::scalar("times", ScalarKind::Int32).with_default("3"));
        assert_eq!(bind(action.clone(), &[]).unwrap().get::<i32>(0).unwrap(), 3);
        assert_eq!(bind(action, &["--times", "5"]).unwrap().get::<i32>(0).unwrap(), 5);
    }

    #[test]
    fn test_nullable_soft_fail() {
        let action = ActionDeclaration::new("count")
            .param(ParameterDeclaration::nullable("count", ScalarKind::Int32));
        assert_eq!(bind(action.clone(), &[]).unwrap().value(0), Some(&Value::Absent));
        assert_eq!(bind(action, &["many"]).unwrap().value(0), Some(&Value::Absent));
    }

    #[test]
    fn test_conversion_error() {
        match bind(name_age(), &["Jake", "old"]) {
            Err(BindError::Conversion(error)) => assert_eq!(error.text, "old"),
            other => panic!("Expected Conversion, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_switch_value() {
        assert!(matches!(
            bind(name_age(), &["Jake", "--age"]),
            Err(BindError::MissingSwitchValue { .. })
        ));
        // A switch of the same action is never a value.
        match bind(name_age(), &["--name", "--age", "3"]) {
            Err(BindError::MissingSwitchValue { switch }) => assert_eq!(switch, "--name"),
            other => panic!("Expected MissingSwitchValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_parameters_ignore_extras() {
        let args = bind(ActionDeclaration::new("ping"), &["extra", "--stuff"]).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_reject_residual_tokens() {
        let settings = Settings {
            residual_tokens: ResidualPolicy::Reject,
            ..Settings::default()
        };
        match bind_with(settings, name_age(), &["Jake", "21", "extra"], &NoServices) {
            Err(BindError::UnexpectedTokens(tokens)) => assert_eq!(tokens, vec!["extra"]),
            other => panic!("Expected UnexpectedTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_switch_prefix() {
        let settings = Settings {
            switch_prefix: "/".to_string(),
            ..Settings::default()
        };
        let args = bind_with(settings, name_age(), &["/age", "21", "/name", "Jake"], &NoServices).unwrap();
        assert_eq!(args.get::<String>(0).unwrap(), "Jake");
        assert_eq!(args.get::<i32>(1).unwrap(), 21);
    }

    #[derive(Debug)]
    struct Clock(i64);

    #[test]
    fn test_service_parameter() {
        let action = ActionDeclaration::new("now")
            .param(ParameterDeclaration::service("clock", ServiceKey::of::<Clock>()))
            .param(ParameterDeclaration::scalar("offset", ScalarKind::Int64));

        let mut services = ServiceRegistry::new();
        services.insert(Clock(100));
        let args = bind_with(Settings::default(), action.clone(), &["5"], &services).unwrap();

        let clock: Arc<Clock> = args.service(0).unwrap();
        assert_eq!(clock.0 + args.get::<i64>(1).unwrap(), 105);

        match bind_with(Settings::default(), action, &["5"], &NoServices) {
            Err(BindError::UnresolvableParameter { parameter, .. }) => assert_eq!(parameter, "clock"),
            other => panic!("Expected UnresolvableParameter, got {:?}", other),
        }
    }
}
