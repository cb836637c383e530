use crate::magic_host;
use magic_behaviors::fluency;
use magic_core::Value;
use magic_dispatch::Dispatcher;
use magic_registry::{field, ClassMeta, Fluent, RegistryError, Visibility};

/// Default fluency: public properties only.
pub struct FluentUser {
    magic: Dispatcher<Self>,
    pub first_name: String,
    pub count: i64,
    pub email: String,
}

impl Default for FluentUser {
    fn default() -> Self {
        Self {
            magic: Dispatcher::default(),
            first_name: "Jean".to_string(),
            count: 0,
            email: String::new(),
        }
    }
}

fn fluent_user() -> Result<ClassMeta<FluentUser>, RegistryError> {
    let mut builder = ClassMeta::builder("FluentUser");
    builder
        .add_property("firstName", Visibility::Public)
        .accessors(field!(FluentUser, first_name))
        .done()?;
    builder
        .add_property("count", Visibility::Public)
        .typed("int")
        .accessors(field!(FluentUser, count))
        .done()?;
    builder
        .add_property("email", Visibility::Protected)
        .accessors(field!(FluentUser, email))
        .done()?;
    builder.uses(fluency::installer());
    builder.build()
}

magic_host!(FluentUser, fluent_user);

/// Fluency widened to protected properties.
pub struct ProtectedFluentUser {
    magic: Dispatcher<Self>,
    pub first_name: String,
    pub email: String,
    pub count: i64,
}

impl Default for ProtectedFluentUser {
    fn default() -> Self {
        Self {
            magic: Dispatcher::default(),
            first_name: "Jean".to_string(),
            email: String::new(),
            count: 0,
        }
    }
}

fn protected_fluent_user() -> Result<ClassMeta<ProtectedFluentUser>, RegistryError> {
    let mut builder = ClassMeta::builder("ProtectedFluentUser");
    builder
        .add_property("firstName", Visibility::Public)
        .accessors(field!(ProtectedFluentUser, first_name))
        .done()?;
    builder
        .add_property("email", Visibility::Protected)
        .accessors(field!(ProtectedFluentUser, email))
        .done()?;
    builder
        .add_property("count", Visibility::Private)
        .accessors(field!(ProtectedFluentUser, count))
        .done()?;
    builder
        .add_method("getEmail", Visibility::Public)
        .body(|user: &mut ProtectedFluentUser, _| Ok(Value::from(user.email.clone())))
        .done()?;
    builder
        .attribute(Fluent::visibility([Visibility::Public, Visibility::Protected]))
        .uses(fluency::installer());
    builder.build()
}

magic_host!(ProtectedFluentUser, protected_fluent_user);
