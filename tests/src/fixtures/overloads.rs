use crate::magic_host;
use magic_behaviors::overloaded;
use magic_core::{Object, Value};
use magic_dispatch::Dispatcher;
use magic_registry::{ClassMeta, MethodBuilder, Overloaded, ParamDef, RegistryError, Visibility};

const ITEM: &str = "OverloadedModelItem";

/// An item record as the overloaded finders return it.
pub fn item(name: &str, age: i64, value: f64) -> Value {
    Value::Object(
        Object::new(ITEM)
            .with("name", name)
            .with("age", age)
            .with("value", value),
    )
}

/// Five `find` overloads, two of which share a signature.
pub struct OverloadedModel {
    magic: Dispatcher<Self>,
    pub items: Vec<Value>,
}

impl Default for OverloadedModel {
    fn default() -> Self {
        Self {
            magic: Dispatcher::default(),
            items: vec![
                item("Blue", 25, 1.2),
                item("Red", 30, 1.5),
                item("Green", 35, 1.8),
            ],
        }
    }
}

impl OverloadedModel {
    /// The first item whose fields equal every `(field, value)` pair.
    fn find_by(&self, fields: &[(&str, Value)]) -> Option<Value> {
        self.items
            .iter()
            .find(|item| {
                item.as_object().is_some_and(|object| {
                    fields
                        .iter()
                        .all(|(field, value)| object.get(field) == Some(value))
                })
            })
            .cloned()
    }
}

fn default_param() -> ParamDef {
    ParamDef::typed("default", &format!("?{}", ITEM)).optional()
}

/// The argument at `index`, `Null` when it was omitted.
fn nth(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn finder(builder: MethodBuilder<'_, OverloadedModel>) -> Result<(), RegistryError> {
    builder.attribute(Overloaded::new("find")).done()
}

fn find_by_all(model: &mut OverloadedModel, args: Vec<Value>) -> Value {
    let fields = [
        ("name", nth(&args, 0)),
        ("age", nth(&args, 1)),
        ("value", nth(&args, 2)),
    ];
    model.find_by(&fields).unwrap_or_else(|| nth(&args, 3))
}

fn overloaded_model() -> Result<ClassMeta<OverloadedModel>, RegistryError> {
    let mut builder = ClassMeta::builder("OverloadedModel");

    finder(
        builder
            .add_method("findByAge", Visibility::Public)
            .params([ParamDef::typed("age", "int"), default_param()])
            .body(|model: &mut OverloadedModel, args| {
                Ok(model
                    .find_by(&[("age", nth(&args, 0))])
                    .unwrap_or_else(|| nth(&args, 1)))
            }),
    )?;
    finder(
        builder
            .add_method("findByName", Visibility::Public)
            .params([ParamDef::typed("name", "string"), default_param()])
            .body(|model: &mut OverloadedModel, args| {
                Ok(model
                    .find_by(&[("name", nth(&args, 0))])
                    .unwrap_or_else(|| nth(&args, 1)))
            }),
    )?;
    finder(
        builder
            .add_method("findByKey", Visibility::Public)
            .params([
                ParamDef::typed("key", "string"),
                ParamDef::typed("value", "int|string"),
                default_param(),
            ])
            .body(|model: &mut OverloadedModel, args| {
                let key = nth(&args, 0);
                Ok(model
                    .find_by(&[(key.as_str().unwrap_or_default(), nth(&args, 1))])
                    .unwrap_or_else(|| nth(&args, 2)))
            }),
    )?;
    let all_params = || {
        [
            ParamDef::typed("name", "string"),
            ParamDef::typed("age", "int"),
            ParamDef::typed("value", "float"),
            default_param(),
        ]
    };
    finder(
        builder
            .add_method("findByAll", Visibility::Public)
            .params(all_params())
            .body(|model: &mut OverloadedModel, args| Ok(find_by_all(model, args))),
    )?;
    finder(
        builder
            .add_method("findByAllDuplicate", Visibility::Public)
            .params(all_params())
            .body(|model: &mut OverloadedModel, args| Ok(find_by_all(model, args))),
    )?;

    builder.uses(overloaded::installer());
    builder.build()
}

magic_host!(OverloadedModel, overloaded_model);
