//! Magic properties.
//!
//! - `MagicProperty` on a non-public property exposes it under its aliases,
//!   with get and set transformers and an access mode.
//! - `MagicProperty` on a method makes it a computed property.
//! - `@property`, `@property-read` and `@property-write` doc tags expose
//!   properties, methods, or values kept in a side table (unbound
//!   properties) coerced to the declared type.
//! - `@method` doc tags expose fluent get/set calls.

use crate::functions::{apply_transformers, validate};
use crate::getters::register_computed;
use magic_core::messages::{ERR_COMPUTED_TRANSFORMS, ERR_PUBLIC_PROPERTY};
use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult, Value};
use magic_dispatch::{handler, Handler, Magic, Stage};
use magic_registry::{
    DocTag, DocTagKind, Installer, MagicProperty, MethodDef, PropertyDef, Transformer,
};
use magic_types::TypeCaster;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Install the properties behavior.
///
/// Runs after the default priority so doc tags can see names other
/// behaviors already registered.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("properties", boot::<H>).with_priority(-1)
}

/// Values of unbound properties, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnboundProperties(pub BTreeMap<String, Value>);

/// The untransformed value of a member: the unbound value if one is stored,
/// else the declared property, else `Null`.
pub fn raw_value<H: Magic>(host: &H, name: &str) -> MagicResult<Value> {
    if let Some(value) = host
        .dispatcher()
        .extension::<UnboundProperties>()
        .and_then(|unbound| unbound.0.get(name))
    {
        return Ok(value.clone());
    }
    Ok(H::meta()?
        .property(name)
        .map(|property| (property.read)(host))
        .unwrap_or_default())
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    let meta = H::meta()?;

    for (property, config) in meta.each_property::<MagicProperty>() {
        register_property(host, property, config.clone())?;
    }
    for (method, config) in meta.each_method::<MagicProperty>() {
        register_method(host, method, config)?;
    }

    for kind in [
        DocTagKind::Property,
        DocTagKind::PropertyRead,
        DocTagKind::PropertyWrite,
    ] {
        for tag in meta.doc_tags_of(kind) {
            register_tagged(host, tag)?;
        }
    }

    register_doc_methods(host, meta.doc_tags_of(DocTagKind::Method))
}

fn register_all<H: Magic>(
    host: &mut H,
    kind: AccessKind,
    names: &[&str],
    handler: Handler<H>,
) -> MagicResult<()> {
    let dispatcher = host.dispatcher_mut();
    for name in names {
        dispatcher.register(kind, Stage::On, name, handler.clone())?;
    }
    Ok(())
}

fn register_property<H: Magic>(
    host: &mut H,
    property: &'static PropertyDef<H>,
    config: MagicProperty,
) -> MagicResult<()> {
    if property.is_public() {
        return Err(MagicError::configuration(format!(
            "{}: {}",
            ERR_PUBLIC_PROPERTY, property.name
        )));
    }

    let meta = H::meta()?;
    validate(meta, &config.on_get)?;
    validate(meta, &config.on_set)?;

    tracing::debug!(
        target: "magic::properties",
        property = %property.name,
        aliases = ?config.aliases,
        access = ?config.access,
        "registering magic property"
    );

    let names = config.names(&property.name);

    if config.access.readable() {
        let on_get: Rc<[Transformer]> = config.on_get.clone().into();
        let read = handler(move |host: &mut H, event: &mut MagicEvent| {
            let raw = event.output_or_else(|| (property.read)(host));
            let value = apply_transformers(host, &on_get, raw)?;
            event.set_output(value);
            Ok(())
        });
        register_all(host, AccessKind::Get, &names, read)?;
    }

    if config.access.writable() {
        let on_set: Rc<[Transformer]> = config.on_set.clone().into();
        let write = handler(move |host: &mut H, event: &mut MagicEvent| {
            let input = event.output_or_else(|| event.input().clone());
            let value = apply_transformers(host, &on_set, input)?;
            (property.write)(host, value.clone())?;
            event.set_output(value);
            Ok(())
        });
        register_all(host, AccessKind::Set, &names, write)?;
    }

    Ok(())
}

fn register_method<H: Magic>(
    host: &mut H,
    method: &'static MethodDef<H>,
    config: &MagicProperty,
) -> MagicResult<()> {
    if !config.on_get.is_empty() || !config.on_set.is_empty() {
        return Err(MagicError::configuration(format!(
            "{}: {}",
            ERR_COMPUTED_TRANSFORMS, method.name
        )));
    }

    let cached = !config.disable_cache && H::meta()?.config().cache_computed;
    register_computed(host, method, &config.names(&method.name), cached)
}

fn is_registered<H: Magic>(host: &H, name: &str) -> bool {
    [AccessKind::Call, AccessKind::Get, AccessKind::Set]
        .into_iter()
        .any(|kind| {
            host.dispatcher()
                .registry(kind, Stage::On)
                .is_ok_and(|registry| registry.has(name))
        })
}

fn register_tagged<H: Magic>(host: &mut H, tag: &DocTag) -> MagicResult<()> {
    let Some(access) = tag.access() else {
        return Ok(());
    };
    let name = tag.name.as_str();

    if is_registered(host, name) {
        tracing::trace!(target: "magic::properties", name, "doc tag already registered");
        return Ok(());
    }

    let meta = H::meta()?;
    let config = MagicProperty::with_access(access);

    if let Some(property) = meta.property(name).filter(|p| !p.is_public()) {
        return register_property(host, property, config);
    }
    if let Some(method) = meta.method(name) {
        return register_method(host, method, &config);
    }
    register_unbound(host, name, tag.type_name.clone(), config)
}

fn register_unbound<H: Magic>(
    host: &mut H,
    name: &str,
    type_name: Option<String>,
    config: MagicProperty,
) -> MagicResult<()> {
    let coerce = H::meta()?.config().coerce_unbound;
    tracing::debug!(
        target: "magic::properties",
        name,
        type_name = ?type_name,
        coerce,
        "registering unbound property"
    );

    if config.access.readable() {
        let on_get: Rc<[Transformer]> = config.on_get.clone().into();
        let key = name.to_string();
        let read = handler(move |host: &mut H, event: &mut MagicEvent| {
            let raw = raw_value(host, &key)?;
            let value = apply_transformers(host, &on_get, raw)?;
            event.set_output(value);
            Ok(())
        });
        register_all(host, AccessKind::Get, &[name], read)?;
    }

    if config.access.writable() {
        let on_set: Rc<[Transformer]> = config.on_set.clone().into();
        let key = name.to_string();
        let write = handler(move |host: &mut H, event: &mut MagicEvent| {
            let mut value = apply_transformers(host, &on_set, event.input().clone())?;
            if let Some(type_name) = type_name.as_deref().filter(|_| coerce) {
                let caster = host.dispatcher_mut().extension_mut::<TypeCaster>()?;
                value = caster.cast(type_name, value)?;
            }
            host.dispatcher_mut()
                .extension_mut::<UnboundProperties>()?
                .0
                .insert(key.clone(), value.clone());
            event.set_output(value);
            Ok(())
        });
        register_all(host, AccessKind::Set, &[name], write)?;
    }

    Ok(())
}

/// Readable and writable shapes declared for one `@method` name.
#[derive(Debug, Clone, Copy, Default)]
struct Shapes {
    get: bool,
    set: bool,
}

fn register_doc_methods<'t, H: Magic>(
    host: &mut H,
    tags: impl Iterator<Item = &'t DocTag>,
) -> MagicResult<()> {
    let mut groups: Vec<(String, Shapes)> = Vec::new();
    for tag in tags {
        let index = match groups.iter().position(|(name, _)| *name == tag.name) {
            Some(index) => index,
            None => {
                groups.push((tag.name.clone(), Shapes::default()));
                groups.len() - 1
            }
        };
        let shapes = &mut groups[index].1;
        shapes.get |= tag.params == 0;
        shapes.set |= tag.params == 1;
    }

    for (name, shapes) in groups {
        tracing::debug!(
            target: "magic::properties",
            name = %name,
            get = shapes.get,
            set = shapes.set,
            "registering doc method"
        );
        let call = handler(move |host: &mut H, event: &mut MagicEvent| {
            let name = event.name().to_string();
            let args = event.args().to_vec();
            match args.as_slice() {
                [value] if shapes.set => {
                    host.set(&name, value.clone())?;
                    event.set_output(Value::Host);
                }
                [] if shapes.get => {
                    let value = host.get(&name)?;
                    event.set_output(value);
                }
                [_] => return Err(MagicError::arity(name, "method is not writable")),
                [] => return Err(MagicError::arity(name, "method is not readable")),
                args => {
                    return Err(MagicError::arity(
                        name,
                        format!("expected zero or one argument, got {}", args.len()),
                    ))
                }
            }
            Ok(())
        });
        register_all(host, AccessKind::Call, &[name.as_str()], call)?;
    }
    Ok(())
}
