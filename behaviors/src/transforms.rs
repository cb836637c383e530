//! Transformer pipelines on property reads and writes.

use crate::functions::{apply_transformers, validate};
use magic_core::messages::ERR_PUBLIC_TRANSFORM;
use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult};
use magic_dispatch::{handler, Magic, Stage};
use magic_registry::{Installer, PropertyDef, Transform, Transformer};
use std::rc::Rc;

/// Install the transforms behavior.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("transforms", boot::<H>)
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    let meta = H::meta()?;
    for (property, transform) in meta.each_property::<Transform>() {
        if property.is_public() {
            return Err(MagicError::configuration(format!(
                "{}: {}",
                ERR_PUBLIC_TRANSFORM, property.name
            )));
        }
        validate(meta, &transform.on_get)?;
        validate(meta, &transform.on_set)?;
        register_transform(host, property, transform)?;
    }
    Ok(())
}

fn register_transform<H: Magic>(
    host: &mut H,
    property: &'static PropertyDef<H>,
    transform: &Transform,
) -> MagicResult<()> {
    tracing::debug!(
        target: "magic::transforms",
        property = %property.name,
        on_get = transform.on_get.len(),
        on_set = transform.on_set.len(),
        "registering transform"
    );
    let name = property.name.as_str();
    let dispatcher = host.dispatcher_mut();

    if !transform.on_get.is_empty() {
        let on_get: Rc<[Transformer]> = transform.on_get.clone().into();
        dispatcher.register(
            AccessKind::Get,
            Stage::On,
            name,
            handler(move |host: &mut H, event: &mut MagicEvent| {
                if !event.has_output() {
                    let raw = (property.read)(host);
                    event.set_output(apply_transformers(host, &on_get, raw)?);
                }
                Ok(())
            }),
        )?;
    }

    // Whatever ran before, a read always ends with a value.
    dispatcher.register(
        AccessKind::Get,
        Stage::On,
        name,
        handler(move |host: &mut H, event: &mut MagicEvent| {
            if !event.has_output() {
                event.set_output((property.read)(host));
            }
            Ok(())
        }),
    )?;

    let on_set: Rc<[Transformer]> = transform.on_set.clone().into();
    dispatcher.register(
        AccessKind::Set,
        Stage::On,
        name,
        handler(move |host: &mut H, event: &mut MagicEvent| {
            let value = apply_transformers(host, &on_set, event.input().clone())?;
            (property.write)(host, value.clone())?;
            event.set_output(value);
            Ok(())
        }),
    )
}
