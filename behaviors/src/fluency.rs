//! Properties as chainable accessor methods.

use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult, Value};
use magic_dispatch::{handler, Magic, Stage};
use magic_registry::{Fluent, Installer};

/// Install fluency.
///
/// Every property whose visibility the class `Fluent` attribute lists (public
/// only by default) becomes a method: no argument reads it, one argument
/// writes it and returns the host.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("fluency", boot::<H>)
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    let meta = H::meta()?;
    let fluent = meta.class_attribute::<Fluent>().cloned().unwrap_or_default();

    for property in meta
        .properties()
        .iter()
        .filter(|p| fluent.includes(p.visibility))
    {
        tracing::debug!(target: "magic::fluency", property = %property.name, "registering fluent accessor");
        host.dispatcher_mut().register(
            AccessKind::Call,
            Stage::On,
            &property.name,
            handler(move |host: &mut H, event: &mut MagicEvent| {
                let args = event.args().to_vec();
                match args.as_slice() {
                    [] => {
                        let value = (property.read)(host);
                        event.set_output(value);
                    }
                    [value] => {
                        (property.write)(host, value.clone())?;
                        event.set_output(Value::Host);
                    }
                    args => {
                        return Err(MagicError::arity(
                            event.name(),
                            format!("expects zero or one argument, got {}", args.len()),
                        ))
                    }
                }
                Ok(())
            }),
        )?;
    }
    Ok(())
}
