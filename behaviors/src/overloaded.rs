//! Type-directed method overloading.
//!
//! Methods tagged `Overloaded { name }` are grouped by that name. A call to
//! the name runs the single method whose parameters accept the arguments.

use magic_core::messages::ERR_OVERLOAD_COUNT;
use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult};
use magic_dispatch::{handler, Magic, Stage};
use magic_registry::{Installer, MethodDef, Overloaded};

/// Install overloading.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("overloaded", boot::<H>)
}

type Overloads<H> = Vec<(String, Vec<&'static MethodDef<H>>)>;

fn group<H: Magic>() -> MagicResult<Overloads<H>> {
    let meta = H::meta()?;
    let mut groups: Overloads<H> = Vec::new();

    for method in meta.methods() {
        let mut attributes = method.attributes::<Overloaded>();
        let Some(overloaded) = attributes.next() else {
            continue;
        };
        if attributes.next().is_some() {
            return Err(MagicError::configuration(format!(
                "{}: {}",
                ERR_OVERLOAD_COUNT, method.name
            )));
        }

        match groups.iter_mut().find(|(name, _)| *name == overloaded.name) {
            Some((_, methods)) => methods.push(method),
            None => groups.push((overloaded.name.clone(), vec![method])),
        }
    }
    Ok(groups)
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    for (name, methods) in group::<H>()? {
        tracing::debug!(
            target: "magic::overloaded",
            name = %name,
            overloads = methods.len(),
            "registering overloaded method"
        );
        host.dispatcher_mut().register(
            AccessKind::Call,
            Stage::On,
            &name,
            handler(move |host: &mut H, event: &mut MagicEvent| {
                let args = event.args().to_vec();
                let mut matches = methods.iter().filter(|method| method.accepts(&args));

                let method = match (matches.next(), matches.next()) {
                    (None, _) => return Err(MagicError::no_matching_overload(event.name())),
                    (Some(method), None) => *method,
                    (Some(_), Some(_)) => {
                        let candidates = methods
                            .iter()
                            .filter(|method| method.accepts(&args))
                            .map(|method| method.name.clone())
                            .collect();
                        return Err(MagicError::ambiguous_overload(event.name(), candidates));
                    }
                };

                tracing::trace!(
                    target: "magic::overloaded",
                    name = event.name(),
                    method = %method.name,
                    "selected overload"
                );
                let output = method.invoke(host, args)?;
                event.set_output(output);
                Ok(())
            }),
        )?;
    }
    Ok(())
}
