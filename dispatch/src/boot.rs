//! Boot sequence: discover, deduplicate, order and run installers.

use crate::Magic;
use magic_chain::Chain;
use magic_core::{MagicError, MagicResult};
use magic_registry::{Installer, Priority};
use std::collections::HashSet;

/// The installer that creates the dispatcher registries.
///
/// It carries `Priority::Dispatcher`, so it runs before every installer a
/// class or behavior declares.
pub fn bootstrap<H: Magic>() -> Installer<H> {
    Installer::new("magic", |host: &mut H| {
        host.dispatcher_mut().install();
        Ok(())
    })
    .with_priority(Priority::Dispatcher)
}

/// Order installers for boot: first discovery of each id wins, then a
/// stable sort by descending priority.
pub fn boot_plan<H: Magic>(declared: &[Installer<H>]) -> MagicResult<Vec<Installer<H>>> {
    let plan: Chain<'_, Vec<Installer<H>>, MagicError> = Chain::new()
        .push(|installers: Vec<Installer<H>>| {
            let mut seen = HashSet::new();
            Ok(installers
                .into_iter()
                .filter(|installer| seen.insert(installer.id))
                .collect())
        })
        .push(|mut installers: Vec<Installer<H>>| {
            installers.sort_by(|a, b| b.priority.cmp(&a.priority));
            Ok(installers)
        });

    let discovered = std::iter::once(bootstrap())
        .chain(declared.iter().copied())
        .collect();
    plan.run(discovered)
}

/// Boot a host: run every installer once, then the host's `booted` hook.
///
/// Booting an already booted host does nothing.
pub fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    let meta = H::meta()?;
    if host.dispatcher().is_booted() {
        tracing::trace!(target: "magic::boot", class = meta.name(), "already booted");
        return Ok(());
    }

    let plan = boot_plan(meta.installers())?;
    tracing::debug!(
        target: "magic::boot",
        class = meta.name(),
        installers = plan.len(),
        "booting"
    );

    for installer in plan {
        tracing::trace!(
            target: "magic::boot",
            class = meta.name(),
            id = installer.id,
            priority = %installer.priority,
            "running installer"
        );
        (installer.run)(host)?;
    }

    host.booted()
}
