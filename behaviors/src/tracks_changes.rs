//! Per-property change history.
//!
//! `TrackChanges` on the class tracks every protected property; on a
//! property it tracks that property, which must be protected. History starts
//! with the value at boot and grows by one entry per write.

use magic_core::messages::ERR_TRACKED_VISIBILITY;
use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult, Value};
use magic_dispatch::{handler, Magic, Stage};
use magic_registry::{Installer, PropertyDef, TrackChanges, Visibility};
use std::collections::BTreeMap;

/// Install change tracking.
///
/// Runs after the other behaviors so its raw get/set handlers only answer
/// when nothing else produced output.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("tracks_changes", boot::<H>).with_priority(-10)
}

/// Recorded values per tracked property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    history: BTreeMap<String, Vec<Value>>,
}

impl ChangeLog {
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.history.get(name).map(Vec::as_slice)
    }

    pub fn all(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.history
    }

    fn start(&mut self, name: &str, initial: Value) {
        self.history.insert(name.to_string(), vec![initial]);
    }

    fn record(&mut self, name: &str, value: Value) {
        if let Some(values) = self.history.get_mut(name) {
            values.push(value);
        }
    }
}

/// Every protected property under a class-level attribute, otherwise the
/// marked properties, which must be protected.
fn tracked<H: Magic>() -> MagicResult<Vec<&'static PropertyDef<H>>> {
    let meta = H::meta()?;
    let protected = |property: &PropertyDef<H>| property.visibility == Visibility::Protected;

    if meta.has_class_attribute::<TrackChanges>() {
        return Ok(meta.properties().iter().filter(|p| protected(p)).collect());
    }

    let mut tracked = Vec::new();
    for property in meta.properties() {
        if !property.has_attribute::<TrackChanges>() {
            continue;
        }
        if !protected(property) {
            return Err(MagicError::configuration(format!(
                "{}: {}",
                ERR_TRACKED_VISIBILITY, property.name
            )));
        }
        tracked.push(property);
    }
    Ok(tracked)
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    for property in tracked::<H>()? {
        let initial = (property.read)(host);
        tracing::debug!(
            target: "magic::tracks_changes",
            property = %property.name,
            initial = %initial,
            "tracking property"
        );
        host.dispatcher_mut()
            .extension_mut::<ChangeLog>()?
            .start(&property.name, initial);
        register_tracking(host, property)?;
    }
    Ok(())
}

fn register_tracking<H: Magic>(host: &mut H, property: &'static PropertyDef<H>) -> MagicResult<()> {
    let name = property.name.as_str();
    let dispatcher = host.dispatcher_mut();

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

    dispatcher.register(
        AccessKind::Set,
        Stage::On,
        name,
        handler(move |host: &mut H, event: &mut MagicEvent| {
            if !event.has_output() {
                let input = event.input().clone();
                (property.write)(host, input.clone())?;
                event.set_output(input);
            }
            Ok(())
        }),
    )?;

    dispatcher.register(
        AccessKind::Set,
        Stage::After,
        name,
        handler(move |host: &mut H, event: &mut MagicEvent| {
            let value = event.output_or_else(|| event.input().clone());
            tracing::trace!(
                target: "magic::tracks_changes",
                property = %property.name,
                value = %value,
                "recording change"
            );
            host.dispatcher_mut()
                .extension_mut::<ChangeLog>()?
                .record(&property.name, value);
            Ok(())
        }),
    )
}

/// Change history queries and rollback for hosts that track changes.
pub trait TracksChanges: Magic {
    /// History of one property, oldest first. `None` if it is not tracked.
    fn tracked_changes(&self, name: &str) -> Option<Vec<Value>> {
        self.dispatcher()
            .extension::<ChangeLog>()
            .and_then(|log| log.get(name))
            .map(<[Value]>::to_vec)
    }

    fn all_tracked_changes(&self) -> BTreeMap<String, Vec<Value>> {
        self.dispatcher()
            .extension::<ChangeLog>()
            .map(|log| log.all().clone())
            .unwrap_or_default()
    }

    /// The first recorded value.
    fn original_value(&self, name: &str) -> MagicResult<Value> {
        self.tracked_changes(name)
            .and_then(|values| values.into_iter().next())
            .ok_or_else(|| MagicError::not_tracked(name))
    }

    fn has_value_changed(&self, name: &str) -> bool {
        self.tracked_changes(name)
            .is_some_and(|values| values.len() > 1)
    }

    fn has_any_value_changed(&self) -> bool {
        self.all_tracked_changes()
            .values()
            .any(|values| values.len() > 1)
    }

    /// Restore the original value of one property, or of every tracked
    /// property, and drop the later history.
    fn rollback_changes(&mut self, name: Option<&str>) -> MagicResult<()> {
        let names: Vec<String> = match name {
            Some(name) if self.tracked_changes(name).is_none() => {
                return Err(MagicError::not_tracked(name))
            }
            Some(name) => vec![name.to_string()],
            None => self.all_tracked_changes().into_keys().collect(),
        };

        let meta = Self::meta()?;
        for name in names {
            let original = self.original_value(&name)?;
            if let Some(property) = meta.property(&name) {
                (property.write)(self, original)?;
            }
            if let Some(values) = self
                .dispatcher_mut()
                .extension_mut::<ChangeLog>()?
                .history
                .get_mut(&name)
            {
                values.truncate(1);
            }
            tracing::debug!(target: "magic::tracks_changes", property = %name, "rolled back");
        }
        Ok(())
    }

    /// Start over: each tracked property's history becomes its current value.
    fn reset_tracked_changes(&mut self) -> MagicResult<()> {
        for property in tracked::<Self>()? {
            let current = (property.read)(self);
            self.dispatcher_mut()
                .extension_mut::<ChangeLog>()?
                .start(&property.name, current);
        }
        Ok(())
    }
}

impl<H: Magic> TracksChanges for H {}
