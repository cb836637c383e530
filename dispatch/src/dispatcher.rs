//! Per-instance handler registries and the dispatch pipeline.

use crate::Magic;
use magic_chain::{link, Chain};
use magic_core::messages::ERR_NOT_BOOTED;
use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult, Phase, Value};
use magic_pattern::PatternRegistry;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A handler run for matching member accesses on host `H`.
pub type Handler<H> = Rc<dyn Fn(&mut H, &mut MagicEvent) -> MagicResult<()>>;

/// Wrap a closure as a handler.
pub fn handler<H>(
    f: impl Fn(&mut H, &mut MagicEvent) -> MagicResult<()> + 'static,
) -> Handler<H> {
    Rc::new(f)
}

/// Which chain of an access a handler joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Before,
    On,
    After,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Before, Stage::On, Stage::After];

    pub fn phase(self) -> Phase {
        match self {
            Stage::Before => Phase::Before,
            Stage::On => Phase::On,
            Stage::After => Phase::After,
        }
    }
}

/// The before/on/after registries for one access kind.
pub struct Triad<H> {
    pub before: PatternRegistry<Handler<H>>,
    pub on: PatternRegistry<Handler<H>>,
    pub after: PatternRegistry<Handler<H>>,
}

impl<H> Default for Triad<H> {
    fn default() -> Self {
        Self {
            before: PatternRegistry::new(),
            on: PatternRegistry::new(),
            after: PatternRegistry::new(),
        }
    }
}

impl<H> Triad<H> {
    pub fn stage(&self, stage: Stage) -> &PatternRegistry<Handler<H>> {
        match stage {
            Stage::Before => &self.before,
            Stage::On => &self.on,
            Stage::After => &self.after,
        }
    }

    pub fn stage_mut(&mut self, stage: Stage) -> &mut PatternRegistry<Handler<H>> {
        match stage {
            Stage::Before => &mut self.before,
            Stage::On => &mut self.on,
            Stage::After => &mut self.after,
        }
    }
}

struct Registries<H> {
    get: Triad<H>,
    set: Triad<H>,
    call: Triad<H>,
}

/// Dispatch state owned by one host instance.
///
/// The registries exist only once the bootstrap installer ran. The
/// extension map holds one value per Rust type and is available at any
/// time, so behaviors can keep per-instance state on the host.
pub struct Dispatcher<H> {
    registries: Option<Registries<H>>,
    extensions: HashMap<TypeId, Box<dyn Any>>,
    phase: Phase,
}

impl<H> Default for Dispatcher<H> {
    fn default() -> Self {
        Self {
            registries: None,
            extensions: HashMap::new(),
            phase: Phase::Idle,
        }
    }
}

impl<H> Dispatcher<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty registries. Run by the bootstrap installer.
    pub(crate) fn install(&mut self) {
        self.registries = Some(Registries {
            get: Triad::default(),
            set: Triad::default(),
            call: Triad::default(),
        });
    }

    pub fn is_booted(&self) -> bool {
        self.registries.is_some()
    }

    /// Where the latest access stands: `Idle` before any access, a stage
    /// phase while handlers run, then `Resolved` or `Errored`.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn triad(&self, kind: AccessKind) -> MagicResult<&Triad<H>> {
        let registries = self
            .registries
            .as_ref()
            .ok_or_else(|| MagicError::configuration(ERR_NOT_BOOTED))?;
        Ok(match kind {
            AccessKind::Get => &registries.get,
            AccessKind::Set => &registries.set,
            AccessKind::Call => &registries.call,
        })
    }

    pub fn triad_mut(&mut self, kind: AccessKind) -> MagicResult<&mut Triad<H>> {
        let registries = self
            .registries
            .as_mut()
            .ok_or_else(|| MagicError::configuration(ERR_NOT_BOOTED))?;
        Ok(match kind {
            AccessKind::Get => &mut registries.get,
            AccessKind::Set => &mut registries.set,
            AccessKind::Call => &mut registries.call,
        })
    }

    pub fn registry(
        &self,
        kind: AccessKind,
        stage: Stage,
    ) -> MagicResult<&PatternRegistry<Handler<H>>> {
        Ok(self.triad(kind)?.stage(stage))
    }

    pub fn registry_mut(
        &mut self,
        kind: AccessKind,
        stage: Stage,
    ) -> MagicResult<&mut PatternRegistry<Handler<H>>> {
        Ok(self.triad_mut(kind)?.stage_mut(stage))
    }

    /// Register a handler under a member name pattern.
    pub fn register(
        &mut self,
        kind: AccessKind,
        stage: Stage,
        pattern: &str,
        handler: Handler<H>,
    ) -> MagicResult<()> {
        tracing::trace!(
            target: "magic::dispatch",
            kind = %kind,
            stage = ?stage,
            pattern,
            "registering handler"
        );
        self.registry_mut(kind, stage)?.on(pattern, [handler]);
        Ok(())
    }

    pub fn extension<T: Any>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// The side table of type `T`, created on first use.
    pub fn extension_mut<T: Any + Default>(&mut self) -> MagicResult<&mut T> {
        self.extensions
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::<T>::default())
            .downcast_mut::<T>()
            .ok_or_else(|| MagicError::handler("extension slot holds a foreign type"))
    }

    pub fn insert_extension<T: Any>(&mut self, value: T) -> Option<T> {
        self.extensions
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }
}

impl<H> fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Dispatcher");
        if let Some(registries) = &self.registries {
            for (label, triad) in [
                ("get", &registries.get),
                ("set", &registries.set),
                ("call", &registries.call),
            ] {
                let counts = Stage::ALL.map(|stage| triad.stage(stage).len());
                debug.field(label, &counts);
            }
        } else {
            debug.field("booted", &false);
        }
        debug.field("extensions", &self.extensions.len()).finish()
    }
}

/// The carry threaded through a handler chain.
struct Dispatch<'h, H> {
    host: &'h mut H,
    event: MagicEvent,
}

fn run_stage<'h, H>(
    handlers: Vec<Handler<H>>,
    carry: Dispatch<'h, H>,
) -> MagicResult<Dispatch<'h, H>> {
    if handlers.is_empty() {
        return Ok(carry);
    }

    let chain: Chain<'_, Dispatch<'h, H>, MagicError> =
        Chain::together(handlers.into_iter().map(|handler| {
            link(move |mut carry: Dispatch<'h, H>| {
                handler(&mut *carry.host, &mut carry.event)?;
                Ok(carry)
            })
        }))
        .until(|carry: &Dispatch<'h, H>| carry.event.is_stopped());

    chain.run(carry)
}

/// Run an event through the host's before, on and after chains.
///
/// Without an `on` handler the host fallback answers, or the access is
/// unhandled. Returns the event output, or `Null` when none was produced.
pub fn dispatch<H: Magic>(host: &mut H, event: MagicEvent) -> MagicResult<Value> {
    let result = run_access(host, event);
    let settled = if result.is_ok() {
        Phase::Resolved
    } else {
        Phase::Errored
    };
    host.dispatcher_mut().enter(settled);
    result
}

fn run_access<H: Magic>(host: &mut H, mut event: MagicEvent) -> MagicResult<Value> {
    let kind = event.access();
    let [before, on, after] = {
        let triad = host.dispatcher().triad(kind)?;
        Stage::ALL.map(|stage| triad.stage(stage).find(event.name()))
    };

    if on.is_empty() {
        if let Some(result) = host.fallback(&event) {
            tracing::trace!(target: "magic::dispatch", name = event.name(), "answered by fallback");
            return result;
        }
        let meta = H::meta()?;
        tracing::debug!(
            target: "magic::dispatch",
            class = meta.name(),
            kind = %kind,
            name = event.name(),
            "unhandled member access"
        );
        return Err(MagicError::unhandled_member(meta.name(), kind, event.name()));
    }

    event.enter(Phase::Before);
    let mut carry = Dispatch { host, event };
    for (stage, handlers) in Stage::ALL.into_iter().zip([before, on, after]) {
        carry.event.enter(stage.phase());
        carry.host.dispatcher_mut().enter(stage.phase());
        let name = carry.event.name().to_string();
        carry = run_stage(handlers, carry).inspect_err(|err| {
            tracing::debug!(
                target: "magic::dispatch",
                name = %name,
                stage = ?stage,
                error = %err,
                "handler failed"
            );
        })?;
    }

    carry.event.enter(Phase::Resolved);
    tracing::trace!(
        target: "magic::dispatch",
        kind = %kind,
        name = carry.event.name(),
        has_output = carry.event.has_output(),
        "resolved"
    );
    Ok(carry.event.into_output())
}
