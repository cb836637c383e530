//! The accessor facade implemented by host types.

use crate::dispatcher::{dispatch, handler};
use crate::{Dispatcher, Stage};
use magic_chain::{link, Chain};
use magic_core::{AccessKind, Args, MagicError, MagicEvent, MagicResult, Phase, Value};
use magic_registry::ClassMeta;

/// A host whose member access is dispatched through handler chains.
///
/// Implementors supply the class table and the dispatcher field; everything
/// else is provided. Hosts call `boot_magic` once after construction.
///
/// ```ignore
/// static META: MetaCell<User> = MetaCell::new();
///
/// impl Magic for User {
///     fn meta() -> MagicResult<&'static ClassMeta<Self>> {
///         ClassMeta::resolve(&META, build_user_meta)
///     }
///     fn dispatcher(&self) -> &Dispatcher<Self> { &self.magic }
///     fn dispatcher_mut(&mut self) -> &mut Dispatcher<Self> { &mut self.magic }
/// }
/// ```
pub trait Magic: Sized + 'static {
    /// The class table, built once per type.
    fn meta() -> MagicResult<&'static ClassMeta<Self>>;

    fn dispatcher(&self) -> &Dispatcher<Self>;

    fn dispatcher_mut(&mut self) -> &mut Dispatcher<Self>;

    /// Runs after every installer.
    fn booted(&mut self) -> MagicResult<()> {
        Ok(())
    }

    /// Answers accesses no `on` handler matches. `None` means unhandled.
    fn fallback(&mut self, _event: &MagicEvent) -> Option<MagicResult<Value>> {
        None
    }

    fn boot_magic(&mut self) -> MagicResult<()> {
        crate::boot(self)
    }

    /// Read a property.
    fn get(&mut self, name: &str) -> MagicResult<Value> {
        let meta = Self::meta()?;
        if meta.config().public_passthrough {
            if let Some(property) = meta.public_property(name) {
                return Ok((property.read)(self));
            }
        }
        dispatch(self, MagicEvent::get(name))
    }

    /// Write a property.
    fn set(&mut self, name: &str, value: impl Into<Value>) -> MagicResult<()> {
        let meta = Self::meta()?;
        let value = value.into();
        if meta.config().public_passthrough {
            if let Some(property) = meta.public_property(name) {
                return (property.write)(self, value);
            }
        }
        dispatch(self, MagicEvent::set(name, value)).map(|_| ())
    }

    /// Call a method.
    fn call(&mut self, name: &str, args: Args) -> MagicResult<Value> {
        let meta = Self::meta()?;
        if meta.config().public_passthrough {
            if let Some(method) = meta.public_method(name) {
                return method.invoke(self, args);
            }
        }
        dispatch(self, MagicEvent::call(name, args))
    }

    /// Call a method that returns the host, for chaining.
    fn fluent(&mut self, name: &str, args: Args) -> MagicResult<&mut Self> {
        match self.call(name, args)? {
            Value::Host => Ok(self),
            other => Err(MagicError::handler(format!(
                "'{}' returned {} instead of the host",
                name,
                other.type_name()
            ))),
        }
    }

    /// Call a class-scope handler. Only the `on` stage exists for static calls.
    fn call_static(name: &str, args: Args) -> MagicResult<Value> {
        let meta = Self::meta()?;
        let handlers = meta.static_calls().find(name);
        if handlers.is_empty() {
            return Err(MagicError::unhandled_member(meta.name(), AccessKind::Call, name));
        }

        let chain: Chain<'_, MagicEvent, MagicError> =
            Chain::together(handlers.into_iter().map(|handler| {
                link(move |mut event: MagicEvent| {
                    handler(&mut event)?;
                    Ok(event)
                })
            }))
            .until(MagicEvent::is_stopped);

        let mut event = MagicEvent::call(name, args);
        event.enter(Phase::On);
        let mut event = chain.run(event)?;
        event.enter(Phase::Resolved);
        Ok(event.into_output())
    }

    /// Whether a get handler is registered under exactly this name, or the
    /// name is a public property.
    fn isset(&self, name: &str) -> bool {
        let public = Self::meta().is_ok_and(|meta| meta.public_property(name).is_some());
        public
            || self
                .dispatcher()
                .registry(AccessKind::Get, Stage::On)
                .is_ok_and(|registry| registry.has(name))
    }

    /// Drop the set handlers registered under exactly this name.
    ///
    /// Returns whether any were removed.
    fn unset(&mut self, name: &str) -> bool {
        match self.dispatcher_mut().registry_mut(AccessKind::Set, Stage::On) {
            Ok(registry) if registry.handles(name) && registry.has(name) => {
                registry.unset(name);
                true
            }
            _ => false,
        }
    }

    fn on_before_get(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Get, Stage::Before, pattern, handler(f))
    }

    fn on_get(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Get, Stage::On, pattern, handler(f))
    }

    fn on_after_get(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Get, Stage::After, pattern, handler(f))
    }

    fn on_before_set(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Set, Stage::Before, pattern, handler(f))
    }

    fn on_set(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Set, Stage::On, pattern, handler(f))
    }

    fn on_after_set(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Set, Stage::After, pattern, handler(f))
    }

    fn on_before_call(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Call, Stage::Before, pattern, handler(f))
    }

    fn on_call(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Call, Stage::On, pattern, handler(f))
    }

    fn on_after_call(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Self, &mut MagicEvent) -> MagicResult<()> + 'static,
    ) -> MagicResult<()> {
        self.dispatcher_mut()
            .register(AccessKind::Call, Stage::After, pattern, handler(f))
    }
}
