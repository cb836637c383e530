//! Computed properties backed by methods.
//!
//! `Getter` exposes a method under its aliases. Parameters of the method are
//! filled from host members of the same name. Results are memoized per
//! argument list when caching applies.

use magic_core::{AccessKind, MagicError, MagicEvent, MagicResult, Value};
use magic_dispatch::{handler, Magic, Stage};
use magic_registry::{Getter, Installer, MethodDef};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Install the getters behavior.
pub fn installer<H: Magic>() -> Installer<H> {
    Installer::new("getters", boot::<H>)
}

fn boot<H: Magic>(host: &mut H) -> MagicResult<()> {
    let meta = H::meta()?;
    for (method, getter) in meta.each_method::<Getter>() {
        let cached = getter.use_cache && meta.config().cache_computed;
        register_computed(host, method, &getter.names(&method.name), cached)?;
    }
    Ok(())
}

struct CacheEntry {
    class: String,
    method: String,
    args: Vec<Value>,
    value: Value,
}

impl CacheEntry {
    fn matches(&self, class: &str, method: &str, args: &[Value]) -> bool {
        self.class == class
            && self.method == method
            && self.args.len() == args.len()
            && self.args.iter().zip(args).all(|(a, b)| a.same_as(b))
    }
}

/// Memoized results of computed properties, keyed by class, method and the
/// resolved arguments.
///
/// Keys are bucketed by structural hash and compared with `Value::same_as`.
#[derive(Default)]
pub struct ComputeCache {
    buckets: HashMap<u64, Vec<CacheEntry>>,
}

impl ComputeCache {
    fn hash_key(class: &str, method: &str, args: &[Value]) -> u64 {
        let mut hasher = DefaultHasher::new();
        class.hash(&mut hasher);
        method.hash(&mut hasher);
        args.hash(&mut hasher);
        hasher.finish()
    }

    pub fn lookup(&self, class: &str, method: &str, args: &[Value]) -> Option<&Value> {
        self.buckets
            .get(&Self::hash_key(class, method, args))?
            .iter()
            .find(|entry| entry.matches(class, method, &args))
            .map(|entry| &entry.value)
    }

    pub fn store(&mut self, class: &str, method: &str, args: Vec<Value>, value: Value) {
        let bucket = self
            .buckets
            .entry(Self::hash_key(class, method, &args))
            .or_default();
        match bucket
            .iter_mut()
            .find(|entry| entry.matches(class, method, &args))
        {
            Some(entry) => entry.value = value,
            None => bucket.push(CacheEntry {
                class: class.to_string(),
                method: method.to_string(),
                args,
                value,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

/// Drop every memoized computed value of a host.
pub fn clear_cache<H: Magic>(host: &mut H) -> MagicResult<()> {
    host.dispatcher_mut().extension_mut::<ComputeCache>()?.clear();
    Ok(())
}

/// Register `method` as a computed property under each of `names`.
pub(crate) fn register_computed<H: Magic>(
    host: &mut H,
    method: &'static MethodDef<H>,
    names: &[&str],
    cached: bool,
) -> MagicResult<()> {
    let compute = handler(move |host: &mut H, event: &mut MagicEvent| {
        let args = resolve_arguments(host, method)?;
        let value = if cached {
            compute_cached(host, method, args)?
        } else {
            method.invoke(host, args)?
        };
        event.set_output(value);
        Ok(())
    });

    for name in names {
        tracing::debug!(
            target: "magic::getters",
            method = %method.name,
            name,
            cached,
            "registering computed property"
        );
        host.dispatcher_mut()
            .register(AccessKind::Get, Stage::On, name, compute.clone())?;
    }
    Ok(())
}

fn compute_cached<H: Magic>(
    host: &mut H,
    method: &MethodDef<H>,
    args: Vec<Value>,
) -> MagicResult<Value> {
    let class = H::meta()?.name();
    let hit = host
        .dispatcher()
        .extension::<ComputeCache>()
        .and_then(|cache| cache.lookup(class, &method.name, &args))
        .cloned();
    if let Some(value) = hit {
        tracing::trace!(target: "magic::getters", class, method = %method.name, "cache hit");
        return Ok(value);
    }

    tracing::trace!(target: "magic::getters", class, method = %method.name, "cache miss");
    let value = method.invoke(host, args.clone())?;
    host.dispatcher_mut()
        .extension_mut::<ComputeCache>()?
        .store(class, &method.name, args, value.clone());
    Ok(value)
}

fn resolve_arguments<H: Magic>(host: &mut H, method: &MethodDef<H>) -> MagicResult<Vec<Value>> {
    method
        .params
        .iter()
        .map(|param| resolve_argument(host, &method.name, &param.name))
        .collect()
}

fn handles<H: Magic>(host: &H, kind: AccessKind, name: &str) -> bool {
    host.dispatcher()
        .registry(kind, Stage::On)
        .is_ok_and(|registry| registry.handles(name))
}

/// Properties and gettable names first, then zero-argument methods and
/// callable names.
fn resolve_argument<H: Magic>(host: &mut H, member: &str, name: &str) -> MagicResult<Value> {
    let meta = H::meta()?;

    if let Some(property) = meta.property(name) {
        return Ok((property.read)(host));
    }
    if handles(host, AccessKind::Get, name) {
        return host.get(name);
    }
    if let Some(method) = meta.method(name).filter(|m| m.required_params() == 0) {
        return method.invoke(host, Vec::new());
    }
    if handles(host, AccessKind::Call, name) {
        return host.call(name, Vec::new());
    }

    Err(MagicError::member_resolution(member, name))
}
