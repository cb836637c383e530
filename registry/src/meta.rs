//! The ClassMeta - immutable per-class member table.

use crate::{
    Attribute, AttributeKind, ClassMetaBuilder, DocTag, DocTagKind, Installer, MagicConfig,
    ParamDef, RegistryError, TypeHint, Visibility,
};
use magic_core::{Args, MagicEvent, MagicResult, Value};
use magic_pattern::PatternRegistry;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Reads a property from the host.
pub type Reader<H> = Arc<dyn Fn(&H) -> Value + Send + Sync>;
/// Writes a property on the host.
pub type Writer<H> = Arc<dyn Fn(&mut H, Value) -> MagicResult<()> + Send + Sync>;
/// Invokes a method with already resolved arguments.
pub type MethodBody<H> = Arc<dyn Fn(&mut H, Args) -> MagicResult<Value> + Send + Sync>;
/// Class-scope handler for static calls.
pub type StaticHandler = Arc<dyn Fn(&mut MagicEvent) -> MagicResult<()> + Send + Sync>;

/// Storage for a lazily built class table.
pub type MetaCell<H> = OnceLock<Result<ClassMeta<H>, RegistryError>>;

/// A declared property.
pub struct PropertyDef<H> {
    pub name: String,
    pub visibility: Visibility,
    pub type_hint: TypeHint,
    pub read: Reader<H>,
    pub write: Writer<H>,
    pub attributes: Vec<Attribute>,
}

impl<H> PropertyDef<H> {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Attributes of kind `A` attached to this property.
    pub fn attributes<A: AttributeKind>(&self) -> impl Iterator<Item = &A> {
        self.attributes.iter().filter_map(A::from_attribute)
    }

    pub fn has_attribute<A: AttributeKind>(&self) -> bool {
        self.attributes::<A>().next().is_some()
    }
}

impl<H> Clone for PropertyDef<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            visibility: self.visibility,
            type_hint: self.type_hint.clone(),
            read: Arc::clone(&self.read),
            write: Arc::clone(&self.write),
            attributes: self.attributes.clone(),
        }
    }
}

impl<H> fmt::Debug for PropertyDef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("type_hint", &self.type_hint)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// A declared method.
pub struct MethodDef<H> {
    pub name: String,
    pub visibility: Visibility,
    pub params: Vec<ParamDef>,
    pub body: MethodBody<H>,
    pub attributes: Vec<Attribute>,
}

impl<H> MethodDef<H> {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }

    /// Number of parameters without a default value.
    pub fn required_params(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.optional && !p.variadic)
            .count()
    }

    /// Invoke the body.
    pub fn invoke(&self, host: &mut H, args: Args) -> MagicResult<Value> {
        (self.body)(host, args)
    }

    /// Whether the arguments fit this method's parameter list.
    ///
    /// The argument count must lie between the required and declared counts
    /// (or above the required count for variadic methods), and every
    /// argument must satisfy the parameter it lands on.
    pub fn accepts(&self, args: &[Value]) -> bool {
        let passed = args.len();
        let declared = self.params.len();
        if passed < self.required_params() {
            return false;
        }
        if passed > declared && !self.is_variadic() {
            return false;
        }

        args.iter().enumerate().all(|(index, arg)| {
            let param = self.params.get(index).or_else(|| self.params.last());
            param.is_some_and(|p| p.accepts(arg))
        })
    }

    pub fn attributes<A: AttributeKind>(&self) -> impl Iterator<Item = &A> {
        self.attributes.iter().filter_map(A::from_attribute)
    }

    pub fn has_attribute<A: AttributeKind>(&self) -> bool {
        self.attributes::<A>().next().is_some()
    }
}

impl<H> Clone for MethodDef<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            visibility: self.visibility,
            params: self.params.clone(),
            body: Arc::clone(&self.body),
            attributes: self.attributes.clone(),
        }
    }
}

impl<H> fmt::Debug for MethodDef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// The class table provides member lookup for one host type.
/// It is immutable after construction.
pub struct ClassMeta<H> {
    name: String,
    properties: Vec<PropertyDef<H>>,
    methods: Vec<MethodDef<H>>,
    attributes: Vec<Attribute>,
    doc_tags: Vec<DocTag>,
    installers: Vec<Installer<H>>,
    config: MagicConfig,
    static_calls: PatternRegistry<StaticHandler>,
}

impl<H> ClassMeta<H> {
    /// Create a table (use ClassMetaBuilder for construction).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        properties: Vec<PropertyDef<H>>,
        methods: Vec<MethodDef<H>>,
        attributes: Vec<Attribute>,
        doc_tags: Vec<DocTag>,
        installers: Vec<Installer<H>>,
        config: MagicConfig,
        static_calls: PatternRegistry<StaticHandler>,
    ) -> Self {
        Self {
            name,
            properties,
            methods,
            attributes,
            doc_tags,
            installers,
            config,
            static_calls,
        }
    }

    pub fn builder(name: impl Into<String>) -> ClassMetaBuilder<H> {
        ClassMetaBuilder::new(name)
    }

    /// Resolve a lazily built table stored in a static cell.
    pub fn resolve(
        cell: &'static MetaCell<H>,
        init: impl FnOnce() -> Result<ClassMeta<H>, RegistryError>,
    ) -> MagicResult<&'static ClassMeta<H>>
    where
        H: 'static,
    {
        cell.get_or_init(init).as_ref().map_err(|err| err.clone().into())
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MagicConfig {
        &self.config
    }

    // ==================== Member Lookups ====================

    pub fn property(&self, name: &str) -> Option<&PropertyDef<H>> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef<H>> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// A public property, if `name` is one.
    pub fn public_property(&self, name: &str) -> Option<&PropertyDef<H>> {
        self.property(name).filter(|p| p.is_public())
    }

    /// A public method, if `name` is one.
    pub fn public_method(&self, name: &str) -> Option<&MethodDef<H>> {
        self.method(name).filter(|m| m.is_public())
    }

    pub fn properties(&self) -> &[PropertyDef<H>] {
        &self.properties
    }

    pub fn methods(&self) -> &[MethodDef<H>] {
        &self.methods
    }

    // ==================== Attribute Lookups ====================

    /// Every (property, attribute) pair with an attribute of kind `A`.
    pub fn each_property<A: AttributeKind>(&self) -> impl Iterator<Item = (&PropertyDef<H>, &A)> {
        self.properties
            .iter()
            .flat_map(|prop| prop.attributes::<A>().map(move |attr| (prop, attr)))
    }

    /// Every (method, attribute) pair with an attribute of kind `A`.
    pub fn each_method<A: AttributeKind>(&self) -> impl Iterator<Item = (&MethodDef<H>, &A)> {
        self.methods
            .iter()
            .flat_map(|method| method.attributes::<A>().map(move |attr| (method, attr)))
    }

    /// The first class-level attribute of kind `A`.
    pub fn class_attribute<A: AttributeKind>(&self) -> Option<&A> {
        self.attributes.iter().find_map(A::from_attribute)
    }

    pub fn has_class_attribute<A: AttributeKind>(&self) -> bool {
        self.class_attribute::<A>().is_some()
    }

    // ==================== Doc Tags ====================

    pub fn doc_tags(&self) -> &[DocTag] {
        &self.doc_tags
    }

    pub fn doc_tags_of(&self, kind: DocTagKind) -> impl Iterator<Item = &DocTag> {
        self.doc_tags.iter().filter(move |tag| tag.kind == kind)
    }

    /// The declared doc type of a property tag.
    pub fn doc_type(&self, name: &str) -> Option<&str> {
        self.doc_tags
            .iter()
            .filter(|tag| tag.kind != DocTagKind::Method)
            .find(|tag| tag.name == name)
            .and_then(|tag| tag.type_name.as_deref())
    }

    // ==================== Boot & Statics ====================

    /// Installers in discovery order: own first, then inherited.
    pub fn installers(&self) -> &[Installer<H>] {
        &self.installers
    }

    pub fn static_calls(&self) -> &PatternRegistry<StaticHandler> {
        &self.static_calls
    }
}

impl<H> fmt::Debug for ClassMeta<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMeta")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("attributes", &self.attributes)
            .field("doc_tags", &self.doc_tags)
            .field("installers", &self.installers)
            .field("config", &self.config)
            .field("static_calls", &self.static_calls)
            .finish()
    }
}
