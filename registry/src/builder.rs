//! ClassMetaBuilder for constructing an immutable ClassMeta.

use crate::{
    Attribute, ClassMeta, DocTag, Installer, MagicConfig, MethodDef, ParamDef, Priority,
    PropertyDef, StaticHandler, TypeHint, Visibility,
};
use magic_core::{Args, MagicError, MagicEvent, MagicResult, Value};
use magic_pattern::PatternRegistry;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during class table construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate property name: {0}")]
    DuplicateProperty(String),

    #[error("Duplicate method name: {0}")]
    DuplicateMethod(String),

    #[error("Property '{0}' has no accessors")]
    MissingAccessor(String),

    #[error("Method '{0}' has no body")]
    MissingBody(String),
}

impl From<RegistryError> for MagicError {
    fn from(err: RegistryError) -> Self {
        MagicError::configuration(err.to_string())
    }
}

/// Builder for constructing an immutable ClassMeta.
pub struct ClassMetaBuilder<H> {
    name: String,
    properties: Vec<PropertyDef<H>>,
    methods: Vec<MethodDef<H>>,
    attributes: Vec<Attribute>,
    doc_tags: Vec<DocTag>,
    installers: Vec<Installer<H>>,
    config: Option<MagicConfig>,
    static_calls: Vec<(String, StaticHandler)>,
    /// Parent declarations, merged after this class's own.
    parents: Vec<ClassMetaBuilder<H>>,
}

impl<H> ClassMetaBuilder<H> {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            doc_tags: Vec::new(),
            installers: Vec::new(),
            config: None,
            static_calls: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Add a property definition.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
    ) -> PropertyBuilder<'_, H> {
        PropertyBuilder {
            builder: self,
            name: name.into(),
            visibility,
            type_hint: TypeHint::Any,
            read: None,
            write: None,
            attributes: Vec::new(),
        }
    }

    /// Add a method definition.
    pub fn add_method(
        &mut self,
        name: impl Into<String>,
        visibility: Visibility,
    ) -> MethodBuilder<'_, H> {
        MethodBuilder {
            builder: self,
            name: name.into(),
            visibility,
            params: Vec::new(),
            body: None,
            attributes: Vec::new(),
        }
    }

    /// Attach a class-level attribute.
    pub fn attribute(&mut self, attribute: impl Into<Attribute>) -> &mut Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Add a parsed class doc tag.
    pub fn doc_tag(&mut self, tag: DocTag) -> &mut Self {
        self.doc_tags.push(tag);
        self
    }

    pub fn doc_tags(&mut self, tags: impl IntoIterator<Item = DocTag>) -> &mut Self {
        self.doc_tags.extend(tags);
        self
    }

    /// Compose a behavior through its installer.
    pub fn uses(&mut self, installer: Installer<H>) -> &mut Self {
        self.installers.push(installer);
        self
    }

    /// Add a class-specific boot procedure.
    pub fn booter(
        &mut self,
        id: &'static str,
        priority: impl Into<Priority>,
        run: fn(&mut H) -> MagicResult<()>,
    ) -> &mut Self {
        self.uses(Installer::new(id, run).with_priority(priority))
    }

    pub fn config(&mut self, config: MagicConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    /// Register a class-scope handler for static calls matching `pattern`.
    pub fn on_static_call(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Fn(&mut MagicEvent) -> MagicResult<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.static_calls.push((pattern.into(), Arc::new(handler)));
        self
    }

    /// Inherit the declarations of a parent class.
    ///
    /// The parent's members, attributes, doc tags and installers are
    /// discovered after this class's own. Members the class declares itself
    /// override parent members of the same name.
    pub fn extends(
        &mut self,
        parent: impl FnOnce(&mut ClassMetaBuilder<H>) -> Result<(), RegistryError>,
    ) -> Result<&mut Self, RegistryError> {
        let mut declared = ClassMetaBuilder::new(self.name.clone());
        parent(&mut declared)?;
        self.parents.push(declared);
        Ok(self)
    }

    /// Build the immutable ClassMeta.
    pub fn build(self) -> Result<ClassMeta<H>, RegistryError> {
        let name = self.name.clone();
        let mut merged = self.flatten();

        // Later entries lose to earlier ones with the same name.
        dedup_by_name(&mut merged.properties, |p| &p.name);
        dedup_by_name(&mut merged.methods, |m| &m.name);

        let mut static_calls = PatternRegistry::new();
        for (pattern, handler) in merged.static_calls {
            static_calls.on(&pattern, [handler]);
        }

        tracing::debug!(
            target: "magic::registry",
            class = %name,
            properties = merged.properties.len(),
            methods = merged.methods.len(),
            installers = merged.installers.len(),
            "built class table"
        );

        Ok(ClassMeta::new(
            name,
            merged.properties,
            merged.methods,
            merged.attributes,
            merged.doc_tags,
            merged.installers,
            merged.config.unwrap_or_default(),
            static_calls,
        ))
    }

    /// Append every parent's declarations after this builder's own.
    fn flatten(mut self) -> Self {
        let parents = std::mem::take(&mut self.parents);
        for parent in parents {
            let parent = parent.flatten();
            self.properties.extend(parent.properties);
            self.methods.extend(parent.methods);
            self.attributes.extend(parent.attributes);
            self.doc_tags.extend(parent.doc_tags);
            self.installers.extend(parent.installers);
            self.static_calls.extend(parent.static_calls);
            if self.config.is_none() {
                self.config = parent.config;
            }
        }
        self
    }
}

fn dedup_by_name<T>(items: &mut Vec<T>, name: impl Fn(&T) -> &String) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(name(item).clone()));
}

/// Builder for a property definition.
pub struct PropertyBuilder<'a, H> {
    builder: &'a mut ClassMetaBuilder<H>,
    name: String,
    visibility: Visibility,
    type_hint: TypeHint,
    read: Option<crate::Reader<H>>,
    write: Option<crate::Writer<H>>,
    attributes: Vec<Attribute>,
}

impl<'a, H> PropertyBuilder<'a, H> {
    /// Declare the property type.
    pub fn typed(mut self, hint: &str) -> Self {
        self.type_hint = TypeHint::parse(hint);
        self
    }

    pub fn reader(mut self, read: impl Fn(&H) -> Value + Send + Sync + 'static) -> Self {
        self.read = Some(Arc::new(read));
        self
    }

    pub fn writer(
        mut self,
        write: impl Fn(&mut H, Value) -> MagicResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.write = Some(Arc::new(write));
        self
    }

    /// Set both accessors, usually from `field!`.
    pub fn accessors<R, W>(self, (read, write): (R, W)) -> Self
    where
        R: Fn(&H) -> Value + Send + Sync + 'static,
        W: Fn(&mut H, Value) -> MagicResult<()> + Send + Sync + 'static,
    {
        self.reader(read).writer(write)
    }

    /// Attach an attribute.
    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Finish building this property.
    pub fn done(self) -> Result<(), RegistryError> {
        if self.builder.properties.iter().any(|p| p.name == self.name) {
            return Err(RegistryError::DuplicateProperty(self.name));
        }
        let (Some(read), Some(write)) = (self.read, self.write) else {
            return Err(RegistryError::MissingAccessor(self.name));
        };

        self.builder.properties.push(PropertyDef {
            name: self.name,
            visibility: self.visibility,
            type_hint: self.type_hint,
            read,
            write,
            attributes: self.attributes,
        });
        Ok(())
    }
}

/// Builder for a method definition.
pub struct MethodBuilder<'a, H> {
    builder: &'a mut ClassMetaBuilder<H>,
    name: String,
    visibility: Visibility,
    params: Vec<ParamDef>,
    body: Option<crate::MethodBody<H>>,
    attributes: Vec<Attribute>,
}

impl<'a, H> MethodBuilder<'a, H> {
    /// Add a parameter.
    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParamDef>) -> Self {
        self.params.extend(params);
        self
    }

    /// The method body. Receives arguments in parameter order.
    pub fn body(
        mut self,
        body: impl Fn(&mut H, Args) -> MagicResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    /// Attach an attribute.
    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Finish building this method.
    pub fn done(self) -> Result<(), RegistryError> {
        if self.builder.methods.iter().any(|m| m.name == self.name) {
            return Err(RegistryError::DuplicateMethod(self.name));
        }
        let Some(body) = self.body else {
            return Err(RegistryError::MissingBody(self.name));
        };

        self.builder.methods.push(MethodDef {
            name: self.name,
            visibility: self.visibility,
            params: self.params,
            body,
            attributes: self.attributes,
        });
        Ok(())
    }
}
