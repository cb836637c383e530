use crate::{arg, magic_host};
use magic_behaviors::{properties, tracks_changes};
use magic_dispatch::{Dispatcher, Magic};
use magic_registry::{
    field, ClassMeta, DocTag, MagicProperty, ParamDef, RegistryError, TrackChanges, Visibility,
};

macro_rules! named_user {
    ($host:ident, $first:literal, $last:literal) => {
        pub struct $host {
            magic: Dispatcher<Self>,
            pub first_name: String,
            pub last_name: String,
        }

        impl Default for $host {
            fn default() -> Self {
                Self {
                    magic: Dispatcher::default(),
                    first_name: $first.to_string(),
                    last_name: $last.to_string(),
                }
            }
        }
    };
}

named_user!(VisibilityUser, "Jean", "Doe");

/// Class-level tracking: only the protected `lastName` is tracked.
fn visibility_user() -> Result<ClassMeta<VisibilityUser>, RegistryError> {
    let mut builder = ClassMeta::builder("VisibilityUser");
    builder
        .add_property("firstName", Visibility::Public)
        .accessors(field!(VisibilityUser, first_name))
        .done()?;
    builder
        .add_property("lastName", Visibility::Protected)
        .accessors(field!(VisibilityUser, last_name))
        .done()?;
    builder
        .attribute(TrackChanges)
        .doc_tag(DocTag::property("lastName", "string"))
        .uses(tracks_changes::installer());
    builder.build()
}

magic_host!(VisibilityUser, visibility_user);

named_user!(ClassTrackedUser, "Jean", "Doe");

/// Class-level tracking that also marks a public property.
fn class_tracked_user() -> Result<ClassMeta<ClassTrackedUser>, RegistryError> {
    let mut builder = ClassMeta::builder("ClassTrackedUser");
    builder
        .add_property("firstName", Visibility::Public)
        .accessors(field!(ClassTrackedUser, first_name))
        .attribute(TrackChanges)
        .done()?;
    builder
        .add_property("lastName", Visibility::Protected)
        .accessors(field!(ClassTrackedUser, last_name))
        .done()?;
    builder
        .attribute(TrackChanges)
        .uses(tracks_changes::installer());
    builder.build()
}

magic_host!(ClassTrackedUser, class_tracked_user);

pub struct PropertyUser {
    magic: Dispatcher<Self>,
    pub not_tracked: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for PropertyUser {
    fn default() -> Self {
        Self {
            magic: Dispatcher::default(),
            not_tracked: "Not tracked".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Doe".to_string(),
        }
    }
}

/// Property-level tracking, with a method that writes through the facade.
fn property_user() -> Result<ClassMeta<PropertyUser>, RegistryError> {
    let mut builder = ClassMeta::builder("PropertyUser");
    builder
        .add_property("notTracked", Visibility::Public)
        .accessors(field!(PropertyUser, not_tracked))
        .done()?;
    builder
        .add_property("firstName", Visibility::Protected)
        .accessors(field!(PropertyUser, first_name))
        .attribute(TrackChanges)
        .done()?;
    builder
        .add_property("lastName", Visibility::Protected)
        .accessors(field!(PropertyUser, last_name))
        .attribute(TrackChanges)
        .done()?;
    builder
        .add_method("changeLastName", Visibility::Public)
        .param(ParamDef::typed("lastName", "string"))
        .body(|user: &mut PropertyUser, args| {
            let last_name: String = arg(&args, 0)?;
            user.set("lastName", last_name)?;
            Ok(magic_core::Value::Null)
        })
        .done()?;
    builder.uses(tracks_changes::installer());
    builder.build()
}

magic_host!(PropertyUser, property_user);

named_user!(RollbackUser, "Jean", "Doe");

fn rollback_user() -> Result<ClassMeta<RollbackUser>, RegistryError> {
    let mut builder = ClassMeta::builder("RollbackUser");
    builder
        .add_property("firstName", Visibility::Protected)
        .accessors(field!(RollbackUser, first_name))
        .done()?;
    builder
        .add_property("lastName", Visibility::Protected)
        .accessors(field!(RollbackUser, last_name))
        .done()?;
    builder
        .attribute(TrackChanges)
        .uses(tracks_changes::installer());
    builder.build()
}

magic_host!(RollbackUser, rollback_user);

named_user!(TransformUser, "Jean", "Doe");

/// Tracking composed with magic properties: history records the value
/// after set transformers, reads still apply get transformers.
fn transform_user() -> Result<ClassMeta<TransformUser>, RegistryError> {
    let mut builder = ClassMeta::builder("TransformUser");
    builder
        .add_property("firstName", Visibility::Protected)
        .accessors(field!(TransformUser, first_name))
        .attribute(MagicProperty::new().on_set(["strtoupper"]))
        .done()?;
    builder
        .add_property("lastName", Visibility::Protected)
        .accessors(field!(TransformUser, last_name))
        .attribute(MagicProperty::new().on_get(["strtoupper"]))
        .done()?;
    builder
        .attribute(TrackChanges)
        .doc_tags([
            DocTag::property("firstName", "string"),
            DocTag::property("lastName", "string"),
        ])
        .uses(properties::installer())
        .uses(tracks_changes::installer());
    builder.build()
}

magic_host!(TransformUser, transform_user);
