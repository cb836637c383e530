//! Hosts whose behavior configuration is rejected at boot.

use crate::magic_host;
use magic_behaviors::{overloaded, properties, tracks_changes, transforms};
use magic_core::Value;
use magic_dispatch::Dispatcher;
use magic_registry::{
    field, ClassMeta, MagicProperty, Overloaded, RegistryError, TrackChanges, Transform,
    Visibility,
};

macro_rules! data_host {
    ($host:ident) => {
        #[derive(Default)]
        pub struct $host {
            magic: Dispatcher<Self>,
            pub data: String,
        }
    };
}

data_host!(PublicTransformUser);

fn public_transform_user() -> Result<ClassMeta<PublicTransformUser>, RegistryError> {
    let mut builder = ClassMeta::builder("PublicTransformUser");
    builder
        .add_property("data", Visibility::Public)
        .accessors(field!(PublicTransformUser, data))
        .attribute(
            Transform::new()
                .on_set(["json_encode"])
                .on_get(["json_decode"]),
        )
        .done()?;
    builder.uses(transforms::installer());
    builder.build()
}

magic_host!(PublicTransformUser, public_transform_user);

data_host!(PublicTrackedUser);

fn public_tracked_user() -> Result<ClassMeta<PublicTrackedUser>, RegistryError> {
    let mut builder = ClassMeta::builder("PublicTrackedUser");
    builder
        .add_property("data", Visibility::Public)
        .accessors(field!(PublicTrackedUser, data))
        .attribute(TrackChanges)
        .done()?;
    builder.uses(tracks_changes::installer());
    builder.build()
}

magic_host!(PublicTrackedUser, public_tracked_user);

data_host!(PublicMagicPropertyModel);

fn public_magic_property_model() -> Result<ClassMeta<PublicMagicPropertyModel>, RegistryError> {
    let mut builder = ClassMeta::builder("PublicMagicPropertyModel");
    builder
        .add_property("data", Visibility::Public)
        .accessors(field!(PublicMagicPropertyModel, data))
        .attribute(MagicProperty::new())
        .done()?;
    builder.uses(properties::installer());
    builder.build()
}

magic_host!(PublicMagicPropertyModel, public_magic_property_model);

data_host!(ComputedTransformModel);

fn computed_transform_model() -> Result<ClassMeta<ComputedTransformModel>, RegistryError> {
    let mut builder = ClassMeta::builder("ComputedTransformModel");
    builder
        .add_method("shout", Visibility::Protected)
        .body(|model: &mut ComputedTransformModel, _| Ok(Value::from(model.data.clone())))
        .attribute(MagicProperty::new().on_get(["strtoupper"]))
        .done()?;
    builder.uses(properties::installer());
    builder.build()
}

magic_host!(ComputedTransformModel, computed_transform_model);

data_host!(DoublyOverloadedModel);

fn doubly_overloaded_model() -> Result<ClassMeta<DoublyOverloadedModel>, RegistryError> {
    let mut builder = ClassMeta::builder("DoublyOverloadedModel");
    builder
        .add_method("findByName", Visibility::Public)
        .body(|_, _| Ok(Value::Null))
        .attribute(Overloaded::new("find"))
        .attribute(Overloaded::new("search"))
        .done()?;
    builder.uses(overloaded::installer());
    builder.build()
}

magic_host!(DoublyOverloadedModel, doubly_overloaded_model);

data_host!(UnknownTransformerUser);

fn unknown_transformer_user() -> Result<ClassMeta<UnknownTransformerUser>, RegistryError> {
    let mut builder = ClassMeta::builder("UnknownTransformerUser");
    builder
        .add_property("data", Visibility::Protected)
        .accessors(field!(UnknownTransformerUser, data))
        .attribute(Transform::new().on_set(["shuffle"]))
        .done()?;
    builder.uses(transforms::installer());
    builder.build()
}

magic_host!(UnknownTransformerUser, unknown_transformer_user);
