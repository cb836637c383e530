//! Fixture hosts, one module per behavior.

mod fluent;
mod misconfigured;
mod overloads;
mod tracking;

pub use boots::{BootsTest, BootsTestChild, TiedBootsTest};
pub use fluent::{FluentUser, ProtectedFluentUser};
pub use getters::{AliasUser, DependencyUser, RatioUser, StrictUser};
pub use misconfigured::{
    ComputedTransformModel, DoublyOverloadedModel, PublicMagicPropertyModel, PublicTrackedUser,
    PublicTransformUser, UnknownTransformerUser,
};
pub use overloads::{item, OverloadedModel};
pub use properties::MagicPropertiesModel;
pub use tracking::{
    ClassTrackedUser, PropertyUser, RollbackUser, TransformUser, VisibilityUser,
};
pub use transforms::{
    CustomCallableUser, CustomInstanceCallableUser, OnGetUser, OnSetAndGetUser, OnSetUser,
};
