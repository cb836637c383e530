//! Boot-time configuration errors and class configuration.

use magic_core::messages::{
    ERR_COMPUTED_TRANSFORMS, ERR_OVERLOAD_COUNT, ERR_PUBLIC_PROPERTY, ERR_PUBLIC_TRANSFORM,
    ERR_TRACKED_VISIBILITY,
};
use magic_tests::prelude::*;

/// Boot must fail with a configuration error mentioning `message`.
fn assert_rejected<H: Magic + Default>(message: &str) {
    let mut host = H::default();
    let err = host.boot_magic().unwrap_err();
    assert!(err.is_configuration(), "unexpected error: {}", err);
    assert!(
        err.to_string().contains(message),
        "'{}' does not mention '{}'",
        err,
        message
    );
}

mod rejected {
    use super::*;

    #[test]
    fn test_transform_on_public_property() {
        assert_rejected::<PublicTransformUser>(ERR_PUBLIC_TRANSFORM);
    }

    #[test]
    fn test_tracking_public_property() {
        assert_rejected::<PublicTrackedUser>(ERR_TRACKED_VISIBILITY);
    }

    #[test]
    fn test_magic_property_on_public_property() {
        assert_rejected::<PublicMagicPropertyModel>(ERR_PUBLIC_PROPERTY);
    }

    #[test]
    fn test_transformers_on_computed_property() {
        assert_rejected::<ComputedTransformModel>(ERR_COMPUTED_TRANSFORMS);
    }

    #[test]
    fn test_method_overloading_two_names() {
        assert_rejected::<DoublyOverloadedModel>(ERR_OVERLOAD_COUNT);
    }

    #[test]
    fn test_unknown_transformer() {
        assert_rejected::<UnknownTransformerUser>("shuffle");
    }
}

mod magic_config {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_and_strict_preset() {
        let config = MagicConfig::default();
        assert!(config.coerce_unbound && config.cache_computed && config.public_passthrough);

        let strict = MagicConfig::strict();
        assert!(!strict.coerce_unbound);
        assert!(!strict.cache_computed);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        // GIVEN configuration that only names one switch
        let config: MagicConfig = serde_json::from_str(r#"{"cache_computed": false}"#).unwrap();

        // THEN the rest keep their defaults
        assert_eq!(
            config,
            MagicConfig::new().with_cache_computed(false)
        );
    }

    #[test]
    fn test_class_table_carries_config() {
        assert!(!StrictUser::meta().unwrap().config().cache_computed);
        assert!(DependencyUser::meta().unwrap().config().cache_computed);
    }
}

mod coercion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_caster_matches_unbound_coercion() {
        // Unbound properties coerce through the same casters.
        assert_eq!(magic_types::cast("int", Value::from("1")).unwrap(), Value::Int(1));
        assert!(magic_types::cast("positive-int", Value::from(0)).is_err());

        let mut model = MagicPropertiesModel::booted().unwrap();
        model.set("unboundNumber", "7 dwarves").unwrap();
        assert_eq!(
            model.get("unboundNumber").unwrap(),
            magic_types::cast("int", Value::from("7 dwarves")).unwrap()
        );
    }
}
