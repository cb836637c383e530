//! Computed property integration tests.

use magic_tests::prelude::*;

mod aliases {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_getter_answers_every_alias() {
        let mut user = AliasUser::booted().unwrap();
        assert_eq!(user.get("firstName").unwrap(), Value::from("Jean"));
        assert_eq!(user.get("first_name").unwrap(), Value::from("Jean"));
    }
}

mod dependencies {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parameters_resolve_from_members() {
        // GIVEN fullName(firstName, getLastName) over a property and a method
        let mut user = DependencyUser::booted().unwrap();

        // THEN the computed value follows the property
        assert_eq!(user.get("fullName").unwrap(), Value::from("Jean Doe"));

        user.set("firstName", "Jane").unwrap();
        assert_eq!(user.get("fullName").unwrap(), Value::from("Jane Doe"));
    }

    #[test]
    fn test_cached_getter_runs_once_per_argument_list() {
        let mut user = DependencyUser::booted().unwrap();

        // WHEN the same arguments are read repeatedly
        for _ in 0..3 {
            assert_eq!(user.get("fullName").unwrap(), Value::from("Jean Doe"));
        }
        // THEN the body ran once
        assert_eq!(user.computed, 1);

        // AND new arguments compute again, old ones still hit
        user.set("firstName", "Jane").unwrap();
        user.get("fullName").unwrap();
        user.set("firstName", "Jean").unwrap();
        user.get("fullName").unwrap();
        assert_eq!(user.computed, 2);
    }

    #[test]
    fn test_nan_argument_still_hits_the_cache() {
        // GIVEN a cached getter whose argument is NaN
        let mut user = RatioUser::booted().unwrap();

        // WHEN it is read repeatedly
        for _ in 0..5 {
            assert!(user.get("percent").unwrap().as_float().unwrap().is_nan());
        }

        // THEN the body ran once and one entry was stored
        assert_eq!(user.computed, 1);
        let cache = user.dispatcher().extension::<ComputeCache>().unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clearing_the_cache_recomputes() {
        let mut user = DependencyUser::booted().unwrap();
        user.get("fullName").unwrap();

        magic_behaviors::getters::clear_cache(&mut user).unwrap();
        user.get("fullName").unwrap();

        assert_eq!(user.computed, 2);
    }

    #[test]
    fn test_caching_disabled_by_configuration() {
        let mut user = StrictUser::booted().unwrap();
        user.get("fullName").unwrap();
        user.get("fullName").unwrap();
        assert_eq!(user.computed, 2);
    }

    #[test]
    fn test_unresolvable_parameter() {
        let mut user = DependencyUser::booted().unwrap();
        assert_eq!(
            user.get("greeting").unwrap_err(),
            MagicError::member_resolution("greeting", "nickname")
        );
    }
}
