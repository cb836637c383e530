//! Change tracking integration tests.

use magic_tests::prelude::*;

fn strings(values: &[&str]) -> Option<Vec<Value>> {
    Some(values.iter().map(|v| Value::from(*v)).collect())
}

mod class_level {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tracks_protected_properties_only() {
        // GIVEN a class-level attribute over a public and a protected property
        let mut user = VisibilityUser::booted().unwrap();

        // WHEN both are written
        user.set("firstName", "Jane").unwrap();
        user.set("lastName", "Smith").unwrap();

        // THEN only the protected one has a history
        assert_eq!(user.tracked_changes("lastName"), strings(&["Doe", "Smith"]));
        assert_eq!(user.tracked_changes("firstName"), None);
        assert_eq!(user.first_name, "Jane");
    }

    #[test]
    fn test_class_attribute_ignores_marked_public_property() {
        // GIVEN a class-level attribute and a public property also marked
        // WHEN the host boots
        let mut user = ClassTrackedUser::booted().unwrap();
        user.set("firstName", "Jane").unwrap();
        user.set("lastName", "Smith").unwrap();

        // THEN boot succeeds and only the protected property is tracked
        assert_eq!(user.tracked_changes("firstName"), None);
        assert_eq!(user.tracked_changes("lastName"), strings(&["Doe", "Smith"]));
    }

    #[test]
    fn test_history_grows_by_one_per_write() {
        let mut user = RollbackUser::booted().unwrap();
        let writes = ["Jane", "Janet", "Joan"];
        for name in writes {
            user.set("firstName", name).unwrap();
        }

        let history = user.tracked_changes("firstName").unwrap();
        assert_eq!(history.len(), writes.len() + 1);
        assert_eq!(user.original_value("firstName").unwrap(), Value::from("Jean"));
        assert!(user.has_value_changed("firstName"));
        assert!(!user.has_value_changed("lastName"));
        assert!(user.has_any_value_changed());
    }
}

mod property_level {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tracks_marked_properties() {
        let mut user = PropertyUser::booted().unwrap();
        user.set("notTracked", "Changed").unwrap();
        user.set("firstName", "Jane").unwrap();
        user.set("lastName", "Smith").unwrap();

        assert_eq!(user.get("firstName").unwrap(), Value::from("Jane"));
        assert_eq!(user.get("lastName").unwrap(), Value::from("Smith"));
        assert_eq!(user.tracked_changes("notTracked"), None);
        assert_eq!(user.tracked_changes("firstName"), strings(&["Jean", "Jane"]));
        assert_eq!(user.tracked_changes("lastName"), strings(&["Doe", "Smith"]));

        // WHEN a host method writes through the facade
        user.call("changeLastName", args!["Johnson"]).unwrap();

        // THEN the write is tracked as well
        assert_eq!(user.get("lastName").unwrap(), Value::from("Johnson"));
        assert_eq!(
            user.tracked_changes("lastName"),
            strings(&["Doe", "Smith", "Johnson"])
        );
        assert_eq!(user.all_tracked_changes().len(), 2);
    }
}

mod rollback {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rollback_one_then_all() {
        let mut user = RollbackUser::booted().unwrap();
        user.set("firstName", "Jane").unwrap();
        user.set("lastName", "Smith").unwrap();

        user.rollback_changes(Some("firstName")).unwrap();
        assert_eq!(user.get("firstName").unwrap(), Value::from("Jean"));
        assert_eq!(user.get("lastName").unwrap(), Value::from("Smith"));
        assert_eq!(user.tracked_changes("firstName"), strings(&["Jean"]));

        user.rollback_changes(None).unwrap();
        assert_eq!(user.get("firstName").unwrap(), Value::from("Jean"));
        assert_eq!(user.get("lastName").unwrap(), Value::from("Doe"));
        assert!(!user.has_any_value_changed());
    }

    #[test]
    fn test_rollback_of_untracked_name() {
        let mut user = RollbackUser::booted().unwrap();
        assert_eq!(
            user.rollback_changes(Some("nickname")).unwrap_err(),
            MagicError::not_tracked("nickname")
        );
        assert_eq!(
            user.original_value("nickname").unwrap_err(),
            MagicError::not_tracked("nickname")
        );
    }

    #[test]
    fn test_reset_rebaselines_history() {
        // GIVEN a changed property
        let mut user = RollbackUser::booted().unwrap();
        user.set("firstName", "Jane").unwrap();
        user.set("firstName", "Joan").unwrap();

        // WHEN tracking is reset
        user.reset_tracked_changes().unwrap();

        // THEN the current value is the new original
        assert_eq!(user.tracked_changes("firstName"), strings(&["Joan"]));
        assert_eq!(user.original_value("firstName").unwrap(), Value::from("Joan"));
        assert!(!user.has_any_value_changed());
    }
}

mod with_properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_records_transformed_writes() {
        let mut user = TransformUser::booted().unwrap();
        user.set("firstName", "Jane").unwrap();
        user.set("lastName", "Smith").unwrap();

        assert_eq!(user.get("firstName").unwrap(), Value::from("JANE"));
        assert_eq!(user.get("lastName").unwrap(), Value::from("SMITH"));
        assert_eq!(user.tracked_changes("firstName"), strings(&["Jean", "JANE"]));
        assert_eq!(user.tracked_changes("lastName"), strings(&["Doe", "Smith"]));
    }
}
