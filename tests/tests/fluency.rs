//! Fluent accessor integration tests.

use magic_tests::prelude::*;

mod public_only {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chained_setters() {
        let mut user = FluentUser::booted().unwrap();
        user.fluent("firstName", args!["Jane"])
            .unwrap()
            .fluent("count", args![1])
            .unwrap();

        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.count, 1);
    }

    #[test]
    fn test_zero_arguments_read() {
        let mut user = FluentUser::booted().unwrap();
        assert_eq!(user.call("firstName", args![]).unwrap(), Value::from("Jean"));
    }

    #[test]
    fn test_protected_properties_are_not_fluent() {
        let mut user = FluentUser::booted().unwrap();
        assert_eq!(
            user.call("email", args!["failure!"]).unwrap_err(),
            MagicError::unhandled_member("FluentUser", AccessKind::Call, "email")
        );
    }

    #[test]
    fn test_bad_arguments() {
        let mut user = FluentUser::booted().unwrap();
        assert!(matches!(
            user.call("count", args!["string"]).unwrap_err(),
            MagicError::InvalidValue { .. }
        ));
        assert!(matches!(
            user.call("count", args![1, 2]).unwrap_err(),
            MagicError::Arity { .. }
        ));
        assert_eq!(user.count, 0);
    }
}

mod widened_visibility {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_protected_and_public() {
        let mut user = ProtectedFluentUser::booted().unwrap();
        user.fluent("firstName", args!["Jane"])
            .unwrap()
            .fluent("email", args!["jane@jean.pants"])
            .unwrap();

        assert_eq!(user.first_name, "Jane");
        assert_eq!(
            user.call("getEmail", args![]).unwrap(),
            Value::from("jane@jean.pants")
        );
    }

    #[test]
    fn test_private_properties_stay_hidden() {
        let mut user = ProtectedFluentUser::booted().unwrap();
        assert!(matches!(
            user.call("count", args![1]).unwrap_err(),
            MagicError::UnhandledMember { .. }
        ));
    }
}
