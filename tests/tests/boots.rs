//! Boot sequence integration tests.

use magic_dispatch::boot_plan;
use magic_tests::prelude::*;

mod sequencing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_booters_run_by_descending_priority() {
        // GIVEN booters declared last, middle, first
        // WHEN the host boots
        let host = BootsTest::booted().unwrap();

        // THEN they ran highest priority first
        assert_eq!(host.booted, vec!["first", "middle", "last"]);
    }

    #[test]
    fn test_child_booters_join_inherited_ones() {
        let host = BootsTestChild::booted().unwrap();
        assert_eq!(host.booted, vec!["child", "first", "middle", "last"]);
    }

    #[test]
    fn test_equal_priorities_keep_declaration_order() {
        // GIVEN booters and behaviors tied at priority 0
        let meta = TiedBootsTest::meta().unwrap();

        // WHEN the boot plan is built
        let ids: Vec<_> = boot_plan(meta.installers())
            .unwrap()
            .iter()
            .map(|installer| installer.id)
            .collect();

        // THEN ties run in the order they were declared
        assert_eq!(
            ids,
            vec!["magic", "boot_first", "boot_late", "getters", "boot_early", "transforms"]
        );

        let host = TiedBootsTest::booted().unwrap();
        assert_eq!(host.booted, vec!["first", "late", "early"]);
    }

    #[test]
    fn test_boot_is_idempotent() {
        let mut host = BootsTest::booted().unwrap();
        host.boot_magic().unwrap();
        assert_eq!(host.booted, vec!["first", "middle", "last"]);
    }
}

mod before_boot {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registration_requires_boot() {
        // GIVEN a host that never booted
        let mut host = BootsTest::default();

        // WHEN a handler is registered
        let result = host.on_get("anything", |_, _| Ok(()));

        // THEN registration is a configuration error
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_handlers_after_boot_are_dispatched() {
        let mut host = BootsTest::booted().unwrap();
        host.on_get("boot.*", |host, event| {
            let step = event.name().trim_start_matches("boot.").parse::<usize>().unwrap_or(0);
            event.set_output(host.booted.get(step).copied().unwrap_or("none"));
            Ok(())
        })
        .unwrap();

        assert_eq!(host.get("boot.0").unwrap(), Value::from("first"));
        assert_eq!(host.get("boot.2").unwrap(), Value::from("last"));
        assert_eq!(host.get("boot.9").unwrap(), Value::from("none"));
        assert_eq!(
            host.get("other").unwrap_err(),
            MagicError::unhandled_member("BootsTest", AccessKind::Get, "other")
        );
    }
}

mod phases {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatcher_phase_follows_each_access() {
        // GIVEN a booted host with one failing handler
        let mut host = BootsTest::booted().unwrap();
        assert_eq!(host.dispatcher().phase(), Phase::Idle);
        host.on_get("broken", |_, _| Err(MagicError::handler("boom")))
            .unwrap();
        host.on_get("working", |_, event| {
            event.set_output("ok");
            Ok(())
        })
        .unwrap();

        // WHEN a handler fails
        assert_eq!(host.get("broken").unwrap_err(), MagicError::handler("boom"));
        // THEN the access ends errored
        assert_eq!(host.dispatcher().phase(), Phase::Errored);

        // AND a later access resolves
        assert_eq!(host.get("working").unwrap(), Value::from("ok"));
        assert_eq!(host.dispatcher().phase(), Phase::Resolved);

        // AND an unhandled name errors as well
        assert!(host.get("missing").is_err());
        assert_eq!(host.dispatcher().phase(), Phase::Errored);
    }

    #[test]
    fn test_handlers_see_their_stage() {
        let mut host = BootsTest::booted().unwrap();
        host.on_before_get("staged", |host, event| {
            assert_eq!(event.phase(), Phase::Before);
            assert_eq!(host.dispatcher().phase(), Phase::Before);
            Ok(())
        })
        .unwrap();
        host.on_get("staged", |_, event| {
            event.set_output(format!("{:?}", event.phase()));
            Ok(())
        })
        .unwrap();

        assert_eq!(host.get("staged").unwrap(), Value::from("On"));
    }
}
