use proptest::prelude::*;
use save_core::SlotName;
use save_runtime::PathResolver;
use tempfile::TempDir;

proptest! {
    /// Whatever the user types, every file of the resolved slot sits directly
    /// inside the save root.
    #[test]
    fn resolved_paths_never_leave_root(raw in "\\PC{0,64}") {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();

        let paths = resolver.resolve_strict(&SlotName::sanitize(&raw)).unwrap();

        for path in paths.all() {
            prop_assert_eq!(path.parent(), Some(resolver.root()));
        }
        prop_assert!(resolver.check_containment(&paths).is_ok());
    }

    #[test]
    fn traversal_fragments_never_leave_root(
        parts in prop::collection::vec(
            prop_oneof!["\\.\\.", "/", "\\\\", "[a-z]{1,4}", "\\."],
            0..12,
        )
    ) {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();

        let paths = resolver.resolve_strict(&SlotName::sanitize(&parts.concat())).unwrap();

        prop_assert!(resolver.check_containment(&paths).is_ok());
    }
}
