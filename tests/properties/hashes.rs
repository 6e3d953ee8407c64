//! Hash identifiers are always safe single path components

use std::path::{Component, Path};

use proptest::prelude::*;

use shipyard::domain::value_objects::{ReleaseLayout, RevisionHash, StaticHash};

proptest! {
    #[test]
    fn parsed_revision_is_one_normal_component(raw in "\\PC{0,20}") {
        if let Ok(hash) = RevisionHash::parse(&raw) {
            let components: Vec<_> = Path::new(hash.as_str()).components().collect();
            prop_assert_eq!(components.len(), 1);
            prop_assert!(matches!(components[0], Component::Normal(_)));
        }
    }

    #[test]
    fn release_path_stays_under_release_root(raw in "[0-9a-zA-Z._/-]{1,16}") {
        let layout = ReleaseLayout::new("/srv/app", "updating", "collected-static", "/srv/app/static", "c-");
        if let Ok(hash) = RevisionHash::parse(&raw) {
            let release = layout.release_path(&hash);
            let release_root = layout.release_root();
            prop_assert_eq!(release.parent(), Some(release_root.as_path()));
        }
    }

    #[test]
    fn static_link_name_keeps_prefix(hex in "[0-9a-f]{7,40}", prefix in "[a-z]{1,3}-") {
        let hash = StaticHash::parse(&hex).unwrap();
        let name = hash.link_name(&prefix);
        prop_assert!(name.starts_with(&prefix));
        prop_assert!(name.ends_with(&hex));
    }
}
