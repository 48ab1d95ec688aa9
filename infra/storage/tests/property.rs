use cdmi_storage::ObjectPath;
use proptest::prelude::*;
use std::path::Path;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,11}"
}

proptest! {
    #[test]
    fn parse_splits_on_the_last_separator(
        container in proptest::collection::vec(segment(), 0..5),
        name in segment(),
    ) {
        let raw = container.iter().map(|s| format!("{s}/")).collect::<String>() + &name;
        let path = ObjectPath::parse(&raw).unwrap();

        prop_assert_eq!(path.object_name(), name.as_str());
        prop_assert_eq!(path.to_string(), raw.clone());
        prop_assert_eq!(path.segments().count(), container.len() + 1);

        let trailing = ObjectPath::parse(&format!("{raw}/")).unwrap();
        prop_assert_eq!(trailing, path);
    }

    #[test]
    fn located_files_are_siblings_under_base(
        container in proptest::collection::vec(segment(), 0..5),
        name in segment(),
    ) {
        let base = Path::new("/srv/cdmi");
        let raw = container.iter().map(|s| format!("/{s}")).collect::<String>() + "/" + &name;
        let location = ObjectPath::parse(&raw).unwrap().locate(base);

        prop_assert!(location.container_dir.starts_with(base));
        prop_assert_eq!(location.content_file.parent(), Some(location.container_dir.as_path()));
        prop_assert_eq!(location.metadata_file.parent(), Some(location.container_dir.as_path()));
        let expected_metadata_name = format!(".{name}");
        prop_assert_eq!(
            location.metadata_file.file_name().and_then(|n| n.to_str()),
            Some(expected_metadata_name.as_str())
        );
    }
}
