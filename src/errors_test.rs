use std::path::PathBuf;

use super::*;

#[test]
fn not_found_is_distinguishable_from_io_failure() {
    let not_found = Error::NotFound;
    assert!(not_found.is_not_found());
    assert!(!not_found.is_corruption());

    let io: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(!io.is_not_found());
    assert!(matches!(io, Error::Storage(StorageError::IoError(_))));
}

#[test]
fn corruption_reports_the_offending_path() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let e: Error = StorageError::DataCorruption {
        path: PathBuf::from("/tmp/state.json"),
        source,
    }
    .into();

    assert!(e.is_corruption());
    assert_eq!(e.to_string(), "Data corruption detected at /tmp/state.json");
}

#[test]
fn convert_error_display_names_the_field() {
    let bytes = vec![0xff, 0xfe];
    let source = std::str::from_utf8(&bytes).unwrap_err();
    let e: Error = ConvertError::InvalidUtf8 { field: "key", source }.into();

    assert_eq!(e.to_string(), "invalid utf-8 in key");
}
