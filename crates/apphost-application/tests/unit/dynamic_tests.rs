//! Shared-library source tests

use apphost_application::ComponentSource;
use apphost_application::catalog::DynamicLibrarySource;
use apphost_domain::error::Error;

#[test]
fn test_missing_library_is_a_source_load_error() {
    let source = DynamicLibrarySource::new("/nonexistent/libweather.so");

    let err = source.load().unwrap_err();

    assert!(matches!(err, Error::SourceLoad { ref source_name, .. } if source_name == "libweather"));
    assert!(!source.is_loaded());
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_library_is_opened_once_across_passes() {
    // The C library is always present but exports no component entry point
    let source = DynamicLibrarySource::new("libc.so.6");

    for _ in 0..3 {
        let err = source.load().unwrap_err().to_string();
        assert!(err.contains("missing entry point"), "unexpected error: {err}");
        assert!(source.is_loaded());
    }
}

#[test]
fn test_scan_of_missing_directory_yields_no_sources() {
    let sources = DynamicLibrarySource::scan_directory(std::path::Path::new("/nonexistent/plugins"))
        .unwrap();
    assert!(sources.is_empty());
}
