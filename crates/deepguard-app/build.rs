//! Exports the workspace `VERSION` file as `DEEPGUARD_VERSION`.

use std::fs;
use std::path::Path;

fn main() {
    let version_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(|root| root.join("VERSION"))
        .expect("crate should live two levels below the workspace root");
    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .unwrap_or_else(|error| panic!("cannot read {}: {error}", version_path.display()));
    let version = version.trim();
    assert!(!version.is_empty(), "VERSION must not be blank");
    assert!(
        version.split('.').count() == 3,
        "VERSION must be MAJOR.MINOR.PATCH, got '{version}'"
    );

    println!("cargo:rustc-env=DEEPGUARD_VERSION={version}");
}
