use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

#[test]
fn test_load_options_overrides_only_given_fields() {
    let temp = TempDir::new().expect("temp dir");
    let path = write_file(
        temp.path(),
        "binder.json",
        r#"{
          "checked": true,
          "strictArrayInitializerLengths": false
        }"#,
    );

    let options = load_options(&path).expect("should load options");
    assert!(options.checked);
    assert!(!options.strict_array_initializer_lengths);
    assert!(!options.allow_unsafe);
    assert!(options.report_suggestions);
    assert_eq!(options.max_expression_depth, BinderOptions::default().max_expression_depth);
}

#[test]
fn test_load_options_missing_file_names_the_path() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("absent.json");

    let err = load_options(&path).expect_err("missing file must fail");
    let message = format!("{err:#}");
    assert!(message.contains("failed to read binder options"), "{message}");
    assert!(message.contains("absent.json"), "{message}");
}

#[test]
fn test_load_options_rejects_malformed_json() {
    let temp = TempDir::new().expect("temp dir");
    let path = write_file(temp.path(), "broken.json", r#"{ "checked": "yes" }"#);

    let err = load_options(&path).expect_err("wrong field type must fail");
    assert!(format!("{err:#}").contains("broken.json"));
}

#[test]
fn test_zero_expression_depth_is_rejected() {
    let err = parse_options(r#"{ "maxExpressionDepth": 0 }"#).expect_err("zero depth must fail");
    assert!(err.to_string().contains("maxExpressionDepth"));
    assert_eq!(
        parse_options(r#"{ "maxExpressionDepth": 16 }"#).map(|o| o.max_expression_depth).ok(),
        Some(16)
    );
}
