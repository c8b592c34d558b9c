use super::*;

#[test]
fn test_missing_fields_keep_defaults() {
    let options = BinderOptions::from_json_str(r#"{ "checked": true }"#).expect("valid json");
    assert!(options.checked);
    assert!(options.report_suggestions);
    assert!(options.strict_array_initializer_lengths);
    assert_eq!(options.max_expression_depth, MAX_EXPR_BIND_DEPTH);
}

#[test]
fn test_camel_case_names() {
    let options = BinderOptions::from_json_str(
        r#"{ "allowUnsafe": true, "reportSuggestions": false, "maxExpressionDepth": 12, "strictArrayInitializerLengths": false }"#,
    )
    .expect("valid json");
    assert!(options.allow_unsafe);
    assert!(!options.report_suggestions);
    assert_eq!(options.max_expression_depth, 12);
    assert!(!options.strict_array_initializer_lengths);
}

#[test]
fn test_rejects_wrong_field_type() {
    assert!(BinderOptions::from_json_str(r#"{ "checked": "yes" }"#).is_err());
}
