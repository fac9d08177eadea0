use super::Config;

#[test]
fn empty_toml_yields_defaults() {
    let config: Config = facet_toml::from_str("").unwrap();
    assert_eq!(config.group_depth, 0);
    assert!(config.expand_responses.is_empty());
}

#[test]
fn toml_overrides_parse() {
    let config: Config = facet_toml::from_str(
        r#"
group_depth = 1
expand_responses = ["200", "default"]
"#,
    )
    .unwrap();
    assert_eq!(config.group_depth, 1);
    assert_eq!(config.expand_responses, vec!["200", "default"]);
}

#[test]
fn expand_all_matches_every_code() {
    let config: Config = facet_toml::from_str(r#"expand_responses = ["all"]"#).unwrap();
    assert!(config.response_expanded("200"));
    assert!(config.response_expanded("default"));
}

#[test]
fn code_matching_ignores_case() {
    let config: Config = facet_toml::from_str(r#"expand_responses = ["2XX"]"#).unwrap();
    assert!(config.response_expanded("2xx"));
    assert!(!config.response_expanded("404"));
}
