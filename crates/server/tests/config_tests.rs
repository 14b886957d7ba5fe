use config::Config;
use identity_admin::config::AppConfig;

fn from_yaml(yaml: &str) -> AppConfig {
    Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()
        .expect("Failed to build config")
        .try_deserialize()
        .expect("Failed to deserialize config")
}

#[test]
fn test_app_config_defaults() {
    let config = from_yaml(r#"database_url: "postgres://localhost/identity""#);

    assert_eq!(config.database_url, "postgres://localhost/identity");
    assert_eq!(config.listen_addr, "0.0.0.0:8080");
    assert_eq!(config.default_page_size, 10);
    assert_eq!(config.max_page_size, 100);
    assert!(config.validate().is_ok());
}

#[test]
fn test_app_config_overrides() {
    let config = from_yaml(
        r#"
database_url: "sqlite::memory:"
listen_addr: "127.0.0.1:9000"
default_page_size: 25
max_page_size: 50
"#,
    );

    assert_eq!(config.listen_addr, "127.0.0.1:9000");
    assert_eq!(config.page_size(None), 25);
    assert_eq!(config.page_size(Some(80)), 50);
}

#[test]
fn test_missing_database_url_fails() {
    let result = Config::builder()
        .add_source(config::File::from_str(
            "listen_addr: \"127.0.0.1:9000\"",
            config::FileFormat::Yaml,
        ))
        .build()
        .expect("Failed to build config")
        .try_deserialize::<AppConfig>();

    assert!(result.is_err());
}

#[test]
fn test_blank_database_url_is_invalid() {
    let config = from_yaml(r#"database_url: "  ""#);
    assert!(config.validate().is_err());
}
