use paywall_kernel::config::load_config;
use paywall_kernel::domain::config::ApiConfig;
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let config: ApiConfig = load_config(Some(dir.path().join("absent.toml"))).unwrap();

    assert_eq!(config.server.port, 5555);
    assert_eq!(config.paywall.max_page_views, 3);
    assert_eq!(config.session.cookie_name, "paywall_session");
}

#[test]
fn toml_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        r#"
[server]
port = 8080

[paywall]
max_page_views = 5

[database]
url = "ws://localhost:8000"
credentials = { username = "admin", password = "secret" }
"#,
    )
    .unwrap();

    let config: ApiConfig = load_config(Some(&path)).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.paywall.max_page_views, 5);
    assert_eq!(config.database.url, "ws://localhost:8000");
    assert_eq!(config.database.credentials.as_ref().map(|c| c.username.as_str()), Some("admin"));
    assert_eq!(config.database.namespace, "paywall");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    assert!(load_config::<ApiConfig>(Some(&path)).is_err());
}
