use super::*;

#[test]
fn test_defaults_when_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (cfg, source) = load_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(cfg.meow.log_level, "info");
    assert_eq!(cfg.pairing.port, 3000);
    assert_eq!(cfg.pairing.path, "/login");
    assert_eq!(cfg.provider.base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.diagnostics.status_command, vec!["neofetch", "--stdout"]);
    assert_eq!(cfg.replies.poll_options, vec!["Suka", "Tidak Suka"]);
    assert_eq!(cfg.replies.poll_max_answers, 1);
}

#[test]
fn test_partial_file_keeps_section_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
            [meow]
            data_dir = "/srv/meow"

            [pairing]
            port = 8080

            [replies]
            greeting = "Hello there"
        "#,
    )
    .unwrap();

    let (cfg, source) = load_file(&path).unwrap();
    assert_eq!(source, ConfigSource::File);
    assert_eq!(cfg.data_dir(), PathBuf::from("/srv/meow"));
    assert_eq!(cfg.pairing.port, 8080);
    assert_eq!(cfg.pairing.host, "0.0.0.0");
    assert_eq!(cfg.replies.greeting, "Hello there");
    assert_eq!(cfg.replies.profanity, Replies::default().profanity);
    assert_eq!(
        cfg.session_db_path(),
        PathBuf::from("/srv/meow/whatsapp_session/whatsapp.db")
    );
    assert_eq!(cfg.logs_dir(), PathBuf::from("/srv/meow/logs"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[pairing\nport = ").unwrap();
    assert!(matches!(load_file(&path), Err(MeowError::Config(_))));
}

#[test]
fn test_env_fills_missing_api_key_only() {
    let mut cfg = Config::default();
    cfg.apply_env_overrides(|name| (name == API_KEY_ENV).then(|| "sk-env".to_string()));
    assert_eq!(cfg.provider.api_key, "sk-env");

    let mut cfg = Config::default();
    cfg.provider.api_key = "sk-file".into();
    cfg.apply_env_overrides(|_| Some("sk-env".to_string()));
    assert_eq!(cfg.provider.api_key, "sk-file");
}

#[test]
fn test_explicit_session_db() {
    let mut cfg = Config::default();
    cfg.whatsapp.session_db = "/tmp/wa.db".into();
    assert_eq!(cfg.session_db_path(), PathBuf::from("/tmp/wa.db"));
}

#[test]
fn test_shellexpand_leaves_absolute_paths() {
    assert_eq!(shellexpand("/var/lib/meow"), "/var/lib/meow");
}

#[test]
fn test_load_reports_missing_file_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let (cfg, source) = load(&path.to_string_lossy()).unwrap();
    assert_eq!(source, ConfigSource::Defaults);
    assert_eq!(cfg.meow.name, "meow");
}
