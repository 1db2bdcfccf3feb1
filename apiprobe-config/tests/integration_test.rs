//! Integration tests for apiprobe-config

use apiprobe_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

const CONFIG: &str = r#"
base_url: ${APIPROBE_IT_BASE_URL}
wiremock_url: http://localhost:${APIPROBE_IT_UNSET_PORT}
auth_token: ${APIPROBE_IT_TOKEN}
endpoints:
  base_api:
    users_by_id: /users/{user_id}
    unknown_by_id: /unknown/{resource_id}
stub:
  host_port: 9999
  startup_grace: 0
logging:
  level: debug
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file_with_substitution() {
    let file = write_config(CONFIG);

    with_vars(
        vec![
            ("APIPROBE_IT_BASE_URL", Some("https://reqres.in/api")),
            ("APIPROBE_IT_TOKEN", Some("secret-token")),
            ("APIPROBE_IT_UNSET_PORT", None),
        ],
        || {
            let doc = ConfigLoader::new()
                .with_environment("qa")
                .from_file(file.path())
                .unwrap();

            assert_eq!(doc.source(), Some(file.path()));
            assert_eq!(doc.get_base_url(None).unwrap(), "https://reqres.in/api");
            assert_eq!(doc.auth_token(), Some("secret-token"));
            // Unset variables stay literal
            assert_eq!(
                doc.stub_url().unwrap(),
                "http://localhost:${APIPROBE_IT_UNSET_PORT}"
            );
        },
    );
}

#[test]
fn test_scalar_base_url_serves_every_environment() {
    let doc = ConfigLoader::new()
        .with_environment("staging")
        .from_yaml_str("base_url: https://reqres.in/api\n")
        .unwrap();
    assert_eq!(doc.get_base_url(None).unwrap(), "https://reqres.in/api");
    assert_eq!(doc.get_base_url(Some("dev")).unwrap(), "https://reqres.in/api");
}

#[test]
fn test_missing_base_url() {
    let doc = ConfigLoader::new()
        .with_environment("qa")
        .from_yaml_str("wiremock_url: http://localhost:8080\n")
        .unwrap();
    assert!(matches!(
        doc.get_base_url(None),
        Err(ConfigError::MissingBaseUrl { .. })
    ));
}

#[test]
fn test_typed_settings_and_env_overrides() {
    let file = write_config(CONFIG);

    with_vars(
        vec![
            ("APIPROBE_IT_OVR_LOG_FORMAT", Some("json")),
            ("APIPROBE_IT_OVR_STUB_READINESS_ATTEMPTS", Some("3")),
        ],
        || {
            let doc = ConfigLoader::with_prefix("APIPROBE_IT_OVR")
                .from_file(file.path())
                .unwrap();
            let settings = doc.settings();

            assert_eq!(settings.logging.level, LogLevel::Debug);
            assert_eq!(settings.logging.format, LogFormat::Json);
            assert_eq!(settings.stub.host_port, 9999);
            assert_eq!(settings.stub.startup_grace, Duration::ZERO);
            assert_eq!(settings.stub.readiness_attempts, 3);
            assert_eq!(settings.scanner.max_polls, 120);
        },
    );
}

#[test]
fn test_invalid_env_override_is_rejected() {
    with_vars(vec![("APIPROBE_IT_BAD_LOG_LEVEL", Some("loud"))], || {
        let err = ConfigLoader::with_prefix("APIPROBE_IT_BAD")
            .from_yaml_str("base_url: https://reqres.in/api\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    });
}

#[test]
fn test_test_data_loaded_per_environment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("qa.yaml"),
        "contract:\n  resource_id: 2\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "contract: [1, 2").unwrap();

    let data = TestData::load(dir.path(), Some("qa")).unwrap();
    assert_eq!(data.environment(), "qa");
    assert_eq!(data.get_data("contract", Some("resource_id")).unwrap(), 2);

    assert!(matches!(
        TestData::load(dir.path(), Some("broken")),
        Err(DataError::Parse { .. })
    ));
}

#[test]
fn test_sample_settings_round_trip() {
    let sample = HarnessSettings::generate_sample();
    let parsed: HarnessSettings = serde_yaml::from_str(&sample).unwrap();
    assert!(parsed.validate_all().is_ok());
}
