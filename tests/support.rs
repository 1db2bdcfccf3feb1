//! Shared fixtures for the integration suites
//!
//! Provides an on-disk workspace holding a configuration document and a
//! `qa` data file, a wiremock emulation of the reqres API, a wiremock
//! emulation of the stub server admin protocol and a container runtime
//! that never touches Docker.

use anyhow::Result;
use apiprobe_session::SessionBuilder;
use apiprobe_stub::{ContainerRuntime, ContainerSpec, RequestPattern, RuntimeError, StubMapping};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, Respond, ResponseTemplate};

/// Test data for the `qa` environment
pub const QA_DATA: &str = r#"
users:
  valid_user:
    email: eve.holt@reqres.in
    password: cityslicka
  invalid_user:
    email: peter@klaven
  new_user:
    name: morpheus
    job: leader
contract:
  user_ids: [1, 2, 3]
  resource_id: 2
  invalid_email_user: 23
  missing_user_id: 9999
"#;

/// Id the emulated API assigns to created users
pub const CREATED_USER_ID: &str = "517";

/// Configuration document pointing at the given API and stub server
pub fn config_yaml(api_url: &str, stub_url: &str) -> String {
    format!(
        r#"
base_urls:
  qa: {api_url}
wiremock_url: {stub_url}
auth_credentials:
  username: eve.holt@reqres.in
  password: cityslicka
endpoints:
  auth:
    login: /login
  base_api:
    users: /users
    users_by_id: /users/{{user_id}}
    users_page: /users?page={{page}}
    create_user: /users
    delete_user: /users/{{user_id}}
    unknown: /unknown
    unknown_by_id: /unknown/{{resource_id}}
  stub:
    mocked_user: /mocked-user
    admin_dashboard: /admin/dashboard
logging:
  level: debug
stub:
  startup_grace: 0
  readiness_attempts: 2
  readiness_interval: 0
"#
    )
}

/// Temporary directory laid out like a harness checkout
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Workspace with a config document for `api_url`/`stub_url` and `qa` data
    pub fn new(api_url: &str, stub_url: &str) -> Result<Self> {
        Self::with_files(Some(&config_yaml(api_url, stub_url)), Some(QA_DATA))
    }

    /// Workspace with explicit file contents; `None` leaves the file out
    pub fn with_files(config: Option<&str>, qa_data: Option<&str>) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("config"))?;
        std::fs::create_dir_all(dir.path().join("data"))?;

        if let Some(config) = config {
            std::fs::write(dir.path().join("config").join("config.yaml"), config)?;
        }
        if let Some(data) = qa_data {
            std::fs::write(dir.path().join("data").join("qa.yaml"), data)?;
        }

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config").join("config.yaml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    /// Write a file relative to the workspace root
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let target = self.path().join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, content)?;
        Ok(target)
    }

    /// Session builder wired to this workspace for the `qa` environment
    pub fn session(&self) -> SessionBuilder {
        apiprobe_logging::init_test_tracing();
        SessionBuilder::new()
            .config_path(self.config_path())
            .data_dir(self.data_dir())
            .environment("qa")
            .work_dir(self.path())
            .with_logging(false)
    }
}

/// A reqres user record
pub fn reqres_user(id: u64) -> Value {
    json!({
        "id": id,
        "email": format!("user{}@reqres.in", id),
        "first_name": "Janet",
        "last_name": "Weaver",
        "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", id)
    })
}

/// A reqres colour resource
pub fn reqres_resource(id: u64) -> Value {
    json!({
        "id": id,
        "name": "fuchsia rose",
        "year": 2000 + id,
        "color": "#C74375",
        "pantone_value": "17-2031"
    })
}

/// Emulation of the reqres API surface the suites exercise
pub async fn reqres_emulator() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({"password": "cityslicka"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "QpwL5tke4Pnpja7X4"})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Missing password"})))
        .mount(&server)
        .await;

    let page: Vec<Value> = (7..=12).map(reqres_user).collect();
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": page
        })))
        .mount(&server)
        .await;

    for id in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/users/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": reqres_user(id)})))
            .mount(&server)
            .await;
    }

    let mut broken = reqres_user(23);
    broken["email"] = json!("not-an-email");
    Mock::given(method("GET"))
        .and(path("/users/23"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": broken})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "morpheus",
            "job": "leader",
            "id": CREATED_USER_ID,
            "createdAt": "2026-10-19T09:00:00.000Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/users/{}", CREATED_USER_ID)))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/unknown/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": reqres_resource(2)})))
        .mount(&server)
        .await;
    let resources: Vec<Value> = (1..=6).map(reqres_resource).collect();
    Mock::given(method("GET"))
        .and(path("/unknown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": resources
        })))
        .mount(&server)
        .await;

    // Any other record is unknown
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .with_priority(10)
        .mount(&server)
        .await;

    server
}

/// Mappings registered with [`stub_emulator`], in registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    mappings: Arc<Mutex<Vec<StubMapping>>>,
}

impl Registry {
    pub fn mappings(&self) -> Vec<StubMapping> {
        self.mappings.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn register(&self, mapping: StubMapping) {
        if let Ok(mut mappings) = self.mappings.lock() {
            mappings.push(mapping);
        }
    }

    fn reset(&self) {
        if let Ok(mut mappings) = self.mappings.lock() {
            mappings.clear();
        }
    }

    /// Most recently registered mapping matching the request
    fn lookup(&self, request: &Request) -> Option<StubMapping> {
        let mappings = self.mappings.lock().ok()?;
        let found = mappings
            .iter()
            .rev()
            .find(|mapping| pattern_matches(&mapping.request, request))
            .cloned();
        found
    }
}

/// Answers `POST /__admin/mappings` by recording the posted mapping
struct RegisterMapping(Registry);

impl Respond for RegisterMapping {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match serde_json::from_slice::<StubMapping>(&request.body) {
            Ok(mapping) => {
                self.0.register(mapping);
                ResponseTemplate::new(201)
            }
            Err(e) => ResponseTemplate::new(422).set_body_string(e.to_string()),
        }
    }
}

/// Answers `POST /__admin/mappings/reset` by dropping registered mappings
struct ResetMappings(Registry);

impl Respond for ResetMappings {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.0.reset();
        ResponseTemplate::new(200)
    }
}

/// Serves registered mappings; anything unmatched is a 404
struct ServeMappings(Registry);

impl Respond for ServeMappings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(mapping) = self.0.lookup(request) else {
            return ResponseTemplate::new(404);
        };

        let response = &mapping.response;
        let mut template = ResponseTemplate::new(response.status);
        if let Some(body) = &response.json_body {
            template = template.set_body_json(body);
        } else if let Some(body) = &response.body {
            template = template.set_body_string(body.clone());
        }
        for name in response.headers.keys() {
            for (index, value) in response.header_values(name).into_iter().enumerate() {
                template = if index == 0 {
                    template.insert_header(name.as_str(), value)
                } else {
                    template.append_header(name.as_str(), value)
                };
            }
        }
        template
    }
}

fn pattern_matches(pattern: &RequestPattern, request: &Request) -> bool {
    if let Some(expected) = &pattern.method {
        if expected != "ANY" && !expected.eq_ignore_ascii_case(request.method.as_str()) {
            return false;
        }
    }

    let path = request.url.path();
    let full = match request.url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    if pattern.url.as_deref().is_some_and(|url| url != full)
        || pattern.url_path.as_deref().is_some_and(|url| url != path)
    {
        return false;
    }

    pattern.headers.iter().all(|(name, matcher)| {
        let actual = request
            .headers
            .get(name.as_str())
            .and_then(|value| value.to_str().ok());
        if matcher.get("absent").and_then(Value::as_bool) == Some(true) {
            actual.is_none()
        } else if let Some(expected) = matcher.get("equalTo").and_then(Value::as_str) {
            actual == Some(expected)
        } else {
            false
        }
    })
}

/// Stub server that speaks the admin protocol and serves whatever
/// mappings were registered through it
pub async fn stub_emulator() -> (MockServer, Registry) {
    let server = MockServer::start().await;
    let registry = Registry::default();

    Mock::given(method("GET"))
        .and(path("/__admin"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/__admin/mappings/reset"))
        .respond_with(ResetMappings(registry.clone()))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/__admin/mappings"))
        .respond_with(RegisterMapping(registry.clone()))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(AnyRequest)
        .respond_with(ServeMappings(registry.clone()))
        .with_priority(10)
        .mount(&server)
        .await;

    (server, registry)
}

/// Matches every request
struct AnyRequest;

impl Match for AnyRequest {
    fn matches(&self, _request: &Request) -> bool {
        true
    }
}

/// Container runtime that records launches instead of running Docker
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    unavailable: bool,
    launches: Arc<AtomicUsize>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime whose `info` check fails like a stopped Docker daemon
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerRuntime for RecordingRuntime {
    async fn info(&self) -> Result<(), RuntimeError> {
        if self.unavailable {
            return Err(RuntimeError::CommandFailed {
                command: "docker info".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "Cannot connect to the Docker daemon".to_string(),
            });
        }
        Ok(())
    }

    async fn launch(&self, _spec: &ContainerSpec) -> Result<String, RuntimeError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok("recorded".to_string())
    }
}
