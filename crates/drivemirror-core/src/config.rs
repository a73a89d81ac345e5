//! Configuration module for DriveMirror.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::policy::UpdatePolicy;
use crate::ports::cloud_provider::RootSpec;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for DriveMirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub defaults: DefaultsConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
    pub manifest: ManifestConfig,
    pub tasks: Vec<TaskConfig>,
}

/// App-only authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Azure AD tenant (directory) ID.
    pub tenant_id: Option<String>,
    /// Azure AD application (client) ID.
    pub client_id: Option<String>,
    /// Name of the environment variable holding the client secret.
    pub client_secret_env: String,
    /// Login host used to build the token endpoint.
    pub authority_host: String,
    /// Graph API root, e.g. `https://graph.microsoft.com/v1.0`.
    pub graph_base_url: String,
}

/// Run-wide defaults that tasks may override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Global update action, used when a task does not set its own.
    pub update_action: UpdatePolicy,
}

/// Retry policy for transient remote failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per remote call, including the first.
    pub max_attempts: u32,
    /// Linear backoff step in seconds when the server sends no `Retry-After`.
    pub base_delay_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Path to the append-only run log.
    pub file: PathBuf,
}

/// Rename manifest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Path to the CSV rename manifest.
    pub file: PathBuf,
}

/// The kind of remote tree a task mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    SharePoint,
    OneDrive,
}

/// A single mirroring task.
///
/// Required fields depend on [`TaskKind`]; see [`TaskConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Optional label used in log lines.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TaskKind>,
    /// SharePoint site URL, e.g. `https://contoso.sharepoint.com/sites/Finance`.
    pub site_url: Option<String>,
    /// SharePoint document library display name.
    pub library: Option<String>,
    /// OneDrive owner (user principal name or object id).
    pub user: Option<String>,
    /// Folder inside the library/drive to mirror; the drive root when absent.
    pub remote_path: Option<String>,
    /// Local directory receiving the mirror.
    pub local_path: Option<PathBuf>,
    /// Overrides `defaults.update_action` for this task.
    pub update_action: Option<UpdatePolicy>,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/drivemirror/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("drivemirror")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default environment variable for the client secret.
pub const DEFAULT_CLIENT_SECRET_ENV: &str = "DRIVEMIRROR_CLIENT_SECRET";

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("drivemirror")
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret_env: DEFAULT_CLIENT_SECRET_ENV.to_string(),
            authority_host: "https://login.microsoftonline.com".to_string(),
            graph_base_url: "https://graph.microsoft.com/v1.0".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: data_dir().join("drivemirror.log"),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file: data_dir().join("rename-manifest.csv"),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"tasks[0].site_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the run-wide settings, ignoring individual tasks.
    ///
    /// Errors here make the whole configuration unusable, whereas a broken
    /// task only disqualifies that task.
    pub fn validate_settings(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- auth ---
        if self.auth.client_secret_env.trim().is_empty() {
            errors.push(ValidationError::new(
                "auth.client_secret_env",
                "must name an environment variable",
            ));
        }
        if !is_http_url(&self.auth.authority_host) {
            errors.push(ValidationError::new(
                "auth.authority_host",
                format!("not an http(s) URL: {}", self.auth.authority_host),
            ));
        }
        if !is_http_url(&self.auth.graph_base_url) {
            errors.push(ValidationError::new(
                "auth.graph_base_url",
                format!("not an http(s) URL: {}", self.auth.graph_base_url),
            ));
        }

        // --- retry ---
        if self.retry.max_attempts == 0 {
            errors.push(ValidationError::new(
                "retry.max_attempts",
                "must be greater than 0",
            ));
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError::new(
                "logging.level",
                format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        errors
    }

    /// Validate the configuration and return all errors found, including
    /// per-task errors.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.validate_settings();
        for (index, task) in self.tasks.iter().enumerate() {
            errors.extend(task.validate(index));
        }
        errors
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

fn missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// TaskConfig
// ---------------------------------------------------------------------------

/// A task that passed validation, ready to hand to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTarget {
    pub root: RootSpec,
    pub local_path: PathBuf,
}

impl TaskConfig {
    /// A SharePoint library task.
    pub fn sharepoint(
        site_url: impl Into<String>,
        library: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: Some(TaskKind::SharePoint),
            site_url: Some(site_url.into()),
            library: Some(library.into()),
            local_path: Some(local_path.into()),
            ..Self::default()
        }
    }

    /// A OneDrive task.
    pub fn onedrive(user: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: Some(TaskKind::OneDrive),
            user: Some(user.into()),
            local_path: Some(local_path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_remote_path(mut self, remote_path: impl Into<String>) -> Self {
        self.remote_path = Some(remote_path.into());
        self
    }

    #[must_use]
    pub fn with_update_action(mut self, policy: UpdatePolicy) -> Self {
        self.update_action = Some(policy);
        self
    }

    /// Label for log lines: the configured name, or the 1-based position.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("task #{}", index + 1),
        }
    }

    /// The update action in force for this task.
    pub fn effective_policy(&self, global: UpdatePolicy) -> UpdatePolicy {
        self.update_action.unwrap_or(global)
    }

    /// Check the fields required by this task's type.
    ///
    /// `index` is the task's position in `tasks`, used for field paths.
    pub fn validate(&self, index: usize) -> Vec<ValidationError> {
        let field = |name: &str| format!("tasks[{index}].{name}");
        let mut errors = Vec::new();

        match self.kind {
            None => errors.push(ValidationError::new(
                field("type"),
                "required (SharePoint or OneDrive)",
            )),
            Some(TaskKind::SharePoint) => {
                if missing(&self.site_url) {
                    errors.push(ValidationError::new(
                        field("site_url"),
                        "required for SharePoint tasks",
                    ));
                } else if let Some(url) = &self.site_url {
                    if !is_http_url(url) {
                        errors.push(ValidationError::new(
                            field("site_url"),
                            format!("not an http(s) URL: {url}"),
                        ));
                    }
                }
                if missing(&self.library) {
                    errors.push(ValidationError::new(
                        field("library"),
                        "required for SharePoint tasks",
                    ));
                }
            }
            Some(TaskKind::OneDrive) => {
                if missing(&self.user) {
                    errors.push(ValidationError::new(
                        field("user"),
                        "required for OneDrive tasks",
                    ));
                }
            }
        }

        if self
            .local_path
            .as_ref()
            .map_or(true, |p| p.as_os_str().is_empty())
        {
            errors.push(ValidationError::new(field("local_path"), "required"));
        }

        errors
    }

    /// Validate and convert into a [`TaskTarget`].
    pub fn target(&self, index: usize) -> Result<TaskTarget, Vec<ValidationError>> {
        let errors = self.validate(index);
        if !errors.is_empty() {
            return Err(errors);
        }

        let folder = self
            .remote_path
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let root = match self.kind {
            Some(TaskKind::SharePoint) => RootSpec::SharePoint {
                site_url: self.site_url.clone().unwrap_or_default(),
                library: self.library.clone().unwrap_or_default(),
                folder,
            },
            Some(TaskKind::OneDrive) => RootSpec::OneDrive {
                user: self.user.clone().unwrap_or_default(),
                folder,
            },
            None => return Err(vec![ValidationError::new(format!("tasks[{index}].type"), "required")]),
        };

        Ok(TaskTarget {
            root,
            local_path: self.local_path.clone().unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use drivemirror_core::config::{ConfigBuilder, TaskConfig};
///
/// let config = ConfigBuilder::new()
///     .auth_tenant_id("contoso.onmicrosoft.com")
///     .auth_client_id("00000000-0000-0000-0000-000000000000")
///     .task(TaskConfig::sharepoint(
///         "https://contoso.sharepoint.com/sites/Finance",
///         "Documents",
///         "/srv/mirror/finance",
///     ))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- auth ---

    pub fn auth_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.config.auth.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn auth_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.auth.client_id = Some(client_id.into());
        self
    }

    pub fn auth_client_secret_env(mut self, name: impl Into<String>) -> Self {
        self.config.auth.client_secret_env = name.into();
        self
    }

    pub fn auth_graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.auth.graph_base_url = url.into();
        self
    }

    // --- defaults ---

    pub fn default_update_action(mut self, policy: UpdatePolicy) -> Self {
        self.config.defaults.update_action = policy;
        self
    }

    // --- retry ---

    pub fn retry_max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn retry_base_delay_secs(mut self, seconds: u64) -> Self {
        self.config.retry.base_delay_secs = seconds;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_file(mut self, file: PathBuf) -> Self {
        self.config.logging.file = file;
        self
    }

    // --- manifest ---

    pub fn manifest_file(mut self, file: PathBuf) -> Self {
        self.config.manifest.file = file;
        self
    }

    // --- tasks ---

    pub fn task(mut self, task: TaskConfig) -> Self {
        self.config.tasks.push(task);
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
