// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Reading deployment configuration and directory seeds from disk.
//!
//! [`ConfigLoader::load`] reads the file, expands `${VAR}` and
//! `${VAR:default}` placeholders, parses by extension, applies `SIIG_*`
//! overrides, anchors a relative `directory.seed_path` from the file at the
//! file's directory and validates. A `SIIG_DIRECTORY_SEED` override is used
//! as given, so a relative value resolves against the working directory.
//! Overrides recognised (with the default prefix):
//!
//! ```text
//! SIIG_SERVER_HOST=127.0.0.1
//! SIIG_SERVER_PORT=9090
//! SIIG_TOKEN_SECRET=...
//! SIIG_TOKEN_TTL_SECS=3600
//! SIIG_DIRECTORY_SEED=/etc/siig/directory.yaml
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use siig_core::DirectorySeed;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{SecretValue, SiigConfig};

/// Path reported for documents passed to [`ConfigLoader::load_from_str`].
const INLINE_SOURCE: &str = "<inline>";

/// Environment suffix, what a bad value should look like, and how to apply it.
type Override = (&'static str, &'static str, fn(&mut SiigConfig, &str) -> bool);

const OVERRIDES: &[Override] = &[
    ("SERVER_HOST", "expected an IP address", set_host),
    ("SERVER_PORT", "expected a port number", set_port),
    ("TOKEN_SECRET", "expected a secret", set_secret),
    ("TOKEN_TTL_SECS", "expected a number of seconds", set_ttl),
    ("DIRECTORY_SEED", "expected a path", set_seed),
];

fn set_host(config: &mut SiigConfig, value: &str) -> bool {
    value.parse().map(|host| config.server.host = host).is_ok()
}

fn set_port(config: &mut SiigConfig, value: &str) -> bool {
    value.parse().map(|port| config.server.port = port).is_ok()
}

fn set_secret(config: &mut SiigConfig, value: &str) -> bool {
    config.security.token.secret = Some(SecretValue::new(value));
    true
}

fn set_ttl(config: &mut SiigConfig, value: &str) -> bool {
    value.parse().map(|ttl| config.security.token.ttl_secs = ttl).is_ok()
}

fn set_seed(config: &mut SiigConfig, value: &str) -> bool {
    config.directory.seed_path = Some(PathBuf::from(value));
    true
}

/// Loads [`SiigConfig`] files.
///
/// ```no_run
/// use siig_config::ConfigLoader;
///
/// let config = ConfigLoader::new().with_env_prefix("SIIG_STAGING").load("siig.yaml")?;
/// # Ok::<(), siig_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    use_env: bool,
}

impl ConfigLoader {
    /// Loader with the `SIIG` prefix and environment handling on.
    pub fn new() -> Self {
        Self {
            env_prefix: "SIIG".to_string(),
            use_env: true,
        }
    }

    /// Reads overrides from `{prefix}_SERVER_PORT` and friends.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Turns placeholder expansion and overrides on or off.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Loads, resolves and validates the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<SiigConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let format = ConfigFormat::from_path(path)?;
        let text = read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = self.build(path, &text, format, Some(base))?;

        config.validate()?;
        debug!(
            addr = %config.server.socket_addr(),
            seed = ?config.directory.seed_path,
            ttl_secs = config.security.token.ttl_secs,
            "Configuration ready"
        );
        Ok(config)
    }

    /// Loads and validates an in-memory document. Relative seed paths stay
    /// relative to the working directory.
    pub fn load_from_str(&self, text: &str, format: ConfigFormat) -> ConfigResult<SiigConfig> {
        let config = self.build(Path::new(INLINE_SOURCE), text, format, None)?;
        config.validate()?;
        Ok(config)
    }

    /// Only the file's own `seed_path` is anchored at `base`; an override
    /// path is taken as given, like `run --seed`.
    fn build(
        &self,
        source: &Path,
        text: &str,
        format: ConfigFormat,
        base: Option<&Path>,
    ) -> ConfigResult<SiigConfig> {
        let mut config: SiigConfig = if self.use_env {
            format.parse(source, &expand_placeholders(text))?
        } else {
            format.parse(source, text)?
        };

        if let (Some(base), Some(seed)) = (base, config.directory.seed_path.as_mut()) {
            if seed.is_relative() {
                *seed = base.join(&*seed);
            }
        }

        if self.use_env {
            self.apply_overrides(&mut config)?;
        }
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut SiigConfig) -> ConfigResult<()> {
        for (suffix, expected, apply) in OVERRIDES {
            let name = format!("{}_{}", self.env_prefix, suffix);
            let Ok(value) = env::var(&name) else {
                continue;
            };
            if !apply(config, value.trim()) {
                return Err(ConfigError::env(name, *expected));
            }
            debug!(variable = %name, "Applied environment override");
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// File formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the (case-insensitive) extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::unsupported_format(path)),
        }
    }

    /// Canonical extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Deserializes `text`; errors are reported against `source`.
    fn parse<T: DeserializeOwned>(self, source: &Path, text: &str) -> ConfigResult<T> {
        let parsed = match self {
            // YAML goes through the `config` crate's YAML source.
            Self::Yaml => config::Config::builder()
                .add_source(config::File::from_str(text, config::FileFormat::Yaml))
                .build()
                .and_then(|c| c.try_deserialize())
                .map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::parse(source, message))
    }
}

/// Loads and checks a directory seed (`accounts`, `instructors`, `students`).
///
/// Placeholders are not expanded in seeds.
pub fn load_directory_seed(path: impl AsRef<Path>) -> ConfigResult<DirectorySeed> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let seed: DirectorySeed = format.parse(path, &read_to_string(path)?)?;
    seed.validate().map_err(|e| ConfigError::invalid_seed(path, e))?;

    info!(
        path = %path.display(),
        accounts = seed.accounts.len(),
        instructors = seed.instructors.len(),
        students = seed.students.len(),
        "Directory seed loaded"
    );
    Ok(seed)
}

/// [`ConfigLoader::load`] with the default loader.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<SiigConfig> {
    ConfigLoader::new().load(path)
}

/// [`ConfigLoader::load_from_str`] with the default loader.
pub fn load_config_str(text: &str, format: ConfigFormat) -> ConfigResult<SiigConfig> {
    ConfigLoader::new().load_from_str(text, format)
}

fn read_to_string(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::not_found(path),
        _ => ConfigError::read(path, e),
    })
}

/// Expands `${NAME}` and `${NAME:default}`.
///
/// An unset variable without a default is kept verbatim so validation can
/// name it; an unterminated `${` is copied through.
fn expand_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let body = &after[..end];
        let (name, default) = match body.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };
        match (env::var(name), default) {
            (Ok(value), _) => out.push_str(&value),
            (Err(_), Some(default)) => out.push_str(default),
            (Err(_), None) => {
                warn!(variable = name, "Placeholder refers to an unset variable");
                out.push_str(&rest[start..start + 2 + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SECRET: &str = "loader-test-secret-0123456789abcdef";

    fn yaml() -> String {
        format!(
            "server:\n  host: 127.0.0.1\n  port: 8081\n  public_paths:\n    - /api/health\n\
             security:\n  token:\n    secret: \"{}\"\n    ttl_secs: 3600\n",
            SECRET
        )
    }

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_and_toml() {
        let file = temp_file(".yaml", &yaml());
        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_LOAD_YAML")
            .load(file.path())
            .unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.security.token.secret.unwrap().expose(), SECRET);

        let toml = format!("[server]\nport = 8082\n\n[security.token]\nsecret = \"{}\"\n", SECRET);
        let file = temp_file(".toml", &toml);
        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_LOAD_TOML")
            .load(file.path())
            .unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.security.token.ttl_secs, 604_800);
    }

    #[test]
    fn test_format_from_extension() {
        let cases = [
            ("siig.yaml", ConfigFormat::Yaml),
            ("siig.YML", ConfigFormat::Yaml),
            ("siig.toml", ConfigFormat::Toml),
            ("conf.d/siig.json", ConfigFormat::Json),
        ];
        for (path, format) in cases {
            assert_eq!(ConfigFormat::from_path(Path::new(path)).unwrap(), format);
        }
        assert!(ConfigFormat::from_path(Path::new("siig.txt")).is_err());
        assert!(ConfigFormat::from_path(Path::new("siig")).is_err());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            expand_placeholders("value: ${SIIG_TEST_NONEXISTENT_VAR:fallback}"),
            "value: fallback"
        );
        assert_eq!(
            expand_placeholders("a: ${SIIG_TEST_NONEXISTENT_VAR}\nb: 1"),
            "a: ${SIIG_TEST_NONEXISTENT_VAR}\nb: 1"
        );
        assert_eq!(expand_placeholders("value: ${unterminated"), "value: ${unterminated");
        assert_eq!(expand_placeholders("cost: $5 {x}"), "cost: $5 {x}");

        env::set_var("SIIG_TEST_PLACEHOLDER_SECRET", SECRET);
        assert_eq!(
            expand_placeholders("secret: ${SIIG_TEST_PLACEHOLDER_SECRET:nope}!"),
            format!("secret: {}!", SECRET)
        );
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("SIIG_TEST_OVERRIDE_SERVER_PORT", " 9999 ");
        env::set_var("SIIG_TEST_OVERRIDE_TOKEN_TTL_SECS", "120");
        env::set_var("SIIG_TEST_OVERRIDE_DIRECTORY_SEED", "/srv/seed.yaml");

        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_OVERRIDE")
            .load_from_str(&yaml(), ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.security.token.ttl_secs, 120);
        assert_eq!(config.directory.seed_path, Some(PathBuf::from("/srv/seed.yaml")));
    }

    #[test]
    fn test_bad_override_names_variable() {
        env::set_var("SIIG_TEST_BADPORT_SERVER_PORT", "eighty");
        let err = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_BADPORT")
            .load_from_str(&yaml(), ConfigFormat::Yaml)
            .unwrap_err();
        match err {
            ConfigError::Env { name, .. } => assert_eq!(name, "SIIG_TEST_BADPORT_SERVER_PORT"),
            other => panic!("expected env error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_disabled() {
        env::set_var("SIIG_TEST_NOENV_SERVER_PORT", "9999");
        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_NOENV")
            .with_env_vars(false)
            .load_from_str(&yaml(), ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = format!("{}unknown: 1\n", yaml());
        let err = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str(&text, ConfigFormat::Yaml)
            .unwrap_err();
        assert_eq!(err.path(), Some(Path::new(INLINE_SOURCE)));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new().load("/nonexistent/path/siig.yaml");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_relative_seed_path_anchored_at_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siig.yaml");
        fs::write(&path, format!("{}directory:\n  seed_path: seed.json\n", yaml())).unwrap();

        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_RELATIVE")
            .load(&path)
            .unwrap();
        assert_eq!(config.directory.seed_path, Some(dir.path().join("seed.json")));
    }

    #[test]
    fn test_relative_seed_override_stays_relative() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siig.yaml");
        fs::write(&path, format!("{}directory:\n  seed_path: seed.json\n", yaml())).unwrap();
        env::set_var("SIIG_TEST_RELSEED_DIRECTORY_SEED", "fixtures/seed.json");

        let config = ConfigLoader::new()
            .with_env_prefix("SIIG_TEST_RELSEED")
            .load(&path)
            .unwrap();
        assert_eq!(config.directory.seed_path, Some(PathBuf::from("fixtures/seed.json")));
    }

    #[test]
    fn test_directory_seed() {
        let file = temp_file(
            ".json",
            r#"{
                "accounts": [{"id": 1, "email": "root@campus.edu", "role": "admin"}],
                "instructors": [
                    {"id": 7, "email": "ada@campus.edu", "first_name": "Ada", "last_name": "L"}
                ],
                "students": []
            }"#,
        );
        let seed = load_directory_seed(file.path()).unwrap();
        assert_eq!((seed.accounts.len(), seed.instructors.len()), (1, 1));

        let file = temp_file(
            ".json",
            r#"{"accounts": [
                {"id": 1, "email": "a@campus.edu", "role": "admin"},
                {"id": 1, "email": "b@campus.edu", "role": "student"}
            ]}"#,
        );
        assert!(matches!(
            load_directory_seed(file.path()),
            Err(ConfigError::InvalidSeed { .. })
        ));
    }
}
