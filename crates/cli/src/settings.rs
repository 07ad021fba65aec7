//! crates/cli/src/settings.rs
//!
//! Layered settings: built-in defaults, then the TOML file, then flags.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use logging::{LevelError, LogLevel};
use nfs4::Nfs4Tools;
use reconcile::{AclConfig, DEFAULT_DOMAIN};
use serde::Deserialize;
use thiserror::Error;

use crate::arguments::GlobalArgs;

/// Environment variable naming the settings file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "PRJACL_CONFIG";

/// Directory holding the project directories unless configured otherwise.
pub const DEFAULT_BASEDIR: &str = "/project";

/// Age after which `lock status` calls a lock stale.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(86_400);

/// Failure to build [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("cannot read settings file '{}': {source}", path.display())]
    Read {
        /// Settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or has unknown keys.
    #[error("invalid settings file '{}': {source}", path.display())]
    Parse {
        /// Settings file.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },
    /// `loglevel` in the settings file is out of range.
    #[error(transparent)]
    LogLevel(#[from] LevelError),
}

/// Keys accepted in the settings file; all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    basedir: Option<PathBuf>,
    domain: Option<String>,
    loglevel: Option<u8>,
    stale_after_secs: Option<u64>,
    getfacl: Option<PathBuf>,
    setfacl: Option<PathBuf>,
}

/// Effective settings of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the project directories.
    pub basedir: PathBuf,
    /// Domain appended to user names.
    pub domain: String,
    /// Diagnostic verbosity.
    pub loglevel: LogLevel,
    /// Age after which a lock is reported stale.
    pub stale_after: Duration,
    /// ACL reading program.
    pub getfacl: OsString,
    /// ACL writing program.
    pub setfacl: OsString,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            basedir: PathBuf::from(DEFAULT_BASEDIR),
            domain: DEFAULT_DOMAIN.to_owned(),
            loglevel: LogLevel::default(),
            stale_after: DEFAULT_STALE_AFTER,
            getfacl: OsString::from(nfs4::DEFAULT_GETFACL),
            setfacl: OsString::from(nfs4::DEFAULT_SETFACL),
        }
    }
}

impl Settings {
    /// Resolves the settings for `global`.
    ///
    /// The file named by `--config` wins over `env_config` (the value of
    /// [`CONFIG_ENV_VAR`]); without either only defaults and flags apply.
    pub fn resolve(global: &GlobalArgs, env_config: Option<OsString>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        let file = global
            .config
            .clone()
            .or_else(|| env_config.filter(|value| !value.is_empty()).map(PathBuf::from));
        if let Some(path) = file {
            settings.merge_file(&path)?;
        }

        if let Some(basedir) = &global.basedir {
            settings.basedir.clone_from(basedir);
        }
        if let Some(domain) = &global.domain {
            settings.domain.clone_from(domain);
        }
        if let Some(level) = global.loglevel {
            settings.loglevel = LogLevel::from_verbosity(level)?;
        }
        if let Some(getfacl) = &global.getfacl {
            settings.getfacl.clone_from(getfacl);
        }
        if let Some(setfacl) = &global.setfacl {
            settings.setfacl.clone_from(setfacl);
        }
        Ok(settings)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileSettings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(basedir) = file.basedir {
            self.basedir = basedir;
        }
        if let Some(domain) = file.domain {
            self.domain = domain;
        }
        if let Some(level) = file.loglevel {
            self.loglevel = LogLevel::from_verbosity(level)?;
        }
        if let Some(secs) = file.stale_after_secs {
            self.stale_after = Duration::from_secs(secs);
        }
        if let Some(getfacl) = file.getfacl {
            self.getfacl = getfacl.into_os_string();
        }
        if let Some(setfacl) = file.setfacl {
            self.setfacl = setfacl.into_os_string();
        }
        Ok(())
    }

    /// Root directory of project `id`.
    pub fn project_root(&self, id: &str) -> PathBuf {
        self.basedir.join(id)
    }

    /// Principal settings for the reconciler.
    pub fn acl_config(&self) -> AclConfig {
        AclConfig::with_domain(self.domain.clone())
    }

    /// The ACL tools to run.
    pub fn tools(&self) -> Nfs4Tools {
        Nfs4Tools::new(self.getfacl.clone(), self.setfacl.clone())
    }
}
