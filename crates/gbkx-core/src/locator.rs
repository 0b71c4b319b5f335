//! Locating the 7-Zip executable
//!
//! Sources are tried in a fixed order and the first existing match wins:
//!
//! 1. the path saved in the configuration
//! 2. the `GBKX_7Z_PATH` environment variable
//! 3. the executable names looked up on `PATH`
//! 4. a few well-known install locations for the current platform
//!
//! Matches from 3 and 4 are worth saving back to the configuration so later
//! runs skip the search; see [`locate_and_remember`].

use crate::config::{Config, ConfigStore};
use crate::{Error, Result};
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the archiver location
pub const ARCHIVER_ENV_VAR: &str = "GBKX_7Z_PATH";

/// Where a located archiver came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Saved configuration
    Config,
    /// `GBKX_7Z_PATH`
    Environment,
    /// `PATH` lookup
    SearchPath,
    /// Hard-coded install location
    CommonLocation,
}

impl Source {
    /// Whether the path was found by searching rather than being given
    pub fn is_discovered(self) -> bool {
        matches!(self, Source::SearchPath | Source::CommonLocation)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Config => "configuration",
            Source::Environment => ARCHIVER_ENV_VAR,
            Source::SearchPath => "PATH",
            Source::CommonLocation => "default install location",
        };
        f.write_str(name)
    }
}

/// A located archiver executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: PathBuf,
    pub source: Source,
}

/// Executable names searched on `PATH`
pub fn default_exe_names() -> Vec<String> {
    if cfg!(windows) {
        vec!["7z.exe".to_string(), "7z".to_string()]
    } else {
        vec!["7z".to_string(), "7zz".to_string()]
    }
}

/// Well-known install locations for the current platform
pub fn default_common_paths() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(windows) {
        &[
            r"C:\Program Files\7-Zip\7z.exe",
            r"C:\Program Files (x86)\7-Zip\7z.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/usr/local/bin/7z", "/opt/homebrew/bin/7z"]
    } else {
        &["/usr/bin/7z", "/usr/local/bin/7z"]
    };
    paths.iter().map(PathBuf::from).collect()
}

/// Searches for the archiver
///
/// Everything the search reads from the environment is captured up front so
/// tests can build a locator with their own values.
#[derive(Debug, Clone)]
pub struct Locator {
    env_override: Option<PathBuf>,
    search_path: Option<OsString>,
    exe_names: Vec<String>,
    common_paths: Vec<PathBuf>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    /// Locator with the platform defaults and no environment input
    pub fn new() -> Self {
        Self {
            env_override: None,
            search_path: None,
            exe_names: default_exe_names(),
            common_paths: default_common_paths(),
        }
    }

    /// Locator reading `GBKX_7Z_PATH` and `PATH` from the process environment
    pub fn from_env() -> Self {
        let env_override = env::var_os(ARCHIVER_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self::new()
            .with_env_override(env_override)
            .with_search_path(env::var_os("PATH"))
    }

    pub fn with_env_override(mut self, path: Option<PathBuf>) -> Self {
        self.env_override = path;
        self
    }

    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn with_exe_names(mut self, names: Vec<String>) -> Self {
        self.exe_names = names;
        self
    }

    pub fn with_common_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.common_paths = paths;
        self
    }

    /// Find the archiver, returning [`Error::ArchiverNotFound`] if every
    /// source comes up empty
    pub fn locate(&self, config: &Config) -> Result<Located> {
        if let Some(path) = usable(config.sevenzip_path.as_deref()) {
            debug!(path = %path.display(), "Using configured 7-Zip");
            return Ok(Located {
                path,
                source: Source::Config,
            });
        }

        if let Some(stale) = &config.sevenzip_path {
            warn!(path = %stale.display(), "Configured 7-Zip path no longer exists");
        }

        if let Some(path) = usable(self.env_override.as_deref()) {
            debug!(path = %path.display(), "Using 7-Zip from {}", ARCHIVER_ENV_VAR);
            return Ok(Located {
                path,
                source: Source::Environment,
            });
        }

        if let Some(path) = self.search_path_lookup() {
            debug!(path = %path.display(), "Found 7-Zip on PATH");
            return Ok(Located {
                path,
                source: Source::SearchPath,
            });
        }

        if let Some(path) = self.common_paths.iter().find(|p| p.exists()) {
            debug!(path = %path.display(), "Found 7-Zip at default install location");
            return Ok(Located {
                path: path.clone(),
                source: Source::CommonLocation,
            });
        }

        Err(Error::ArchiverNotFound)
    }

    fn search_path_lookup(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        self.exe_names
            .iter()
            .find_map(|name| which::which_in(name, Some(search_path), &cwd).ok())
    }
}

fn usable(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty() && p.exists())
        .map(Path::to_path_buf)
}

/// Locate the archiver and, if it had to be searched for, save its path into
/// `config` and the store.
///
/// A failed save is logged and otherwise ignored; the in-memory `config` is
/// updated either way.
pub fn locate_and_remember(
    locator: &Locator,
    config: &mut Config,
    store: &ConfigStore,
) -> Result<Located> {
    let located = locator.locate(config)?;

    if located.source.is_discovered() {
        info!(path = %located.path.display(), "Found 7-Zip via {}", located.source);
        config.sevenzip_path = Some(located.path.clone());
        if let Err(e) = store.save(config) {
            warn!("Failed to save configuration: {}", e);
        }
    }

    Ok(located)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn isolated() -> Locator {
        Locator::new().with_common_paths(Vec::new())
    }

    #[test]
    fn test_config_beats_environment() {
        let temp_dir = TempDir::new().unwrap();
        let configured = temp_dir.path().join("configured/7z");
        let from_env = temp_dir.path().join("env/7z");
        touch(&configured);
        touch(&from_env);

        let config = Config {
            sevenzip_path: Some(configured.clone()),
            ..Config::default()
        };
        let located = isolated()
            .with_env_override(Some(from_env))
            .locate(&config)
            .unwrap();

        assert_eq!(located.path, configured);
        assert_eq!(located.source, Source::Config);
    }

    #[test]
    fn test_stale_config_falls_through_to_environment() {
        let temp_dir = TempDir::new().unwrap();
        let from_env = temp_dir.path().join("env/7z");
        touch(&from_env);

        let config = Config {
            sevenzip_path: Some(temp_dir.path().join("gone/7z")),
            ..Config::default()
        };
        let located = isolated()
            .with_env_override(Some(from_env.clone()))
            .locate(&config)
            .unwrap();

        assert_eq!(located.path, from_env);
        assert_eq!(located.source, Source::Environment);
    }

    #[test]
    fn test_missing_environment_path_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let common = temp_dir.path().join("Program Files/7-Zip/7z.exe");
        touch(&common);

        let located = Locator::new()
            .with_env_override(Some(temp_dir.path().join("nope")))
            .with_common_paths(vec![temp_dir.path().join("missing"), common.clone()])
            .locate(&Config::default())
            .unwrap();

        assert_eq!(located.path, common);
        assert_eq!(located.source, Source::CommonLocation);
        assert!(located.source.is_discovered());
    }

    #[cfg(unix)]
    #[test]
    fn test_search_path_tries_names_in_order() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("bin");
        let common = temp_dir.path().join("opt/7z");
        touch(&common);
        for name in ["7zz", "7za"] {
            let exe = bin.join(name);
            touch(&exe);
            fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let located = Locator::new()
            .with_exe_names(vec!["7z".to_string(), "7za".to_string(), "7zz".to_string()])
            .with_search_path(Some(bin.as_os_str().to_os_string()))
            .with_common_paths(vec![common])
            .locate(&Config::default())
            .unwrap();

        assert_eq!(located.path, bin.join("7za"));
        assert_eq!(located.source, Source::SearchPath);
    }

    #[test]
    fn test_not_found_is_explicit() {
        let temp_dir = TempDir::new().unwrap();
        let result = isolated()
            .with_search_path(Some(temp_dir.path().as_os_str().to_os_string()))
            .locate(&Config::default());

        assert!(matches!(result, Err(Error::ArchiverNotFound)));
    }

    #[test]
    fn test_source_discovery_flags() {
        assert!(!Source::Config.is_discovered());
        assert!(!Source::Environment.is_discovered());
        assert!(Source::SearchPath.is_discovered());
        assert!(Source::CommonLocation.is_discovered());
    }

    #[test]
    fn test_discovered_path_is_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let common = temp_dir.path().join("bin/7z");
        touch(&common);
        let store = ConfigStore::new(temp_dir.path().join("config.json"));
        let mut config = Config::default();

        let located = locate_and_remember(
            &Locator::new().with_common_paths(vec![common.clone()]),
            &mut config,
            &store,
        )
        .unwrap();

        assert_eq!(located.path, common);
        assert_eq!(config.sevenzip_path, Some(common.clone()));
        assert_eq!(store.load().sevenzip_path, Some(common));
    }

    #[test]
    fn test_given_path_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let from_env = temp_dir.path().join("7z");
        touch(&from_env);
        let store = ConfigStore::new(temp_dir.path().join("config.json"));
        let mut config = Config::default();

        locate_and_remember(
            &isolated().with_env_override(Some(from_env)),
            &mut config,
            &store,
        )
        .unwrap();

        assert_eq!(config.sevenzip_path, None);
        assert!(!store.path().exists());
    }
}
