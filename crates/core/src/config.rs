//! TOML-based configuration for srcfix.
//!
//! Every job's target files and rewrite rule live here as plain values that
//! are handed to discovery and the transforms. When no config file exists the
//! defaults reproduce the one-off maintenance runs this tool replaces.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use crate::conflict::ConflictMarkers;
use crate::discovery::TargetSet;
use crate::errors::ConfigError;
use crate::imports::ImportRule;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "srcfix.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcfixConfig {
    /// Settings shared by every job.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Conflict-marker cleanup.
    #[serde(default)]
    pub conflicts: ConflictsConfig,

    /// Import-alias rewrite.
    #[serde(default)]
    pub imports: ImportsConfig,
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Project root; target paths and globs are relative to it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Minimum tracing level: off, trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Report what would change without writing anything.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// Conflict cleanup: marker labels plus the files to clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictsConfig {
    #[serde(flatten)]
    pub markers: ConflictMarkers,

    #[serde(flatten)]
    pub targets: TargetSet,
}

impl Default for ConflictsConfig {
    fn default() -> Self {
        Self {
            markers: ConflictMarkers::default(),
            targets: TargetSet {
                files: vec![
                    "app/admin/backup/page.tsx".into(),
                    "app/client-portal/page.tsx".into(),
                    "app/admin/settings/page.tsx".into(),
                    "app/api/pages/[id]/route.ts".into(),
                ],
                include: Vec::new(),
                exclude: Vec::new(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// Import rewrite: the substitution rule plus the files to rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportsConfig {
    #[serde(flatten)]
    pub rule: ImportRule,

    #[serde(flatten)]
    pub targets: TargetSet,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            rule: ImportRule::default(),
            targets: TargetSet {
                files: Vec::new(),
                include: vec!["app/**/*.tsx".into(), "app/**/*.ts".into()],
                exclude: vec!["*.test.ts".into()],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl SrcfixConfig {
    /// Load a [`SrcfixConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: SrcfixConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] in `cwd` if present,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load_from_file(candidate)
        } else {
            debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate that all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".into(),
                detail: format!("unknown level '{}'", self.general.log_level),
            });
        }

        self.conflicts.markers.compile()?;
        if self.conflicts.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "conflicts".into(),
                detail: "set `files` or `include` to select target files".into(),
            });
        }

        self.imports.rule.validate()?;
        if self.imports.targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "imports".into(),
                detail: "set `files` or `include` to select target files".into(),
            });
        }

        Ok(())
    }

    /// Load (or default) and validate in one call.
    pub fn load_and_validate(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path, cwd)?;
        config.validate()?;
        Ok(config)
    }
}

/// Commented config file equivalent to [`SrcfixConfig::default`].
pub const DEFAULT_CONFIG_TOML: &str = r#"# srcfix configuration
# Paths and globs are relative to `general.root`.

[general]
root = "."
log_level = "warn"
dry_run = false

[conflicts]
# Start marker is "<<<<<<< {ours_label}", end marker ">>>>>>> {theirs_label}".
# The theirs side is always kept.
ours_label = "Updated upstream"
theirs_label = "Stashed changes"
# An explicit list wins over include/exclude globs.
files = [
    "app/admin/backup/page.tsx",
    "app/client-portal/page.tsx",
    "app/admin/settings/page.tsx",
    "app/api/pages/[id]/route.ts",
]
include = []
exclude = []

[imports]
relative_prefix = "../../../src/"
alias = "@/"
files = []
include = ["app/**/*.tsx", "app/**/*.ts"]
exclude = ["*.test.ts"]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: SrcfixConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, SrcfixConfig::default());
        parsed.validate().unwrap();
    }

    #[test]
    fn test_parse_custom_config() {
        let toml_str = r#"
[general]
root = "web"
log_level = "debug"
dry_run = true

[conflicts]
ours_label = "HEAD"
theirs_label = "feature"
include = ["**/*.tsx"]
exclude = ["node_modules"]

[imports]
relative_prefix = "../../src/"
alias = "~/"
files = ["app/page.tsx"]
"#;
        let config: SrcfixConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.root, PathBuf::from("web"));
        assert!(config.general.dry_run);
        assert_eq!(config.conflicts.markers.start_marker(), "<<<<<<< HEAD");
        assert!(config.conflicts.targets.files.is_empty());
        assert_eq!(config.conflicts.targets.exclude, vec!["node_modules"]);
        assert_eq!(config.imports.rule.alias, "~/");
        assert_eq!(config.imports.targets.files, vec!["app/page.tsx"]);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: SrcfixConfig = toml::from_str("[general]\nlog_level = \"info\"\n").unwrap();
        assert_eq!(config.general.root, PathBuf::from("."));
        assert_eq!(config.conflicts, ConflictsConfig::default());
        assert_eq!(config.imports, ImportsConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"[general]\nlog_level = \"debug\"\n").unwrap();

        let config = SrcfixConfig::load_from_file(&path).unwrap();
        assert_eq!(config.general.log_level, "debug");

        // Picked up implicitly from the working directory.
        let implicit = SrcfixConfig::load_or_default(None, dir.path()).unwrap();
        assert_eq!(implicit.general.log_level, "debug");
    }

    #[test]
    fn test_file_not_found() {
        let result = SrcfixConfig::load_from_file("/nonexistent/srcfix.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SrcfixConfig::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config, SrcfixConfig::default());
    }

    #[test]
    fn test_load_and_validate_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[imports]\nalias = \"../../../src/\"\n").unwrap();

        // Parsing alone succeeds; validation catches the no-op rule.
        assert!(SrcfixConfig::load_or_default(None, dir.path()).is_ok());
        assert!(matches!(
            SrcfixConfig::load_and_validate(None, dir.path()),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "imports.alias"
        ));

        std::fs::write(&path, "[general]\nlog_level = \"info\"\n").unwrap();
        let config = SrcfixConfig::load_and_validate(Some(&path), dir.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[general\nroot = ").unwrap();
        assert!(matches!(
            SrcfixConfig::load_from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SrcfixConfig::default();
        config.general.log_level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "general.log_level"
        ));

        let mut config = SrcfixConfig::default();
        config.imports.rule.alias = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "imports.alias"
        ));

        let mut config = SrcfixConfig::default();
        config.conflicts.targets = TargetSet::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "conflicts"
        ));
    }
}
