//! Configuration file support for forgemirror.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`FORGEMIRROR_*`, also via a `.env` file)
//! 3. Config file (`~/.config/forgemirror/config.toml` or `./forgemirror.toml`)
//! 4. Interactive prompt on a terminal
//!
//! Example config file:
//! ```toml
//! [github]
//! account = "alice"
//! token = "ghp_..."        # optional; required for private repositories
//!
//! [gitea]
//! host = "https://git.example.com"
//! owner = "alice"          # optional, defaults to the GitHub account
//! token = "..."
//!
//! [mirror]
//! strategy = "mirror"      # or "clone"
//! force_sync = "no"        # "yes"/"y" to prune stale destination mirrors
//! ```

use std::io;
use std::path::PathBuf;

use config::{Config as ConfigBuilder, File, FileFormat};
use console::Term;
use directories::ProjectDirs;
use forgemirror::mirror::InvalidStrategy;
use forgemirror::MirrorStrategy;
use serde::Deserialize;
use thiserror::Error;

use crate::RunArgs;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub (source) configuration.
    pub github: GithubConfig,
    /// Gitea/Forgejo (destination) configuration.
    pub gitea: GiteaConfig,
    /// Mirror run defaults.
    pub mirror: MirrorConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Account whose repositories are mirrored.
    pub account: Option<String>,
    /// Personal access token. Optional; without one only public
    /// repositories are visible.
    pub token: Option<String>,
}

/// Gitea/Forgejo configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GiteaConfig {
    /// Base URL of the instance (e.g., "https://git.example.com").
    pub host: Option<String>,
    /// Destination owner; defaults to the GitHub account.
    pub owner: Option<String>,
    /// Personal access token.
    pub token: Option<String>,
}

/// Mirror run defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// "mirror" or "clone" (case-insensitive).
    pub strategy: Option<String>,
    /// "yes"/"y" to prune stale destination mirrors.
    pub force_sync: Option<String>,
}

impl Config {
    /// Load configuration files, then overlay `FORGEMIRROR_*` environment
    /// variables.
    pub fn load() -> Self {
        let mut config = Self::load_files();
        config.overlay_env(|name| std::env::var(name).ok());
        config
    }

    fn load_files() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "forgemirror") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Local config file (higher priority than XDG).
        let local_config = PathBuf::from("forgemirror.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./forgemirror.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Overlay environment variables onto the file configuration.
    ///
    /// Variables are mapped one-to-one rather than through a nested-key
    /// source: FORGEMIRROR_FORCE_SYNC carries an underscore that a
    /// separator-based mapping would split into nested keys.
    fn overlay_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let mut set = |slot: &mut Option<String>, name: &str| {
            if let Some(value) = lookup(name) {
                if !value.is_empty() {
                    *slot = Some(value);
                }
            }
        };

        set(&mut self.github.account, "FORGEMIRROR_ACCOUNT");
        set(&mut self.github.token, "FORGEMIRROR_GITHUB_TOKEN");
        set(&mut self.gitea.host, "FORGEMIRROR_GITEA_HOST");
        set(&mut self.gitea.owner, "FORGEMIRROR_GITEA_OWNER");
        set(&mut self.gitea.token, "FORGEMIRROR_GITEA_TOKEN");
        set(&mut self.mirror.strategy, "FORGEMIRROR_STRATEGY");
        set(&mut self.mirror.force_sync, "FORGEMIRROR_FORCE_SYNC");
    }
}

/// Whether a force-sync setting value enables the cleanup pass.
pub fn force_sync_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Errors from resolving run settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0} (pass a flag, set FORGEMIRROR_* or run on a terminal)")]
    Missing(&'static str),

    #[error(transparent)]
    Strategy(#[from] InvalidStrategy),

    #[error("prompt failed: {0}")]
    Prompt(#[from] io::Error),
}

/// Settings for one run, merged from flags, environment, config file, and
/// (on a terminal) interactive prompts.
#[derive(Debug)]
pub struct RunSettings {
    pub account: String,
    pub github_token: Option<String>,
    pub gitea_host: String,
    pub gitea_owner: String,
    pub gitea_token: String,
    pub strategy: MirrorStrategy,
    pub force_sync: bool,
}

impl RunSettings {
    pub fn resolve(
        args: &RunArgs,
        config: &Config,
        interactive: bool,
    ) -> Result<Self, ConfigError> {
        let term = Term::stdout();

        let account = args
            .account
            .clone()
            .or_else(|| config.github.account.clone());
        let account = match account {
            Some(account) => account,
            None if interactive => {
                prompt(&term, "GitHub account", None)?.ok_or(ConfigError::Missing("account"))?
            }
            None => return Err(ConfigError::Missing("account")),
        };

        let github_token = match config.github.token.clone() {
            Some(token) => Some(token),
            None if interactive => prompt_secret(
                &term,
                "GitHub token (empty to mirror public repositories only)",
            )?,
            None => None,
        };

        let gitea_host = args.gitea_host.clone().or_else(|| config.gitea.host.clone());
        let gitea_host = match gitea_host {
            Some(host) => host,
            None if interactive => prompt(&term, "Gitea base URL", None)?
                .ok_or(ConfigError::Missing("gitea host"))?,
            None => return Err(ConfigError::Missing("gitea host")),
        };
        let gitea_host = gitea_host.trim_end_matches('/').to_string();

        let gitea_owner = args
            .gitea_owner
            .clone()
            .or_else(|| config.gitea.owner.clone());
        let gitea_owner = match gitea_owner {
            Some(owner) => owner,
            None if interactive => {
                prompt(&term, "Gitea owner", Some(&account))?.unwrap_or_else(|| account.clone())
            }
            None => account.clone(),
        };

        let gitea_token = match config.gitea.token.clone() {
            Some(token) => token,
            None if interactive => prompt_secret(&term, "Gitea token")?
                .ok_or(ConfigError::Missing("gitea token"))?,
            None => return Err(ConfigError::Missing("gitea token")),
        };

        let strategy = args
            .strategy
            .clone()
            .or_else(|| config.mirror.strategy.clone());
        let strategy = match strategy {
            Some(value) => value.parse::<MirrorStrategy>()?,
            None if interactive => {
                match prompt(&term, "Strategy (mirror/clone)", Some("mirror"))? {
                    Some(value) => value.parse::<MirrorStrategy>()?,
                    None => MirrorStrategy::default(),
                }
            }
            None => MirrorStrategy::default(),
        };

        let force_sync = if args.force_sync {
            true
        } else {
            match config.mirror.force_sync.as_deref() {
                Some(value) => force_sync_enabled(value),
                None if interactive => {
                    match prompt(&term, "Delete stale destination mirrors? (y/N)", Some("no"))? {
                        Some(value) => force_sync_enabled(&value),
                        None => false,
                    }
                }
                None => false,
            }
        };

        Ok(Self {
            account,
            github_token,
            gitea_host,
            gitea_owner,
            gitea_token,
            strategy,
            force_sync,
        })
    }
}

/// Prompt for a value on the terminal. Empty input falls back to `default`.
fn prompt(term: &Term, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
    match default {
        Some(default) => term.write_str(&format!("{} [{}]: ", label, default))?,
        None => term.write_str(&format!("{}: ", label))?,
    }
    let input = term.read_line()?;
    let input = input.trim();
    if input.is_empty() {
        Ok(default.map(str::to_string))
    } else {
        Ok(Some(input.to_string()))
    }
}

/// Prompt for a secret without echoing it. Empty input yields `None`.
fn prompt_secret(term: &Term, label: &str) -> io::Result<Option<String>> {
    term.write_str(&format!("{}: ", label))?;
    let input = term.read_secure_line()?;
    let input = input.trim();
    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
