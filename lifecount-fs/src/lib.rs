use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use lifecount_core::{Activity, ActivityFile, Settings, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod paths;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the activity data lives, if not in the default spot.
    pub activities_path: Option<PathBuf>,
    pub profile: UserProfile,
    pub settings: Settings,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Loads the config from the default location, creating it if it's missing.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::config_path()?)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            info!("no config at {}, writing defaults", path.display());
            let config = Self::default().at(path);
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;

        match toml::from_str::<Self>(&contents) {
            Ok(config) => Ok(config.at(path)),
            Err(e) => {
                let backup = path.with_extension("toml.invalid");
                warn!("invalid config, moving it to {}: {e}", backup.display());
                fs::rename(&path, &backup)
                    .wrap_err_with(|| format!("moving invalid config {}", path.display()))?;
                let config = Self::default().at(path);
                config.save()?;
                Ok(config)
            }
        }
    }

    fn at(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Writes back to wherever it was loaded from, or the default location.
    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => paths::config_path()?,
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string(self).wrap_err("serializing config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("creating {}", parent.display()))?;
        }
        fs::write(path, toml).wrap_err_with(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Swaps in a new profile and persists it right away.
    pub fn set_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.profile = profile;
        self.save()
    }

    pub fn activities_path(&self) -> Result<PathBuf> {
        match &self.activities_path {
            Some(path) => Ok(path.clone()),
            None => paths::default_activities_path(),
        }
    }
}

/// Reads an activities file, in either the wrapped or the bare-list form. Records
/// that can't be made sense of are skipped.
pub fn load_activities(path: &Path) -> Result<Vec<Activity>> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading activities from {}", path.display()))?;
    let file = ActivityFile::from_json(&json)
        .wrap_err_with(|| format!("parsing activities in {}", path.display()))?;

    if let Some(version) = file.metadata().and_then(|meta| meta.version.as_deref()) {
        info!("activity data version {version}");
    }

    let activities = file.into_activities();
    info!("read {} activities from {}", activities.len(), path.display());
    Ok(activities)
}
