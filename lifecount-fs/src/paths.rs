use std::{fs, path::PathBuf};

use eyre::{eyre, Result, WrapErr};

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| eyre!("could not find a home directory"))
}

pub fn config_dir() -> Result<PathBuf> {
    let path = home()?.join(".config").join("lifecount");
    fs::create_dir_all(&path).wrap_err_with(|| format!("creating {}", path.display()))?;
    Ok(path)
}

pub fn share_dir() -> Result<PathBuf> {
    let path = home()?.join(".local/share/lifecount");
    fs::create_dir_all(&path).wrap_err_with(|| format!("creating {}", path.display()))?;
    Ok(path)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn default_activities_path() -> Result<PathBuf> {
    Ok(share_dir()?.join("activities.json"))
}
