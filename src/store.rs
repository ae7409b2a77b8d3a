use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{format_err, Context, Result};
use log::info;

use crate::config::Config;

const CONFIG_FILE: &str = "config.yaml";

pub fn data_dir() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("com", "opendota", "opendota")
        .ok_or_else(|| format_err!("Cannot retrieve project dirs"))?;
    Ok(project_dirs.data_dir().to_owned())
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(CONFIG_FILE))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_file_path()?)
}

/// Missing file means default configuration.
pub fn load_config_from(path: &Path) -> Result<Config> {
    info!("Config file: {}", path.to_string_lossy());
    if !path.exists() {
        info!("Config file does not exist, using defaults.");
        return Ok(Config::default());
    }
    let config_file =
        File::open(path).with_context(|| format!("Cannot open {}", path.to_string_lossy()))?;
    serde_yaml::from_reader(config_file)
        .with_context(|| format!("Invalid config file {}", path.to_string_lossy()))
}

pub fn store_config_to(path: &Path, config: &Config) -> Result<()> {
    ensure_dir_created(path)?;
    let config_file = File::create(path)?;
    Ok(serde_yaml::to_writer(config_file, config)?)
}

pub fn store_default_config(path: &Path) -> Result<()> {
    store_config_to(path, &Config::default())
}

fn ensure_dir_created(path: &Path) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", &dir.to_string_lossy()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn missing_config_file_gives_defaults() -> Result<()> {
        let dir = TempDir::new("opendota")?;
        let config = load_config_from(&dir.path().join("nope.yaml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn stored_config_loads_back() -> Result<()> {
        let dir = TempDir::new("opendota")?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            hostname: Some("https://mirror.local/api".into()),
            api_key: Some("k".into()),
            max_retries: Some(3),
            ..Default::default()
        };
        store_config_to(&path, &config)?;
        assert_eq!(load_config_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn invalid_config_file_is_an_error() -> Result<()> {
        let dir = TempDir::new("opendota")?;
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "cooldownMs: [not, a, number]")?;
        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));
        Ok(())
    }
}
