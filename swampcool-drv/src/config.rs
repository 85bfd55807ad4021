use std::fs;
use std::path::{Path, PathBuf};

use crate::err::SwampError;
use serde::{Deserialize, Serialize};
use swampcool_lib::forecast::DEFAULT_MAX_AGE_HOURS;
use swampcool_lib::locator::DEFAULT_MAX_SKIP;
use swampcool_lib::{CurrentIndexLocator, SmartParams, Thresholds};

/// weather.gov grid for Albuquerque, NM
pub const DEFAULT_URL: &str = "https://api.weather.gov/gridpoints/ABQ/101,119";
pub const DEFAULT_USER_AGENT: &str = "Smart Swamp-Cooler Controller";

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct Settings {
    /// weather.gov gridpoint forecast
    pub url: String,
    /// weather.gov rejects requests without one
    pub user_agent: String,
    pub retry_secs: u64,
    pub max_age_hours: i64,
    pub max_skip: u32,
    pub smart: SmartParams,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_secs: 5,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            max_skip: DEFAULT_MAX_SKIP,
            smart: SmartParams::default(),
            thresholds: Thresholds::default(),
        }
    }
}

fn config_dir() -> Box<Path> {
    directories::ProjectDirs::from("", "", "swampcool").map_or_else(
        || Path::new("/tmp").into(),
        |proj_dirs| proj_dirs.config_dir().into(),
    )
}

#[must_use]
pub fn default_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl Settings {
    /// Reads `path`, or the defaults when there is no such file.
    pub fn load(path: &Path) -> Result<Self, SwampError> {
        Ok(if path.exists() {
            let read = fs::read_to_string(path)?;
            toml::from_str(&read)?
        } else {
            tracing::debug!("no settings at {}, using defaults", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SwampError> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let toml = toml::to_string(&self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    #[must_use]
    pub const fn locator(&self) -> CurrentIndexLocator {
        CurrentIndexLocator::new(self.max_skip)
    }
}
