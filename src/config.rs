use crate::data::CsvOptions;
use crate::error::{Result, TidyError};
use crate::plot::{MAX_BINS, PlotSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file, consulted when no
/// explicit path is given.
pub const CONFIG_ENV_VAR: &str = "TIDYFRAME_CONFIG";

/// User-tunable defaults. Every field is optional in the JSON file; missing
/// ones take their default value.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plot: PlotSettings,
    pub csv: CsvOptions,
}

impl AppConfig {
    /// Loads the configuration from `path`, else from `$TIDYFRAME_CONFIG`,
    /// else returns the defaults.
    ///
    /// # Errors
    ///
    /// [`TidyError::Config`] when the chosen file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match resolve_path(path) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TidyError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            TidyError::Config(msg) => TidyError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        let plot = &self.plot;
        if plot.bins == 0 || plot.bins > MAX_BINS {
            return Err(TidyError::Config(format!(
                "plot.bins must be between 1 and {MAX_BINS}"
            )));
        }
        if plot.top_n == 0 {
            return Err(TidyError::Config("plot.top_n must be at least 1".to_owned()));
        }
        if plot.dpi == 0 {
            return Err(TidyError::Config("plot.dpi must be positive".to_owned()));
        }
        Ok(())
    }
}

fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}
