use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dénominateur des moyennes de bullseye et de multiplicateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AveragePolicy {
    /// Taille de la fenêtre ; une valeur illisible compte pour zéro.
    #[serde(rename = "window")]
    #[value(name = "window")]
    WindowSize,
    /// Nombre de valeurs lisibles seulement.
    #[serde(rename = "parsed")]
    #[value(name = "parsed")]
    ParsedOnly,
}

/// Fenêtre glissante : tout l'historique ou les `n` tirages les plus récents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WindowSpec {
    All,
    Last(usize),
}

impl WindowSpec {
    pub fn label(&self) -> String {
        match self {
            WindowSpec::All => "Tous les tirages".to_string(),
            WindowSpec::Last(n) => format!("{} derniers tirages", n),
        }
    }
}

impl std::fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowSpec::All => write!(f, "all"),
            WindowSpec::Last(n) => write!(f, "{}", n),
        }
    }
}

impl std::str::FromStr for WindowSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(WindowSpec::All);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(WindowSpec::Last(n)),
            _ => Err(ConfigError::InvalidWindow(s.to_string())),
        }
    }
}

impl TryFrom<String> for WindowSpec {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowSpec> for String {
    fn from(value: WindowSpec) -> Self {
        value.to_string()
    }
}

/// Liste séparée par des virgules : `all,10,20,50,100`.
pub fn parse_windows(s: &str) -> Result<Vec<WindowSpec>, ConfigError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub windows: Vec<WindowSpec>,
    pub hot_count: usize,
    pub cold_count: usize,
    pub average_policy: AveragePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            windows: vec![
                WindowSpec::All,
                WindowSpec::Last(10),
                WindowSpec::Last(20),
                WindowSpec::Last(50),
                WindowSpec::Last(100),
            ],
            hot_count: 10,
            cold_count: 10,
            average_policy: AveragePolicy::WindowSize,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows.is_empty() {
            return Err(ConfigError::NoWindows);
        }
        if self.windows.contains(&WindowSpec::Last(0)) {
            return Err(ConfigError::InvalidWindow("0".to_string()));
        }
        if self.hot_count == 0 {
            return Err(ConfigError::TooSmall { field: "hot_count" });
        }
        if self.cold_count == 0 {
            return Err(ConfigError::TooSmall { field: "cold_count" });
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalysisConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::debug!("Configuration chargée depuis {:?}", path);
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Sérialisation d'une structure sans clé dynamique : ne peut pas échouer.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
