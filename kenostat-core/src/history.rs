use serde::{Deserialize, Serialize};

use crate::analysis::{analyze_windows, FrequencyTable, WindowAnalysis};
use crate::config::AnalysisConfig;
use crate::extract::{extract_marked, extract_numeric_runs};
use crate::fields::parse_records;
use crate::models::{Draw, GameRecord, Lenient};
use crate::source::SourceKind;

/// Stratégie d'extraction, toujours choisie par l'appelant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Lignes « Draw <numéros> BullsEye »
    Marker,
    /// Suites de 20 numéros dans un texte libre (PDF)
    Scan,
    /// Lignes complètes date/heure/tirage/numéros/bullseye/multiplicateur/bonus
    Records,
}

impl ExtractionMode {
    /// Mode par défaut quand l'utilisateur n'en précise pas.
    pub fn default_for(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Pdf => ExtractionMode::Scan,
            SourceKind::Text => ExtractionMode::Records,
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::Marker => write!(f, "marker"),
            ExtractionMode::Scan => write!(f, "scan"),
            ExtractionMode::Records => write!(f, "records"),
        }
    }
}

/// Historique extrait, du plus récent au plus ancien.
///
/// Le balayage numérique inverse lui-même le texte ; les deux autres modes
/// gardent l'ordre du fichier, supposé déjà du plus récent au plus ancien.
#[derive(Debug, Clone, PartialEq)]
pub enum History {
    Draws(Vec<Draw>),
    Records(Vec<GameRecord>),
}

impl History {
    pub fn len(&self) -> usize {
        match self {
            History::Draws(draws) => draws.len(),
            History::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn draws(&self) -> Vec<Draw> {
        match self {
            History::Draws(draws) => draws.clone(),
            History::Records(records) => records.iter().map(GameRecord::draw).collect(),
        }
    }

    pub fn records(&self) -> Option<&[GameRecord]> {
        match self {
            History::Draws(_) => None,
            History::Records(records) => Some(records),
        }
    }

    pub fn analyze(&self, config: &AnalysisConfig) -> Vec<WindowAnalysis> {
        match self {
            History::Draws(draws) => analyze_windows(draws, config),
            History::Records(records) => analyze_windows(records, config),
        }
    }

    /// Table de fréquences des `window` tirages les plus récents (tout l'historique si `None`).
    pub fn frequency_table(&self, window: Option<usize>) -> FrequencyTable {
        let size = window.map_or(self.len(), |w| w.min(self.len()));
        match self {
            History::Draws(draws) => FrequencyTable::from_sources(&draws[..size]),
            History::Records(records) => FrequencyTable::from_sources(&records[..size]),
        }
    }
}

pub fn load_history(text: &str, mode: ExtractionMode) -> Lenient<History> {
    match mode {
        ExtractionMode::Marker => extract_marked(text).map(History::Draws),
        ExtractionMode::Scan => extract_numeric_runs(text).map(History::Draws),
        ExtractionMode::Records => parse_records(text).map(History::Records),
    }
}
