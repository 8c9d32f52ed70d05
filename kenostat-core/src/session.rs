use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::analysis::{FrequencyTable, WindowAnalysis};
use crate::config::AnalysisConfig;
use crate::error::RunError;
use crate::history::{load_history, ExtractionMode, History};
use crate::models::Diagnostic;
use crate::source::{read_source, SourceKind, SourceText};

/// Résultat immuable d'une analyse de fichier.
#[derive(Debug, Clone)]
pub struct Report {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub mode: ExtractionMode,
    pub history: History,
    pub windows: Vec<WindowAnalysis>,
    pub frequencies: FrequencyTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn from_source(
        source: SourceText,
        mode: Option<ExtractionMode>,
        config: &AnalysisConfig,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let mode = mode.unwrap_or_else(|| ExtractionMode::default_for(source.kind));
        let loaded = load_history(&source.text, mode);
        let history = loaded.value;

        Ok(Report {
            windows: history.analyze(config),
            frequencies: history.frequency_table(None),
            path: source.path,
            kind: source.kind,
            mode,
            history,
            diagnostics: loaded.diagnostics,
        })
    }
}

pub fn build_report(
    path: Option<&Path>,
    mode: Option<ExtractionMode>,
    config: &AnalysisConfig,
) -> Result<Report, RunError> {
    let source = read_source(path)?;
    Report::from_source(source, mode, config)
}

#[derive(Debug, Clone, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success(Rc<Report>),
    Error(String),
}

/// État courant de l'analyseur. Chaque exécution remplace l'état d'un bloc ;
/// un échec laisse le dernier rapport réussi disponible.
#[derive(Debug, Default)]
pub struct Session {
    status: Status,
    last_report: Option<Rc<Report>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_deref()
    }

    /// `notify` reçoit chaque changement d'état, dans l'ordre.
    pub fn run(
        &mut self,
        path: Option<&Path>,
        mode: Option<ExtractionMode>,
        config: &AnalysisConfig,
        mut notify: impl FnMut(&Status),
    ) -> &Status {
        self.set(Status::Loading, &mut notify);

        let next = match build_report(path, mode, config) {
            Ok(report) => {
                let report = Rc::new(report);
                self.last_report = Some(Rc::clone(&report));
                Status::Success(report)
            }
            Err(e) => {
                log::warn!("Analyse échouée: {}", e);
                Status::Error(e.to_string())
            }
        };
        self.set(next, &mut notify);
        &self.status
    }

    fn set(&mut self, status: Status, notify: &mut impl FnMut(&Status)) {
        self.status = status;
        notify(&self.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn status_name(status: &Status) -> &'static str {
        match status {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success(_) => "success",
            Status::Error(_) => "error",
        }
    }

    #[test]
    fn test_report_from_marker_text() {
        let source = SourceText {
            path: PathBuf::from("draws.txt"),
            kind: SourceKind::Text,
            text: "Draw 5 12 47 BullsEye\nDraw 5 99 BullsEye\n".to_string(),
        };
        let report =
            Report::from_source(source, Some(ExtractionMode::Marker), &AnalysisConfig::default())
                .unwrap();
        assert_eq!(report.mode, ExtractionMode::Marker);
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.frequencies.count(5), 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.windows.len(), 1);
        assert_eq!(report.windows[0].draw_count, 2);
    }

    #[test]
    fn test_report_rejects_invalid_config() {
        let source = SourceText {
            path: PathBuf::from("draws.txt"),
            kind: SourceKind::Text,
            text: String::new(),
        };
        let config = AnalysisConfig {
            cold_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            Report::from_source(source, None, &config),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn test_session_transitions() {
        let line = "01/01/2024 12:00 PM A1 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 7 x2 N";
        let file = text_file(&format!("{line}\n"));
        let mut session = Session::new();
        assert!(matches!(session.status(), Status::Idle));

        let mut seen = Vec::new();
        session.run(Some(file.path()), None, &AnalysisConfig::default(), |s| {
            seen.push(status_name(s))
        });
        assert_eq!(seen, vec!["loading", "success"]);

        let report = session.last_report().unwrap();
        assert_eq!(report.mode, ExtractionMode::Records);
        assert_eq!(report.windows[0].average_multiplier, Some(2.0));
        assert_eq!(report.windows[0].average_bullseye, Some(7.0));
    }

    #[test]
    fn test_session_error_keeps_previous_report() {
        let file = text_file("Draw 1 2 3 BullsEye\n");
        let mut session = Session::new();
        session.run(
            Some(file.path()),
            Some(ExtractionMode::Marker),
            &AnalysisConfig::default(),
            |_| {},
        );
        assert!(matches!(session.status(), Status::Success(_)));

        let mut seen = Vec::new();
        let status = session.run(None, None, &AnalysisConfig::default(), |s| {
            seen.push(status_name(s))
        });
        match status {
            Status::Error(message) => assert_eq!(message, "Aucun fichier sélectionné"),
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(seen, vec!["loading", "error"]);
        assert_eq!(session.last_report().unwrap().history.len(), 1);
    }
}
