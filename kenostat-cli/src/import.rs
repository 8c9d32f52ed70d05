use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Result};

use kenostat_core::config::AnalysisConfig;
use kenostat_core::history::ExtractionMode;
use kenostat_core::session::{Report, Session, Status};
use kenostat_core::source::SourceKind;

pub struct ImportSummary {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub mode: ExtractionMode,
    pub draws: usize,
    pub incomplete: usize,
    pub ignored_numbers: usize,
    pub diagnostics: usize,
}

impl ImportSummary {
    pub fn from_report(report: &Report) -> Self {
        ImportSummary {
            path: report.path.clone(),
            kind: report.kind,
            mode: report.mode,
            draws: report.history.len(),
            incomplete: report
                .history
                .draws()
                .iter()
                .filter(|d| !d.is_complete())
                .count(),
            ignored_numbers: report.frequencies.ignored(),
            diagnostics: report.diagnostics.len(),
        }
    }
}

/// Lit et analyse le fichier ; les lignes écartées sont signalées dans les logs.
pub fn load_report(
    file: Option<&Path>,
    mode: Option<ExtractionMode>,
    config: &AnalysisConfig,
) -> Result<Rc<Report>> {
    let mut session = Session::new();
    let status = session.run(file, mode, config, |status| match status {
        Status::Loading => log::info!("Lecture de {:?}...", file.unwrap_or(Path::new("-"))),
        Status::Success(report) => log::info!(
            "{} tirages extraits (mode {})",
            report.history.len(),
            report.mode
        ),
        Status::Error(message) => log::error!("{}", message),
        Status::Idle => {}
    });

    match status {
        Status::Success(report) => {
            for diagnostic in &report.diagnostics {
                log::warn!("{}", diagnostic);
            }
            Ok(Rc::clone(report))
        }
        Status::Error(message) => bail!("{}", message),
        Status::Idle | Status::Loading => bail!("Analyse interrompue"),
    }
}
