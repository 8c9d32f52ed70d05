mod display;
mod export;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kenostat_core::config::{parse_windows, AnalysisConfig, AveragePolicy};
use kenostat_core::history::ExtractionMode;

use crate::display::{
    display_draws, display_frequencies, display_import_summary, display_windows,
};
use crate::import::{load_report, ImportSummary};

#[derive(Parser)]
#[command(name = "kenostat", about = "Analyseur de fréquences Keno")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Numéros chauds et froids, moyennes, par fenêtre de tirages
    Analyze {
        /// Fichier de résultats (texte ou PDF)
        file: Option<PathBuf>,

        /// Stratégie d'extraction (défaut: scan pour un PDF, records sinon)
        #[arg(short, long)]
        mode: Option<ExtractionMode>,

        /// Fenêtres d'analyse (séparées par des virgules, ex: all,10,20,50,100)
        #[arg(short, long)]
        windows: Option<String>,

        /// Nombre de numéros chauds
        #[arg(long)]
        hot: Option<usize>,

        /// Nombre de numéros froids
        #[arg(long)]
        cold: Option<usize>,

        /// Dénominateur des moyennes
        #[arg(long)]
        average: Option<AveragePolicy>,

        /// Fichier de configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sortie JSON au lieu des tableaux
        #[arg(long)]
        json: bool,
    },

    /// Fréquence et retard des 80 numéros
    Frequencies {
        /// Fichier de résultats (texte ou PDF)
        file: Option<PathBuf>,

        /// Stratégie d'extraction
        #[arg(short, long)]
        mode: Option<ExtractionMode>,

        /// Nombre de tirages récents à prendre en compte
        #[arg(short, long)]
        window: Option<usize>,

        /// Exporter la table au format CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Lister les tirages extraits, du plus récent au plus ancien
    List {
        /// Fichier de résultats (texte ou PDF)
        file: Option<PathBuf>,

        /// Stratégie d'extraction
        #[arg(short, long)]
        mode: Option<ExtractionMode>,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Écrire la configuration par défaut
    Config {
        /// Fichier de sortie (affichée sur la sortie standard sinon)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            file,
            mode,
            windows,
            hot,
            cold,
            average,
            config,
            json,
        } => {
            let config = build_config(config.as_deref(), windows.as_deref(), hot, cold, average)?;
            cmd_analyze(file.as_deref(), mode, &config, json)
        }
        Command::Frequencies {
            file,
            mode,
            window,
            export,
        } => cmd_frequencies(file.as_deref(), mode, window, export.as_deref()),
        Command::List { file, mode, last } => cmd_list(file.as_deref(), mode, last),
        Command::Config { output } => cmd_config(output.as_deref()),
    }
}

/// Configuration du fichier (ou par défaut), surchargée par les options de la ligne de commande.
fn build_config(
    path: Option<&Path>,
    windows: Option<&str>,
    hot: Option<usize>,
    cold: Option<usize>,
    average: Option<AveragePolicy>,
) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(windows) = windows {
        config.windows = parse_windows(windows).context("Format de fenêtres invalide")?;
    }
    if let Some(hot) = hot {
        config.hot_count = hot;
    }
    if let Some(cold) = cold {
        config.cold_count = cold;
    }
    if let Some(average) = average {
        config.average_policy = average;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_analyze(
    file: Option<&Path>,
    mode: Option<ExtractionMode>,
    config: &AnalysisConfig,
    json: bool,
) -> Result<()> {
    let report = load_report(file, mode, config)?;

    if json {
        let out = serde_json::to_string_pretty(&report.windows)?;
        println!("{out}");
        return Ok(());
    }

    display_import_summary(&ImportSummary::from_report(&report));
    display_windows(&report.windows);
    Ok(())
}

fn cmd_frequencies(
    file: Option<&Path>,
    mode: Option<ExtractionMode>,
    window: Option<usize>,
    export: Option<&Path>,
) -> Result<()> {
    let report = load_report(file, mode, &AnalysisConfig::default())?;
    display_import_summary(&ImportSummary::from_report(&report));

    if report.history.is_empty() {
        println!("Aucun tirage reconnu dans le fichier.");
        return Ok(());
    }

    let table = report.history.frequency_table(window);
    display_frequencies(&table);

    if let Some(path) = export {
        export::export_frequencies(&table, path)?;
        println!("\nTable exportée dans {}", path.display());
    }
    Ok(())
}

fn cmd_list(file: Option<&Path>, mode: Option<ExtractionMode>, last: usize) -> Result<()> {
    let report = load_report(file, mode, &AnalysisConfig::default())?;
    display_import_summary(&ImportSummary::from_report(&report));
    display_draws(&report.history, last);
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> Result<()> {
    let config = AnalysisConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Configuration sauvegardée dans {}", path.display());
        }
        None => println!("{}", config.to_json()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kenostat_core::config::WindowSpec;

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(None, None, None, None, None).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_build_config_overrides() {
        let config = build_config(
            None,
            Some("all,4"),
            Some(4),
            Some(4),
            Some(AveragePolicy::ParsedOnly),
        )
        .unwrap();
        assert_eq!(config.windows, vec![WindowSpec::All, WindowSpec::Last(4)]);
        assert_eq!(config.hot_count, 4);
        assert_eq!(config.cold_count, 4);
        assert_eq!(config.average_policy, AveragePolicy::ParsedOnly);
    }

    #[test]
    fn test_build_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"hot_count": 4, "cold_count": 4}"#).unwrap();

        let config = build_config(Some(&path), None, None, Some(6), None).unwrap();
        assert_eq!(config.hot_count, 4);
        assert_eq!(config.cold_count, 6);
    }

    #[test]
    fn test_build_config_rejects_invalid() {
        assert!(build_config(None, Some("10,x"), None, None, None).is_err());
        assert!(build_config(None, None, Some(0), None, None).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "kenostat",
            "analyze",
            "results.pdf",
            "--mode",
            "scan",
            "--windows",
            "all,10",
            "--average",
            "parsed",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze {
                file,
                mode,
                windows,
                average,
                json,
                ..
            } => {
                assert_eq!(file, Some(PathBuf::from("results.pdf")));
                assert_eq!(mode, Some(ExtractionMode::Scan));
                assert_eq!(windows.as_deref(), Some("all,10"));
                assert_eq!(average, Some(AveragePolicy::ParsedOnly));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }
}
