use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use kenostat_core::analysis::{FrequencyTable, WindowAnalysis};
use kenostat_core::history::History;
use kenostat_core::models::{Draw, GameRecord};

use crate::import::ImportSummary;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn numbers_str(numbers: &[u8]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort();
    sorted
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_import_summary(summary: &ImportSummary) {
    println!("Import terminé : {}", summary.path.display());
    println!("  Source            : {}", summary.kind);
    println!("  Mode d'extraction : {}", summary.mode);
    println!("  Tirages reconnus  : {}", summary.draws);
    if summary.incomplete > 0 {
        println!("  Tirages incomplets: {}", summary.incomplete);
    }
    if summary.ignored_numbers > 0 {
        println!("  Numéros hors 1-80 : {}", summary.ignored_numbers);
    }
    if summary.diagnostics > 0 {
        println!("  Avertissements    : {} (RUST_LOG=warn pour le détail)", summary.diagnostics);
    }
}

pub fn display_windows(analyses: &[WindowAnalysis]) {
    if analyses.is_empty() {
        println!("\nAucune fenêtre analysable : pas assez de tirages.");
        return;
    }

    for analysis in analyses {
        println!("\n📊 {} ({} tirages)\n", analysis.label, analysis.draw_count);

        let mut table = new_table(vec!["Rang", "Chaud", "Sorties", "Froid", "Sorties"]);
        let rows = analysis.hot.len().max(analysis.cold.len());
        for i in 0..rows {
            let hot = analysis.hot.get(i);
            let cold = analysis.cold.get(i);
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(hot.map_or(String::new(), |c| format!("{:2}", c.number)))
                    .fg(Color::Green),
                Cell::new(hot.map_or(String::new(), |c| c.count.to_string())),
                Cell::new(cold.map_or(String::new(), |c| format!("{:2}", c.number)))
                    .fg(Color::Red),
                Cell::new(cold.map_or(String::new(), |c| c.count.to_string())),
            ]);
        }
        println!("{table}");

        if let Some(multiplier) = analysis.average_multiplier {
            println!("  Multiplicateur moyen : {:.2}x", multiplier);
        }
        if let Some(bullseye) = analysis.average_bullseye {
            println!("  BullsEye moyen       : {:.1}", bullseye);
        }
    }
}

pub fn display_frequencies(table: &FrequencyTable) {
    println!("\n📊 Fréquences sur {} tirages\n", table.draw_count());

    let mut out = new_table(vec!["Numéro", "Fréquence", "Retard"]);
    for stat in table.by_frequency() {
        out.add_row(vec![
            format!("{:2}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{out}");
}

pub fn display_draws(history: &History, last: usize) {
    if history.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    match history.records() {
        Some(records) => display_records(&records[..last.min(records.len())]),
        None => {
            let draws = history.draws();
            display_plain_draws(&draws[..last.min(draws.len())]);
        }
    }
}

fn display_records(records: &[GameRecord]) {
    let mut table = new_table(vec![
        "Date", "Heure", "Tirage", "Numéros", "BullsEye", "Multiplicateur", "Bonus",
    ]);
    for record in records {
        table.add_row(vec![
            record.date.clone(),
            record.time.clone(),
            record.draw_id.clone(),
            numbers_str(&record.draw().numbers),
            record.bullseye.clone(),
            record.multiplier.clone(),
            record.bonus.clone(),
        ]);
    }
    println!("{table}");
}

fn display_plain_draws(draws: &[Draw]) {
    let mut table = new_table(vec!["#", "Numéros", "Nb"]);
    for (i, draw) in draws.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            numbers_str(&draw.numbers),
            draw.numbers.len().to_string(),
        ]);
    }
    println!("{table}");
}
