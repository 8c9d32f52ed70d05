use std::path::Path;

use anyhow::{Context, Result};

use kenostat_core::analysis::FrequencyTable;

/// Une ligne par numéro, de 1 à 80 : `number,frequency,gap`.
pub fn export_frequencies(table: &FrequencyTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;
    writer.write_record(["number", "frequency", "gap"])?;
    for stat in table.stats() {
        writer.write_record([
            stat.number.to_string(),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ])?;
    }
    writer.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}
