use serde::Serialize;

use crate::config::{AnalysisConfig, AveragePolicy, WindowSpec};
use crate::models::{in_pool, DrawSource, NumberCount, NumberStats, SideFields, POOL_SIZE};

/// Fréquence et retard de chaque numéro de 1 à 80 sur un ensemble de tirages.
///
/// Chaque numéro a toujours une entrée ; un numéro jamais sorti vaut 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    stats: Vec<NumberStats>,
    draw_count: usize,
    ignored: usize,
}

impl FrequencyTable {
    /// `records[0]` est le tirage le plus récent.
    pub fn from_sources<S: DrawSource>(records: &[S]) -> Self {
        let mut stats: Vec<NumberStats> = (1..=POOL_SIZE)
            .map(|n| NumberStats {
                number: n,
                frequency: 0,
                gap: records.len() as u32,
            })
            .collect();
        let mut seen = vec![false; stats.len()];
        let mut ignored = 0;

        for (i, record) in records.iter().enumerate() {
            for n in record.winning_numbers() {
                if !in_pool(n as u64) {
                    ignored += 1;
                    continue;
                }
                let idx = (n - 1) as usize;
                stats[idx].frequency += 1;
                if !seen[idx] {
                    seen[idx] = true;
                    stats[idx].gap = i as u32;
                }
            }
        }

        Self {
            stats,
            draw_count: records.len(),
            ignored,
        }
    }

    pub fn count(&self, number: u8) -> u32 {
        number
            .checked_sub(1)
            .and_then(|idx| self.stats.get(idx as usize))
            .map_or(0, |s| s.frequency)
    }

    pub fn stats(&self) -> &[NumberStats] {
        &self.stats
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Numéros hors de 1..=80 rencontrés et non comptés.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Fréquence décroissante, numéro croissant à égalité.
    pub fn by_frequency(&self) -> Vec<NumberStats> {
        let mut sorted = self.stats.clone();
        sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
        sorted
    }

    pub fn hot(&self, n: usize) -> Vec<NumberCount> {
        self.by_frequency()
            .into_iter()
            .take(n)
            .map(to_count)
            .collect()
    }

    /// Le moins fréquent en premier, numéro croissant à égalité.
    pub fn cold(&self, n: usize) -> Vec<NumberCount> {
        let mut sorted = self.stats.clone();
        sorted.sort_by(|a, b| a.frequency.cmp(&b.frequency).then(a.number.cmp(&b.number)));
        sorted.into_iter().take(n).map(to_count).collect()
    }
}

fn to_count(stat: NumberStats) -> NumberCount {
    NumberCount {
        number: stat.number,
        count: stat.frequency,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAnalysis {
    pub label: String,
    pub window: WindowSpec,
    pub draw_count: usize,
    pub hot: Vec<NumberCount>,
    pub cold: Vec<NumberCount>,
    pub average_multiplier: Option<f64>,
    pub average_bullseye: Option<f64>,
}

fn average(values: &[Option<f64>], policy: AveragePolicy) -> Option<f64> {
    let parsed: Vec<f64> = values.iter().flatten().copied().collect();
    let denominator = match policy {
        AveragePolicy::WindowSize => values.len(),
        AveragePolicy::ParsedOnly => parsed.len(),
    };
    if denominator == 0 {
        return None;
    }
    Some(parsed.iter().sum::<f64>() / denominator as f64)
}

fn side_averages<S: DrawSource>(
    records: &[S],
    policy: AveragePolicy,
) -> (Option<f64>, Option<f64>) {
    let fields: Vec<Option<SideFields>> = records.iter().map(|r| r.side_fields()).collect();
    if fields.iter().all(Option::is_none) {
        return (None, None);
    }
    let fields: Vec<SideFields> = fields.into_iter().map(Option::unwrap_or_default).collect();
    let multipliers: Vec<Option<f64>> = fields.iter().map(|f| f.multiplier).collect();
    let bullseyes: Vec<Option<f64>> = fields.iter().map(|f| f.bullseye).collect();
    (average(&multipliers, policy), average(&bullseyes, policy))
}

/// Analyse des `size` tirages les plus récents. `None` si la fenêtre dépasse
/// l'historique ou ne contient aucun tirage.
pub fn analyze_window<S: DrawSource>(
    records: &[S],
    window: WindowSpec,
    config: &AnalysisConfig,
) -> Option<WindowAnalysis> {
    let size = match window {
        WindowSpec::All => records.len(),
        WindowSpec::Last(n) if n > records.len() => return None,
        WindowSpec::Last(n) => n,
    };
    if size == 0 {
        return None;
    }

    let slice = &records[..size];
    let table = FrequencyTable::from_sources(slice);
    let (average_multiplier, average_bullseye) = side_averages(slice, config.average_policy);

    Some(WindowAnalysis {
        label: window.label(),
        window,
        draw_count: size,
        hot: table.hot(config.hot_count),
        cold: table.cold(config.cold_count),
        average_multiplier,
        average_bullseye,
    })
}

/// Une analyse par fenêtre retenue, dans l'ordre de la configuration.
pub fn analyze_windows<S: DrawSource>(
    records: &[S],
    config: &AnalysisConfig,
) -> Vec<WindowAnalysis> {
    config
        .windows
        .iter()
        .filter_map(|&window| {
            let analysis = analyze_window(records, window, config);
            if analysis.is_none() {
                log::debug!(
                    "Fenêtre {} ignorée ({} tirages disponibles)",
                    window,
                    records.len()
                );
            }
            analysis
        })
        .collect()
}
