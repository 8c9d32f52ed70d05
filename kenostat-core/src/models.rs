use serde::{Deserialize, Serialize};

/// Plus grand numéro du keno (numéros de 1 à 80).
pub const POOL_SIZE: u8 = 80;
/// Nombre de numéros gagnants d'un tirage complet.
pub const PICK_COUNT: usize = 20;

pub fn in_pool(n: u64) -> bool {
    (1..=POOL_SIZE as u64).contains(&n)
}

/// Numéros gagnants d'un tirage, dans l'ordre d'extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub numbers: Vec<u8>,
}

impl Draw {
    pub fn new(numbers: Vec<u8>) -> Self {
        Self { numbers }
    }

    pub fn is_complete(&self) -> bool {
        self.numbers.len() == PICK_COUNT
    }

    /// Numéros présents plusieurs fois, dans l'ordre de leur première répétition.
    pub fn duplicates(&self) -> Vec<u8> {
        let mut seen = [false; POOL_SIZE as usize + 1];
        let mut dups = Vec::new();
        for &n in &self.numbers {
            let idx = n as usize;
            if idx >= seen.len() {
                continue;
            }
            if seen[idx] && !dups.contains(&n) {
                dups.push(n);
            }
            seen[idx] = true;
        }
        dups
    }
}

/// Ligne de résultat complète : date, heure, identifiant, numéros et champs annexes.
///
/// Les champs texte sont conservés bruts ; seuls `bullseye_value` et
/// `multiplier_value` tentent une conversion numérique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub time: String,
    pub draw_id: String,
    pub numbers: Vec<u32>,
    pub bullseye: String,
    pub multiplier: String,
    pub bonus: String,
}

impl GameRecord {
    pub fn bullseye_value(&self) -> Option<f64> {
        self.bullseye.trim().parse::<u32>().ok().map(f64::from)
    }

    /// `x3` → 3.0, `3.5` → 3.5. Un seul caractère marqueur non numérique est retiré.
    pub fn multiplier_value(&self) -> Option<f64> {
        strip_marker(self.multiplier.trim())
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Numéros gagnants compris dans 1..=80.
    pub fn draw(&self) -> Draw {
        Draw::new(
            self.numbers
                .iter()
                .filter(|&&n| in_pool(n as u64))
                .map(|&n| n as u8)
                .collect(),
        )
    }
}

pub fn strip_marker(s: &str) -> &str {
    match s.chars().next() {
        Some(c) if !c.is_ascii_digit() => &s[c.len_utf8()..],
        _ => s,
    }
}

/// Valeurs annexes d'un tirage ; `None` quand le champ n'est pas numérique.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideFields {
    pub bullseye: Option<f64>,
    pub multiplier: Option<f64>,
}

/// Tout ce qui peut alimenter l'agrégateur : un tirage brut ou une ligne complète.
pub trait DrawSource {
    fn winning_numbers(&self) -> Vec<u32>;
    /// `None` pour les sources sans bullseye ni multiplicateur.
    fn side_fields(&self) -> Option<SideFields>;
}

impl DrawSource for Draw {
    fn winning_numbers(&self) -> Vec<u32> {
        self.numbers.iter().map(|&n| n as u32).collect()
    }

    fn side_fields(&self) -> Option<SideFields> {
        None
    }
}

impl DrawSource for GameRecord {
    fn winning_numbers(&self) -> Vec<u32> {
        self.numbers.clone()
    }

    fn side_fields(&self) -> Option<SideFields> {
        Some(SideFields {
            bullseye: self.bullseye_value(),
            multiplier: self.multiplier_value(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberCount {
    pub number: u8,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    TooFewTokens { found: usize },
    NoNumericRun,
    OutOfRange { value: u64 },
    InvalidNumber { token: String },
    DuplicateNumber { value: u8 },
    MissingSideField { field: &'static str },
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::TooFewTokens { found } => {
                write!(f, "ligne trop courte ({} champs, 4 minimum)", found)
            }
            DiagnosticKind::NoNumericRun => write!(f, "aucun numéro trouvé"),
            DiagnosticKind::OutOfRange { value } => {
                write!(f, "numéro {} hors limites (1-{})", value, POOL_SIZE)
            }
            DiagnosticKind::InvalidNumber { token } => write!(f, "numéro illisible '{}'", token),
            DiagnosticKind::DuplicateNumber { value } => write!(f, "numéro {} en double", value),
            DiagnosticKind::MissingSideField { field } => write!(f, "champ {} absent", field),
        }
    }
}

/// Élément ignoré ou douteux rencontré pendant une lecture tolérante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Numéro de ligne (ou de fragment) à partir de 1.
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ligne {}: {}", self.line, self.kind)
    }
}

/// Résultat d'une lecture tolérante : la meilleure valeur possible et ce qui a été écarté.
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Lenient<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lenient<U> {
        Lenient {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// Tirages complets et distincts, du plus récent (index 0) au plus ancien.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            Draw::new(
                (0..PICK_COUNT)
                    .map(|k| ((i * 3 + k * 4) % POOL_SIZE as usize) as u8 + 1)
                    .collect(),
            )
        })
        .collect()
}

pub fn make_test_records(n: usize) -> Vec<GameRecord> {
    make_test_draws(n)
        .into_iter()
        .enumerate()
        .map(|(i, draw)| GameRecord {
            date: format!("01/{:02}/2024", (i % 28) + 1),
            time: "12:00 PM".to_string(),
            draw_id: format!("D{:04}", i),
            numbers: draw.numbers.iter().map(|&n| n as u32).collect(),
            bullseye: ((i % 80) + 1).to_string(),
            multiplier: format!("x{}", (i % 4) + 1),
            bonus: "N".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_pool_bounds() {
        assert!(!in_pool(0));
        assert!(in_pool(1));
        assert!(in_pool(80));
        assert!(!in_pool(81));
    }

    #[test]
    fn test_multiplier_strips_marker() {
        let record = GameRecord {
            multiplier: "x3".into(),
            ..Default::default()
        };
        assert_eq!(record.multiplier_value(), Some(3.0));

        let record = GameRecord {
            multiplier: "2.5".into(),
            ..Default::default()
        };
        assert_eq!(record.multiplier_value(), Some(2.5));
    }

    #[test]
    fn test_multiplier_garbage_is_none() {
        for raw in ["", "x", "N", "xx3", "xinf"] {
            let record = GameRecord {
                multiplier: raw.into(),
                ..Default::default()
            };
            assert_eq!(record.multiplier_value(), None, "multiplier '{}'", raw);
        }
    }

    #[test]
    fn test_bullseye_value() {
        let record = GameRecord {
            bullseye: "7".into(),
            ..Default::default()
        };
        assert_eq!(record.bullseye_value(), Some(7.0));

        let record = GameRecord {
            bullseye: "x3".into(),
            ..Default::default()
        };
        assert_eq!(record.bullseye_value(), None);
    }

    #[test]
    fn test_record_draw_keeps_in_range_only() {
        let record = GameRecord {
            numbers: vec![1234, 5, 80, 0, 81, 9],
            ..Default::default()
        };
        assert_eq!(record.draw().numbers, vec![5, 80, 9]);
    }

    #[test]
    fn test_draw_duplicates() {
        let draw = Draw::new(vec![1, 2, 1, 3, 2, 1]);
        assert_eq!(draw.duplicates(), vec![1, 2]);
        assert!(Draw::new(vec![4, 5, 6]).duplicates().is_empty());
    }

    #[test]
    fn test_make_test_draws_are_valid() {
        for draw in make_test_draws(40) {
            assert!(draw.is_complete());
            assert!(draw.duplicates().is_empty());
            assert!(draw.numbers.iter().all(|&n| in_pool(n as u64)));
        }
    }

    #[test]
    fn test_side_fields_only_for_records() {
        let draws = make_test_draws(1);
        assert_eq!(draws[0].side_fields(), None);
        let records = make_test_records(1);
        let fields = records[0].side_fields().unwrap();
        assert_eq!(fields.bullseye, Some(1.0));
        assert_eq!(fields.multiplier, Some(1.0));
    }
}
