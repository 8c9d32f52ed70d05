//! Lecture des lignes de résultats complètes :
//! `<date> <heure> <AM/PM> <tirage> <numéros...> <bullseye> <multiplicateur> <bonus>`.
//!
//! Les positions sont fixes et rien n'est validé. Le début des numéros est le
//! premier jeton entièrement numérique, ce qui suppose que l'identifiant du
//! tirage ne l'est pas.

use crate::extract::is_digits;
use crate::models::{Diagnostic, DiagnosticKind, GameRecord, Lenient};

const TRAILING_FIELDS: usize = 3;
const MIN_TOKENS: usize = 4;

pub fn parse_record_line(line: &str) -> Lenient<GameRecord> {
    parse_line_at(line, 1)
}

fn parse_line_at(line: &str, line_no: usize) -> Lenient<GameRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut diagnostics = Vec::new();
    let mut diag = |kind| diagnostics.push(Diagnostic { line: line_no, kind });

    if tokens.len() < MIN_TOKENS {
        diag(DiagnosticKind::TooFewTokens { found: tokens.len() });
    }

    let token = |i: usize| tokens.get(i).copied().unwrap_or_default();
    let time = tokens
        .get(1..3.min(tokens.len()))
        .unwrap_or_default()
        .join(" ");

    let numbers_end = tokens.len().saturating_sub(TRAILING_FIELDS);
    let mut numbers = Vec::new();
    match tokens.iter().position(|t| is_digits(t)) {
        Some(start) => {
            for t in tokens.iter().take(numbers_end).skip(start) {
                if !is_digits(t) {
                    continue;
                }
                match t.parse::<u32>() {
                    Ok(n) => numbers.push(n),
                    Err(_) => diag(DiagnosticKind::InvalidNumber {
                        token: t.to_string(),
                    }),
                }
            }
        }
        None => diag(DiagnosticKind::NoNumericRun),
    }

    let trailing = &tokens[numbers_end..];
    let trailing_field = |i: usize| trailing.get(i).copied().unwrap_or_default().to_string();

    let record = GameRecord {
        date: token(0).to_string(),
        time,
        draw_id: token(3).to_string(),
        numbers,
        bullseye: trailing_field(0),
        multiplier: trailing_field(1),
        bonus: trailing_field(2),
    };

    if tokens.len() >= MIN_TOKENS {
        if record.bullseye_value().is_none() {
            diag(DiagnosticKind::MissingSideField { field: "bullseye" });
        }
        if record.multiplier_value().is_none() {
            diag(DiagnosticKind::MissingSideField { field: "multiplier" });
        }
    }

    Lenient::new(record, diagnostics)
}

/// Une fiche par ligne non vide, dans l'ordre du texte.
pub fn parse_records(text: &str) -> Lenient<Vec<GameRecord>> {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = parse_line_at(line, idx + 1);
        records.push(parsed.value);
        diagnostics.extend(parsed.diagnostics);
    }

    log::debug!(
        "{} fiches lues, {} diagnostics",
        records.len(),
        diagnostics.len()
    );
    Lenient::new(records, diagnostics)
}
