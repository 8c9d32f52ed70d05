use crate::models::{in_pool, Diagnostic, DiagnosticKind, Draw, Lenient, PICK_COUNT};

const MARKER_START: &str = "Draw";
const MARKER_END: &str = "BullsEye";

pub(crate) fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

// ════════════════════════════════════════════════════════════════
// Stratégie A : lignes balisées « Draw <numéros> BullsEye »
// ════════════════════════════════════════════════════════════════

/// Cherche, dans une ligne, la première séquence `Draw <n> <n> ... BullsEye`
/// et renvoie les jetons numériques capturés.
pub fn find_marker_run(line: &str) -> Option<Vec<&str>> {
    line.match_indices(MARKER_START)
        .find_map(|(pos, _)| marker_run_at(&line[pos + MARKER_START.len()..]))
}

fn marker_run_at(rest: &str) -> Option<Vec<&str>> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut run = Vec::new();
    for token in rest.split_whitespace() {
        if is_digits(token) {
            run.push(token);
            continue;
        }
        if !run.is_empty() && token.starts_with(MARKER_END) {
            return Some(run);
        }
        return None;
    }
    None
}

/// Un tirage par ligne reconnue, dans l'ordre du texte, même incomplet ;
/// les numéros hors limites sont retirés et signalés.
pub fn extract_marked(text: &str) -> Lenient<Vec<Draw>> {
    let mut draws = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let Some(run) = find_marker_run(line) else {
            continue;
        };

        let mut numbers = Vec::with_capacity(run.len());
        for token in run {
            let kind = match token.parse::<u64>() {
                Ok(v) if in_pool(v) => {
                    numbers.push(v as u8);
                    continue;
                }
                Ok(value) => DiagnosticKind::OutOfRange { value },
                Err(_) => DiagnosticKind::InvalidNumber {
                    token: token.to_string(),
                },
            };
            diagnostics.push(Diagnostic { line: idx + 1, kind });
        }

        draws.push(Draw::new(numbers));
    }

    log::debug!(
        "{} lignes balisées reconnues, {} diagnostics",
        draws.len(),
        diagnostics.len()
    );
    Lenient::new(draws, diagnostics)
}

// ════════════════════════════════════════════════════════════════
// Stratégie B : suites de 20 numéros dans un texte non structuré
// ════════════════════════════════════════════════════════════════

/// Découpe le texte à chaque saut de ligne et à chaque suite d'au moins deux
/// blancs. Un espace isolé ne coupe pas.
pub fn split_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !c.is_whitespace() {
            continue;
        }
        let mut end = i + c.len_utf8();
        let mut width = 1;
        let mut newline = c == '\n';
        while let Some(&(j, d)) = chars.peek() {
            if !d.is_whitespace() {
                break;
            }
            end = j + d.len_utf8();
            width += 1;
            newline |= d == '\n';
            chars.next();
        }
        if width >= 2 || newline {
            fragments.push(&text[start..i]);
            start = end;
        }
    }
    fragments.push(&text[start..]);

    fragments.retain(|f| !f.trim().is_empty());
    fragments
}

/// Toutes les suites maximales de chiffres ASCII. Les valeurs trop grandes
/// saturent et restent donc hors limites.
pub fn digit_runs(fragment: &str) -> Vec<u64> {
    let mut values = Vec::new();
    let mut current: Option<u64> = None;
    for b in fragment.bytes() {
        if b.is_ascii_digit() {
            let digit = (b - b'0') as u64;
            let acc = current.unwrap_or(0);
            current = Some(acc.saturating_mul(10).saturating_add(digit));
        } else if let Some(v) = current.take() {
            values.push(v);
        }
    }
    values.extend(current);
    values
}

pub fn filter_in_range(values: &[u64]) -> Vec<u8> {
    values
        .iter()
        .copied()
        .filter(|&v| in_pool(v))
        .map(|v| v as u8)
        .collect()
}

/// Première fenêtre contiguë de exactement 20 valeurs.
pub fn first_full_run(values: &[u8]) -> Option<&[u8]> {
    values.windows(PICK_COUNT).next()
}

/// Historique des tirages trouvés, du plus récent (bas du texte) au plus ancien.
pub fn extract_numeric_runs(text: &str) -> Lenient<Vec<Draw>> {
    let mut history = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, fragment) in split_fragments(text).into_iter().enumerate() {
        let values = filter_in_range(&digit_runs(fragment));
        let Some(run) = first_full_run(&values) else {
            continue;
        };
        let draw = Draw::new(run.to_vec());
        for value in draw.duplicates() {
            diagnostics.push(Diagnostic {
                line: idx + 1,
                kind: DiagnosticKind::DuplicateNumber { value },
            });
        }
        history.push(draw);
    }

    history.reverse();
    log::debug!("{} tirages extraits par balayage numérique", history.len());
    Lenient::new(history, diagnostics)
}
