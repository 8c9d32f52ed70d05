use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SourceError;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Pdf,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Text => write!(f, "texte"),
            SourceKind::Pdf => write!(f, "PDF"),
        }
    }
}

/// Contenu complet d'un fichier, prêt à être analysé.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub text: String,
}

/// Seul l'en-tête `%PDF-` compte : un fichier texte nommé `.pdf` reste du texte.
pub fn detect_kind(bytes: &[u8]) -> SourceKind {
    if bytes.starts_with(PDF_MAGIC) {
        SourceKind::Pdf
    } else {
        SourceKind::Text
    }
}

pub fn decode_source(path: &Path, bytes: &[u8]) -> Result<SourceText, SourceError> {
    let kind = detect_kind(bytes);
    let text = match kind {
        // Pages remises bout à bout, dans l'ordre, séparées par un saut de ligne.
        SourceKind::Pdf => pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| SourceError::Pdf {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .join("\n"),
        SourceKind::Text => String::from_utf8_lossy(bytes).into_owned(),
    };

    log::debug!("{:?}: {} ({} caractères)", path, kind, text.len());
    Ok(SourceText {
        path: path.to_path_buf(),
        kind,
        text,
    })
}

/// Lit tout le fichier avant toute analyse ; `None` signifie qu'aucun fichier n'a été choisi.
pub fn read_source(path: Option<&Path>) -> Result<SourceText, SourceError> {
    let path = path.ok_or(SourceError::NoFile)?;
    let bytes = std::fs::read(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_source(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pdf_with_pages(pages: &[String]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 10.into()]),
                        Operation::new("Td", vec![20.into(), 700.into()]),
                        Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn numbers_line(numbers: impl Iterator<Item = u8>) -> String {
        numbers.map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(b"01/01"), SourceKind::Text);
        assert_eq!(detect_kind(b""), SourceKind::Text);
        assert_eq!(detect_kind(b"%PDF-1.7\n"), SourceKind::Pdf);
    }

    #[test]
    fn test_text_named_pdf_is_read_as_text() {
        let source = decode_source(Path::new("results.pdf"), b"Draw 1 2 3 BullsEye\n").unwrap();
        assert_eq!(source.kind, SourceKind::Text);
        assert_eq!(source.text, "Draw 1 2 3 BullsEye\n");
    }

    #[test]
    fn test_pdf_pages_stay_separate() {
        let bytes = pdf_with_pages(&[numbers_line(1..=20), numbers_line(41..=60)]);
        let source = decode_source(Path::new("results.pdf"), &bytes).unwrap();
        assert_eq!(source.kind, SourceKind::Pdf);

        let draws = crate::extract::extract_numeric_runs(&source.text).value;
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].numbers, (41..=60).collect::<Vec<u8>>());
        assert_eq!(draws[1].numbers, (1..=20).collect::<Vec<u8>>());
    }

    #[test]
    fn test_read_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Draw 1 2 3 BullsEye").unwrap();
        let source = read_source(Some(file.path())).unwrap();
        assert_eq!(source.kind, SourceKind::Text);
        assert_eq!(source.text, "Draw 1 2 3 BullsEye\n");
    }

    #[test]
    fn test_no_file_selected() {
        assert!(matches!(read_source(None), Err(SourceError::NoFile)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = read_source(Some(Path::new("/nonexistent/keno.txt"))).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }
}
