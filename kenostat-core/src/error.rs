use std::path::PathBuf;

use thiserror::Error;

/// Échecs de lecture du fichier source. Aucun résultat partiel n'est produit.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Aucun fichier sélectionné")]
    NoFile,

    #[error("Impossible de lire {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Impossible d'extraire le texte du PDF {path:?}: {message}")]
    Pdf { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Fenêtre invalide '{0}' (attendu: all ou un entier positif)")]
    InvalidWindow(String),

    #[error("Aucune fenêtre d'analyse configurée")]
    NoWindows,

    #[error("{field} doit valoir au moins 1")]
    TooSmall { field: &'static str },

    #[error("Impossible de lire la configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON invalide dans {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Échec d'une analyse complète ; l'état précédent reste inchangé.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
