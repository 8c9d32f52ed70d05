pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod fields;
pub mod history;
pub mod models;
pub mod session;
pub mod source;
