//! Error types for the TUI front end

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storefront error: {0}")]
    Storefront(#[from] libstorefront::StorefrontError),

    #[error("View error: {0}")]
    View(#[from] crate::dom::ViewError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
