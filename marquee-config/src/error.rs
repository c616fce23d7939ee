use thiserror::Error;

/// Configuration values that parse but cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("special feature folder name #{position} is blank")]
    BlankFolderName { position: usize },

    #[error("at least one video extension must be configured")]
    NoVideoExtensions,

    #[error("video extension #{position} is blank")]
    BlankVideoExtension { position: usize },

    #[error("logging.default_directive must not be blank")]
    BlankLogDirective,
}
