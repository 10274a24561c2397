use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Missing or empty dataset; the page surfaces this message and halts.
    #[error("Nenhum dado foi carregado para '{0}'.")]
    EmptyDataset(String),

    /// Entered password was not an integer; login is denied with this
    /// user-visible message.
    #[error("A senha deve ser um número inteiro.")]
    InvalidPassword,

    // Catch-all for anyhow errors when direct conversion is suitable
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}
