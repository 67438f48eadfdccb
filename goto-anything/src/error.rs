use crate::project::FileId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project walk error: {0}")]
    Walk(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Goto panel is hidden")]
    PanelHidden,

    #[error("Result index {index} out of range ({len} rendered)")]
    ResultOutOfRange { index: usize, len: usize },

    #[error("Unknown project file: {0}")]
    UnknownFile(FileId),
}

impl From<ignore::Error> for GotoError {
    fn from(err: ignore::Error) -> Self {
        GotoError::Walk(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GotoError>;
