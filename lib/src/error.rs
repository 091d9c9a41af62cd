use crate::provider::ProviderError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("init() must be called first")]
    NotInitialized,
    #[error("trace name was empty")]
    MissingTrace,
    #[error("at least one resolution is required")]
    NoResolutions,
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),
    #[error("series has {series} samples but {timestamps} relative timestamps")]
    LengthMismatch { series: usize, timestamps: usize },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
