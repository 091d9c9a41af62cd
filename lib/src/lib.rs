mod cache;
pub mod chunk;
mod clock;
mod downsample;
mod error;
pub mod peaks;
mod provider;
mod resolution;
mod service;

pub use cache::*;
pub use clock::*;
pub use downsample::*;
pub use error::*;
pub use provider::*;
pub use resolution::*;
pub use service::*;
