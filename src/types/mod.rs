//! Core types for the digest service.

mod chunk;
mod config;
mod request;
mod transcript;

pub use chunk::{Chunk, PartialOutcome, PartialResult};
pub use config::DigestConfig;
pub use request::{
    DigestJobStatus, DigestJobStatusResponse, DigestKind, DigestRequest, DigestResponse,
    StartDigestJobRequest, StartDigestJobResponse,
};
pub use transcript::{render_transcript, ChatLine, ChatTurn, Role};
