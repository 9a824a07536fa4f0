//! Embedding capability: batch and single-text embedding behind a trait so the
//! benchmark core can run against a fake in tests.

pub mod http;

pub use http::HttpEmbedder;

use crate::error::Result;
use std::future::Future;

/// Text embedding capability.
///
/// Implementations are bound to one model id; vectors produced by different
/// implementations (different models) must never be compared.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts. Order-preserving: one vector per input text.
    fn embed_batch(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>> + Send;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;
}
