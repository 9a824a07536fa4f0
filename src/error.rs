use thiserror::Error;

/// Main error type for RAGBench
#[derive(Error, Debug)]
pub enum RagBenchError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (invalid chunking parameters, top-k, model ids)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Benchmark input errors (document or dataset unreadable/missing)
    #[error("Resource error: {0}")]
    Resource(String),

    /// Embedding API errors
    #[error("Embedding API error: {0}")]
    Embedding(String),

    /// Reranker API errors
    #[error("Rerank API error: {0}")]
    Rerank(String),

    /// Run record persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient Result type using RagBenchError
pub type Result<T> = std::result::Result<T, RagBenchError>;
