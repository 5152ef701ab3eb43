pub mod embedder;
pub mod vector;

pub use embedder::HuggingFaceEmbedder;
