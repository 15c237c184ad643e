// Word embeddings — delimited loading, the full table, and the per-corpus cache.

pub mod cache;
pub mod delimited;
pub mod table;
pub mod traits;
