// tweetvec: GloVe document features and Sports-tweet classification
//
// This is the library root. Data flows leaf-first through the modules:
// embeddings -> corpus -> features -> classify -> output.

pub mod classify;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod features;
pub mod output;
