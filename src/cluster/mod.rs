// src/cluster/mod.rs
//! Lexical story clustering: tokenizer → TF-IDF → cosine similarity → seed grouping,
//! plus topic keyword extraction.

pub mod grouping;
pub mod keywords;
pub mod similarity;
pub mod tfidf;
pub mod tokenize;

pub use grouping::group_by_seed;
pub use keywords::{top_keywords, topic_label};
pub use similarity::cosine;
pub use tfidf::{vectorize, DocumentVector, TermWeights};
pub use tokenize::tokenize;
