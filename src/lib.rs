pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod render;
pub mod report;
pub mod source;
