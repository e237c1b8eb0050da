pub mod engine;
pub mod opts;
