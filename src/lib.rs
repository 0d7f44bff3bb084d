pub mod batch;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod ocr;
pub mod scanner;
pub mod summary;
