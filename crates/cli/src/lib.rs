//! Command-line front-end for scout.
//!
//! Loads a dataset directory, builds an [`Engine`](scout_engine::Engine) and
//! runs one operation per invocation. Results go to stdout as JSON (default)
//! or condensed text; logs go to stderr and are controlled by `RUST_LOG`.

#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod output;

pub use app::run;
pub use dataset::{load_dataset, Dataset, DatasetError};
