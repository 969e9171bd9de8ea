pub mod boundary;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod persister;
pub mod report;
pub mod resolver;
pub mod store;
pub mod ui;

pub use error::{ImageTaggerError, Result};
