pub mod calendar;
pub mod city;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod paging;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod source;
pub mod stats;

pub use error::CoreError;
