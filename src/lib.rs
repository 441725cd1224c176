pub mod config;
pub mod process;
pub mod schema;

pub use config::Config;
pub use process::{run, RunSummary};
