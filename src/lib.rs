pub mod archive;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod helper;
pub mod install;
pub mod plugin;
pub mod serve;
pub mod service;
pub mod tools;
pub mod util;

#[cfg(test)]
mod testing;

pub use error::PackagingError;
pub use plugin::{Hook, Plugin};
pub use service::{PluginConfig, Service};
