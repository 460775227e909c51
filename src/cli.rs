use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "python-requirements")]
#[command(version)]
#[command(about = "Package Python requirements for serverless deployments")]
pub struct Cli {
    /// Service directory (defaults to the current directory)
    #[arg(long = "service-path", global = true, default_value = ".")]
    pub service_path: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install or remove packaged requirements
    #[command(subcommand)]
    Requirements(RequirementsCommand),
    /// Serve the WSGI application locally
    Serve(ServeArgs),
    /// Run the handler registered for a host lifecycle event
    Hook(HookArgs),
    /// Manage python-requirements tool configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum RequirementsCommand {
    /// install requirements manually
    Install,
    /// Remove .requirements, .requirements.zip and sitecustomize.py
    Clean,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: 5000)
    #[arg(long = "port", short = 'p')]
    pub port: Option<u16>,
    /// WSGI application as module.attribute (default: custom.wsgi.app)
    #[arg(long = "app")]
    pub app: Option<String>,
}

#[derive(Args, Debug)]
pub struct HookArgs {
    /// Lifecycle event name, e.g. before:deploy:createDeploymentArtifacts
    #[arg(value_name = "EVENT")]
    pub event: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a key in the tool configuration (e.g. tools.pip.path)
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Config key path (e.g. tools.docker.path)
    pub key: String,
    /// Value to assign to the key (stored as a string)
    pub value: String,
    /// Override config file path (default: ~/.python-requirements/config.toml)
    #[arg(long = "file")]
    pub file: Option<PathBuf>,
}
