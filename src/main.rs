mod cmd;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use python_requirements::cli::{Cli, Command, RequirementsCommand};
use python_requirements::serve::ServeOptions;
use python_requirements::{Hook, Plugin, Service, config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Config(config_cmd) => cmd::config::run(config_cmd),
        Command::Requirements(requirements) => {
            let plugin = load_plugin(&cli.service_path)?;
            match requirements {
                RequirementsCommand::Install => plugin.run_hook(Hook::RequirementsInstall),
                RequirementsCommand::Clean => plugin.run_hook(Hook::RequirementsClean),
            }
        }
        Command::Serve(args) => {
            let plugin = load_plugin(&cli.service_path)?;
            plugin.serve(&ServeOptions {
                port: args.port,
                app: args.app,
            })
        }
        Command::Hook(args) => {
            let hook: Hook = args.event.parse()?;
            load_plugin(&cli.service_path)?.run_hook(hook)
        }
    }
}

fn load_plugin(service_path: &std::path::Path) -> Result<Plugin> {
    let service = Service::load(service_path)?;
    let tools = config::load()?;
    Ok(Plugin::new(service, tools))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
