//! Config command handlers. These run without a snapshot.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let toml = config::to_toml(&cfg)?;
            output::print_output(toml.trim_end(), global.quiet);
        }
        ConfigCommand::Path => {
            let path = config::active_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
        }
    }
    Ok(())
}
