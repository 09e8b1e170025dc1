mod commands;
mod terminal;

use commands::{CommandLine, Commands, networks, scan};
use radar_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let cfg = config_from(&commands);

    logging::init_logging(cfg.quiet);

    if !cfg.json {
        print::banner(cfg.quiet);
    }

    match commands.command {
        Commands::Scan(args) => scan::scan(args, &cfg).await,
        Commands::Networks => networks::networks(&cfg).await,
    }
}

/// JSON mode keeps stdout free of decoration, so it implies `-q`.
fn config_from(commands: &CommandLine) -> Config {
    let quiet = if commands.json {
        commands.quiet.max(1)
    } else {
        commands.quiet
    };
    Config {
        no_dns: commands.no_dns,
        quiet,
        json: commands.json,
        disable_input: commands.no_input,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
