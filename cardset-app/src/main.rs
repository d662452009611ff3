mod api;
mod cli;
mod config;
mod logging;
mod tui;

use anyhow::{Context, Result};
use clap::Parser; // needed for Cli::parse()
use std::io::{stdin, stdout};
use std::net::SocketAddr;
use tokio::runtime::Runtime;

use cli::commands::{open_store, run_cli};
use cli::opts::{Cli, Command};
use config::Config;
use logging::{init_logging, Verbosity};
use tui::app::TuiApp;

fn main() -> Result<()> {
    let args = Cli::parse();

    // Log lines would tear through the alternate screen.
    let verbosity = match args.cmd {
        Command::Tui if args.verbose == 0 => Verbosity::Quiet,
        _ => Verbosity::from_flags(args.verbose, args.quiet),
    };
    init_logging(verbosity);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }

    match args.cmd {
        Command::Tui => {
            let store = open_store(&config)?;
            TuiApp::new(store).run()
        }
        Command::Serve(s) => {
            let raw = s.addr.unwrap_or_else(|| config.listen_addr.clone());
            let addr: SocketAddr = raw.parse().with_context(|| format!("bad address {raw:?}"))?;
            let store = open_store(&config)?;
            let rt = Runtime::new()?;
            rt.block_on(api::server::run(store, addr, config.share_origin.clone()))
        }
        cmd => {
            let mut store = open_store(&config)?;
            run_cli(&mut store, &config, cmd, &mut stdout().lock(), &mut stdin().lock())
        }
    }
}
