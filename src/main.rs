mod api;
mod blockchain;
mod cli;
mod config;
mod error;
mod network;
mod process;
mod storage;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenvy::dotenv;
use log::{error, info};
use std::io;

use api::AppState;
use cli::{Cli, Command, MineArgs, ServeArgs, ValidateArgs, resolve_option};
use config::Config;
use error::LedgerError;
use network::{Broadcaster, HttpTransport};
use process::MinerSettings;
use storage::Storage;

#[actix_web::main]
async fn main() {
    let _ = dotenv();
    let cli = Cli::parse();
    init_logger(&cli);

    let config = Config::from_env();
    if let Err(e) = run(cli, config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

fn init_logger(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(cli: Cli, config: Config) -> Result<(), LedgerError> {
    match cli.command {
        Command::Mine(args) => run_mine(args, &config, cli.quiet).await,
        Command::Validate(args) => run_validate(args, &config, cli.quiet),
        Command::Serve(args) => run_serve(args, &config).await,
    }
}

async fn run_mine(args: MineArgs, config: &Config, quiet: bool) -> Result<(), LedgerError> {
    let storage = match args.name.as_deref() {
        Some(name) => Some(Storage::open(&config.data_dir, name)?),
        None => None,
    };
    let settings = MinerSettings::resolve(args, &mut io::stdin().lock(), &mut io::stdout())?;

    let mut broadcaster = None;
    if !config.peers.is_empty() {
        let mut b = Broadcaster::new(
            HttpTransport::new(config.peer_timeout)?,
            config.peers.clone(),
        );
        b.start();
        broadcaster = Some(b);
    }

    let result = process::mine(&settings, broadcaster.as_ref(), storage.as_ref()).await;
    if let Some(b) = broadcaster.as_mut() {
        b.stop();
    }
    let chain = result?;
    let top_hash = chain.last_block().block_hash();

    if quiet {
        println!("{top_hash}");
    } else {
        println!();
        println!("Data integrity verified: Yes");
        println!("Secure blockchain hash:  {top_hash}");
        println!();
    }
    Ok(())
}

fn run_validate(args: ValidateArgs, config: &Config, quiet: bool) -> Result<(), LedgerError> {
    let name = resolve_option(
        args.name,
        "Enter a name for the blockchain network: ",
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;
    let storage = Storage::open(&config.data_dir, &name)?;
    let chain = process::validate(&storage)?;

    if quiet {
        println!("{}", chain.last_block().block_hash());
    } else {
        println!();
        println!("Data integrity verified: Yes");
        println!();
    }
    Ok(())
}

async fn run_serve(args: ServeArgs, config: &Config) -> Result<(), LedgerError> {
    let name = resolve_option(
        args.name,
        "Enter a name for the blockchain network: ",
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;
    let storage = Storage::open(&config.data_dir, &name)?;

    info!(
        "⛓️ Starting ledger hub at http://{}:{} (chain {})",
        config.host,
        config.port,
        storage.filepath().display()
    );
    let state = web::Data::new(AppState::new(storage));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
