// src/main.rs
use kit_quote::catalog::{CatalogSource, XlsxCatalogSource};
use kit_quote::config::Config;
use kit_quote::domain::errors::AppResult;
use kit_quote::proposal::load_banner;
use kit_quote::session::{parse_command, render_view, Command, SessionController, HELP};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting kit_quote v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog once; any malformed row stops here
    let source = XlsxCatalogSource::new(&config.catalog.path, config.catalog.sheet.clone());
    log::info!("Loading catalog from {}", source.describe());
    let catalog = source.load().await?;
    log::info!("Loaded {} kits", catalog.len());

    let banner = match load_banner(&config.proposal.banner_path) {
        Ok(banner) => Some(banner),
        Err(e) => {
            log::warn!(
                "Banner {} unavailable, proposals will use a text title: {}",
                config.proposal.banner_path.display(),
                e
            );
            None
        }
    };

    let mut session = SessionController::new(catalog, banner, config.session_settings());

    println!("Consulte valores, descontos, frete e link do kit em segundos!");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ctrl_c() => {
                log::info!("Interrupted");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                if !run_command(&mut session, &config, &line).await? {
                    break;
                }
            }
        }
    }

    log::info!("Session closed");
    Ok(())
}

/// Execute one prompt line; returns false when the session should end
async fn run_command(session: &mut SessionController, config: &Config, line: &str) -> AppResult<bool> {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(true),
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    match command {
        Command::Event(event) => match session.handle(event) {
            Ok(view) => println!("{}", render_view(&view)),
            Err(e) => println!("{}", e),
        },
        Command::Show => println!("{}", render_view(&session.recompute())),
        Command::Export => match session.export_proposal() {
            Ok(document) => {
                let path = config.proposal_output_path();
                match document.save(&path).await {
                    Ok(()) => {
                        log::info!("Wrote {} ({})", path.display(), document.mime_type);
                        println!("📥 Proposta salva em {}", path.display());
                    }
                    Err(e) => {
                        log::error!("Failed to write {}: {}", path.display(), e);
                        println!("Não foi possível salvar a proposta em {}: {}", path.display(), e);
                    }
                }
            }
            Err(e) => println!("{}", e),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }

    Ok(true)
}
