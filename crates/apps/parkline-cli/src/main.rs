//! Parkline CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use parkline_cli::{
    cli::{Cli, Commands, ListingCommands},
    commands,
    config::{default_config_path, CliConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let e = CliError::from(e);
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = rt.block_on(run(cli)) {
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging based on --verbose flag or RUST_LOG env var.
fn init_logging(verbose: bool) {
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !verbose && !has_rust_log {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("warn,parkline=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a user-friendly error message with error code and recovery hint.
fn print_error(e: &CliError) {
    let code = e.error_code();

    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        code.to_string().yellow(),
        e
    );
    eprintln!("{}: {}", "Hint".cyan(), e.suggestion());
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = CliConfig::load(&config_path)?;

    // Explicit flag wins over the configured default
    let format: OutputFormat = match cli.format {
        Some(arg) => arg.into(),
        None => config.display.default_format.parse().unwrap_or_default(),
    };

    // Dispatch command
    let output = match cli.command {
        Commands::Init { force } => commands::init(config, format, &config_path, force)?,

        // Host commands
        Commands::Listing { command } => match command {
            ListingCommands::Publish {
                spot,
                host,
                title,
                event,
                price,
                spaces,
                start,
                end,
            } => commands::publish_listing(
                config,
                format,
                commands::PublishArgs {
                    spot,
                    host,
                    title,
                    event,
                    price,
                    spaces,
                    start,
                    end,
                },
            )?,

            ListingCommands::Show { id } => commands::show_listing(config, format, &id)?,

            ListingCommands::List {
                spot,
                host,
                active,
                limit,
            } => commands::list_listings(config, format, spot, host, active, limit)?,

            ListingCommands::Deactivate { id, host } => {
                commands::deactivate_listing(config, format, &id, &host)?
            }

            ListingCommands::Reprice { id, host, price } => {
                commands::reprice_listing(config, format, &id, &host, &price)?
            }
        },

        // Guest commands
        Commands::Checkout { listing, user } => {
            commands::checkout(config, format, &listing, &user).await?
        }

        Commands::Verify { session } => commands::verify(config, format, &session).await?,

        Commands::Confirm { session, user } => {
            commands::confirm(config, format, &session, &user).await?
        }

        Commands::Bookings {
            user,
            host,
            listing,
        } => commands::bookings(config, format, user, host, listing)?,

        Commands::Pay { session, expire } => commands::pay(config, format, &session, expire)?,

        // Completions command
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
