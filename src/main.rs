use clap::Parser;
use formfill::cli::commands::{cmd_extract, cmd_fill, cmd_map, cmd_profiles};
use formfill::cli::config::{Cli, Commands, load_config, log_filter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fill {
            profiles,
            profile,
            page,
            url,
            mapper,
            output,
            json,
        } => {
            cmd_fill(
                &config,
                &profiles,
                profile.as_deref(),
                page.as_deref(),
                url.as_deref(),
                mapper.as_deref(),
                output.as_deref(),
                json,
                cli.trace.as_deref(),
            )?;
        }
        Commands::Extract {
            page,
            url,
            save_as,
            profiles,
        } => {
            cmd_extract(
                &config,
                page.as_deref(),
                url.as_deref(),
                save_as.as_deref(),
                &profiles,
            )?;
        }
        Commands::Map { request, mapper } => {
            let envelope = cmd_map(&config, &request, mapper.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            if !envelope.success {
                std::process::exit(1);
            }
        }
        Commands::Profiles { profiles, action } => {
            cmd_profiles(&profiles, &action)?;
        }
    }

    Ok(())
}
