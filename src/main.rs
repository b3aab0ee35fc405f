use clap::Parser;
use emx::application::{ConfigService, ExpandOptions, ExpandService};
use emx::cli::{format_config, format_error_context, Cli, Commands};
use emx::error::EmxError;
use emx::infrastructure::Config;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), EmxError> {
    match cli.command {
        Some(Commands::Config { key, value, list }) => {
            let path = Config::resolve_path(cli.config.as_deref());
            let service = ConfigService::new(path);

            if list {
                let config = service.list()?;
                print!("{}", format_config(&config));
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                    Ok(())
                } else {
                    println!("{}", service.get(&k)?);
                    Ok(())
                }
            } else {
                println!("Usage: emx config [--list | <key> [<value>]]");
                println!("Valid keys: stacked_multiplication, jump_start");
                Ok(())
            }
        }
        None => {
            if let Some(abbreviation) = cli.abbreviation {
                let config = Config::discover(cli.config.as_deref())?;
                let service = ExpandService::new(config);
                let options = ExpandOptions {
                    family: cli.family,
                    jump_mode: cli.jump,
                    jump_start: cli.jump_start,
                    stacked: cli.stacked,
                };
                match service.execute(&abbreviation, &options) {
                    Ok(output) => {
                        println!("{}", output);
                        Ok(())
                    }
                    Err(e) => {
                        if let Some(position) = e.position() {
                            eprint!("{}", format_error_context(&abbreviation, position));
                        }
                        Err(e)
                    }
                }
            } else {
                println!("emx - Expand Emmet-style abbreviations into markup");
                println!("Use --help for usage information");
                Ok(())
            }
        }
    }
}
