//! Command-line tool for reading SMC sensors

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smc")]
#[command(about = "Read temperatures, fan speeds, and raw registers from the Apple SMC", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every key the controller exposes, with decoded values where known
    List {
        /// Only keys starting with this prefix (e.g. T, F0, PC)
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// Print the full temperature snapshot as JSON
    Temps,
    /// Show fan count and per-fan speed
    Fans,
}

#[cfg(target_os = "macos")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use smckit::{Smc, SmcError};

    env_logger::init();
    let cli = Cli::parse();
    let smc = Smc::open()?;

    match cli.command {
        Commands::List { prefix } => {
            for key in smc.keys()? {
                let name = key.to_string();
                if let Some(ref prefix) = prefix {
                    if !name.starts_with(prefix.as_str()) {
                        continue;
                    }
                }
                match smc.value_for_key(key) {
                    Ok(value) => println!("{}  {:>10.2}", name, value),
                    Err(SmcError::UnsupportedType { data_type, .. }) => {
                        println!("{}  ({})", name, data_type)
                    }
                    Err(err) => println!("{}  <{}>", name, err),
                }
            }
        }
        Commands::Temps => {
            let temps = smc.temperatures();
            println!("{}", serde_json::to_string_pretty(&temps)?);
        }
        Commands::Fans => match smc.fan_count() {
            Some(count) => {
                println!("fans: {}", count);
                println!("fan_0: {:.0} RPM", smc.fan_rpm("fan_0"));
            }
            None => println!("fan count unavailable"),
        },
    }

    smc.close()?;
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn main() {
    let _ = Cli::parse();
    eprintln!("the AppleSMC service is only available on macOS");
    std::process::exit(1);
}
