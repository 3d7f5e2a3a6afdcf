use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autover::version::tuple;
use autover::{Origin, Resolver};

#[derive(Parser)]
#[command(name = "autover")]
#[command(version, about = "Report the version of an installed or editable distribution")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the version for a dotted module name
    Resolve {
        /// Fully qualified module name, e.g. `my_pkg.cli`
        module: String,

        /// Print the comparable tuple form instead of the raw version
        #[arg(long)]
        tuple: bool,

        /// Emit module, version and tuple as JSON
        #[arg(long, conflicts_with = "tuple")]
        json: bool,
    },

    /// Parse a version descriptor into its comparable tuple form
    Parse {
        /// Raw descriptor, e.g. `1.0.3-rc-5`
        descriptor: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("AUTOVER_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve {
            module,
            tuple: as_tuple,
            json,
        } => {
            let resolver = Resolver::open_default()?;
            let origin = Origin::module(module.clone());
            let version = resolver.version(&origin);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "module": module,
                        "version": version,
                        "tuple": tuple::parse(version.as_deref()),
                    })
                );
            } else if as_tuple {
                println!("{}", tuple::parse(version.as_deref()));
            } else {
                match &version {
                    Some(v) => println!("{v}"),
                    None => println!("<unknown {origin}>"),
                }
            }

            if version.is_none() {
                std::process::exit(1);
            }
        }
        Command::Parse { descriptor } => {
            println!("{}", tuple::parse(Some(&descriptor)));
        }
    }

    Ok(())
}
