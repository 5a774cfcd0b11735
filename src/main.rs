use clap::{Parser, Subcommand};
use compendium_cli::compendium::commands::{
    self, ConfigureOptions, PutOptions, DEFAULT_CONFIG_FILE, DEFAULT_NODES_FILE,
};
use compendium_cli::graphql::{ClientConfig, GraphQLClient, GraphQLError, Transport};
use dotenv::dotenv;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compendium", author, version, about = "Compendium CLI", long_about = None)]
struct Args {
    /// GraphQL endpoint, overrides COMPENDIUM_GRAPHQL_URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upsert nodes from a YAML file and start an execution
    Put {
        /// Path to the nodes file
        #[arg(short, long, default_value = DEFAULT_NODES_FILE)]
        filename: PathBuf,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Upsert node types from a YAML config file
    Configure {
        /// Path to the config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        filename: PathBuf,

        /// Print the requests instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Stop at the first node type that fails
        #[arg(long)]
        fail_fast: bool,

        /// Exit non-zero when any node type failed
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let endpoint = args.endpoint;
    let connect = move || -> Result<Box<dyn Transport>, GraphQLError> {
        let config = ClientConfig::from_env(endpoint)?;
        Ok(Box::new(GraphQLClient::new(&config)?))
    };

    match args.command {
        Commands::Put { filename, dry_run } => {
            let options = PutOptions { filename, dry_run };
            commands::put(&options, connect, io::stdout()).await?;
        }
        Commands::Configure {
            filename,
            dry_run,
            fail_fast,
            strict,
        } => {
            let options = ConfigureOptions {
                filename,
                dry_run,
                fail_fast,
                strict,
            };
            let report = commands::configure(&options, connect, io::stdout()).await?;
            if !report.is_complete() {
                log::warn!(
                    "{} of {} node types failed",
                    report.failed(),
                    report.attempted
                );
            }
        }
    }

    Ok(())
}
