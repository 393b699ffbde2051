use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ipld_explorer::{CarBlockStore, Explorer, StaticNames, TreeOptions};
use miette::{IntoDiagnostic, miette};
use smol_str::SmolStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Walk IPLD paths inside a CAR archive")]
struct Args {
    /// CAR file holding the blocks to explore
    #[arg(short, long)]
    car: PathBuf,

    /// Static name binding, NAME=CID (repeatable)
    #[arg(short, long = "name", value_parser = parse_binding)]
    names: Vec<(SmolStr, SmolStr)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the block that owns a path and the path left inside it
    Resolve {
        /// Path to resolve; defaults to the archive's first root
        path: Option<String>,
    },
    /// Print the value at a path inside one block, as DAG-JSON
    Get {
        /// Path to read; defaults to the archive's first root
        path: Option<String>,
    },
    /// List the paths inside one block
    Tree {
        /// Path to list from; defaults to the archive's first root
        path: Option<String>,

        /// Descend into nested maps and lists
        #[arg(short, long)]
        recursive: bool,

        /// Only list maps and lists, not scalar entries
        #[arg(long)]
        structure_only: bool,
    },
}

fn parse_binding(s: &str) -> Result<(SmolStr, SmolStr), String> {
    let (name, cid) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CID, got `{s}`"))?;
    if name.is_empty() || cid.is_empty() {
        return Err(format!("expected NAME=CID, got `{s}`"));
    }
    Ok((name.into(), cid.into()))
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let store = CarBlockStore::load(&args.car).await?;
    let default_root = store.roots().first().map(|root| root.to_string());
    tracing::debug!(blocks = store.len(), car = %args.car.display(), "loaded archive");

    let explorer = Explorer::new(store).with_names(StaticNames::new(args.names));

    let target = |path: Option<String>| {
        path.or_else(|| default_root.clone())
            .ok_or_else(|| miette!("no path given and the archive has no roots"))
    };

    match args.command {
        Command::Resolve { path } => {
            let path = target(path)?;
            let result = explorer.resolve(path.as_str()).await?;
            println!("{}", result.identifier);
            if !result.remainder_path.is_end() {
                println!("{}", result.remainder_path);
            }
        }
        Command::Get { path } => {
            let path = target(path)?;
            let value = explorer.get(path.as_str()).await?;
            let json = serde_ipld_dagjson::to_vec(&value).into_diagnostic()?;
            println!("{}", String::from_utf8_lossy(&json));
        }
        Command::Tree {
            path,
            recursive,
            structure_only,
        } => {
            let path = target(path)?;
            let options = TreeOptions::new()
                .recursive(recursive)
                .values(!structure_only)
                .build();
            for entry in explorer.tree(path.as_str(), &options).await? {
                println!("{entry}");
            }
        }
    }

    Ok(())
}
