use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pgschema::{Attr, DropBehavior, PgProvider, ResourceData, ResourceState, SchemaResource};
use tracing::debug;

mod config;

/// Manage PostgreSQL schemas declaratively.
#[derive(Parser, Debug)]
#[command(name = "pgschema", version)]
struct Cli {
    /// Database connection URL (overrides .config/pgschema.styx)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a schema
    Create {
        name: String,
        /// Owning role (defaults to the connecting role)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Show a schema as the catalog reports it
    Read { name: String },
    /// Rename a schema and/or change its owner
    Update {
        name: String,
        #[arg(long)]
        rename_to: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Drop a schema
    Drop {
        name: String,
        /// Also drop everything inside the schema
        #[arg(long)]
        cascade: bool,
    },
    /// Adopt an existing schema
    Import { name: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pgschema=info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, path) = config::load()?;
    if let Some(path) = &path {
        debug!(path = %path.display(), "loaded config");
    }
    if let Some(url) = cli.database_url {
        debug!(database = %mask_password(&url), "using database url");
        config.url = Some(url);
    }

    let provider = PgProvider::new(config.to_pg_config()?);
    let mut resource = SchemaResource::new(provider);

    let state = match cli.command {
        Commands::Create { name, owner } => {
            let mut state = ResourceState::planned(name, owner);
            resource.create(&mut state).await?;
            state
        }
        Commands::Read { name } => {
            let mut state = ResourceState::imported(name);
            resource.read(&mut state).await?;
            state
        }
        Commands::Update {
            name,
            rename_to,
            owner,
        } => {
            let mut state = ResourceState::imported(name.as_str());
            resource.read(&mut state).await?;
            if state.id().is_none() {
                return Err(format!("schema {:?} does not exist", name).into());
            }
            if let Some(new_name) = rename_to {
                state.plan(Attr::Name, new_name);
            }
            if let Some(owner) = owner {
                state.plan(Attr::Owner, owner);
            }
            resource.update(&mut state).await?;
            state
        }
        Commands::Drop { name, cascade } => {
            if cascade {
                resource = resource.with_drop_behavior(DropBehavior::Cascade);
            }
            let mut state = ResourceState::imported(name);
            resource.delete(&mut state).await?;
            state
        }
        Commands::Import { name } => {
            let mut state = ResourceState::new();
            resource.import(&mut state, &name).await?;
            state
        }
    };

    print_state(&state);
    Ok(())
}

fn print_state(state: &ResourceState) {
    match state.record() {
        Some(record) => {
            println!("{}: {}", "name".bold(), record.name);
            println!("{}: {}", "owner".bold(), record.owner);
        }
        None => println!("{}", "absent".dimmed()),
    }
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    if let Some(start) = url.find("://")
        && let Some(at) = url.rfind('@')
        && at > start
        && let Some(colon) = url[start + 3..at].find(':')
    {
        let user = &url[start + 3..start + 3 + colon];
        return format!("{}{}:***{}", &url[..start + 3], user, &url[at..]);
    }
    url.to_string()
}
