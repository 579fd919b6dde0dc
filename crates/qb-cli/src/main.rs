//! CLI frontend for the Questbook character manager.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Context;
use commands::create::Portrait;
use commands::status::Allocation;

#[derive(Parser)]
#[command(
    name = "qb",
    about = "Questbook: manage your role-playing characters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of the game API (default: $QB_API_URL or http://localhost:3000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Directory holding the session file
    #[arg(long, global = true, env = "QB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Password (8+ characters, upper and lower case, digit, special character)
        #[arg(long)]
        password: String,

        /// Password again
        #[arg(long)]
        confirm: String,
    },

    /// Log in and remember the session
    Login {
        /// Login email
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// List your characters
    List,

    /// Create a new character
    Create {
        /// Character name
        name: String,

        /// Portrait URL
        #[arg(short, long, conflicts_with = "portrait")]
        image: Option<String>,

        /// Ready-made portrait
        #[arg(short, long, value_enum, ignore_case = true)]
        portrait: Option<Portrait>,
    },

    /// Select the character that show/status/allocate/train work on
    Select {
        /// Character id (see `qb list`)
        id: u64,
    },

    /// Show the selected character's sheet
    Show,

    /// Show attributes and unspent points of the selected character
    Status,

    /// Spend attribute points on the selected character
    Allocate {
        /// Points to add to strength
        #[arg(long, default_value = "0")]
        strength: u32,

        /// Points to add to dexterity
        #[arg(long, default_value = "0")]
        dexterity: u32,

        /// Points to add to wisdom
        #[arg(long, default_value = "0")]
        wisdom: u32,

        /// Points to add to perception
        #[arg(long, default_value = "0")]
        perception: u32,

        /// Show the result without committing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Distribute points interactively
    Train,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<(), String> {
    let mut ctx = Context::new(cli.api_url, cli.timeout, cli.data_dir)?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => commands::account::register(&ctx, name, email, password, confirm).await,
        Commands::Login { email, password } => {
            commands::account::login(&mut ctx, email, password).await
        }
        Commands::Logout => commands::account::logout(&mut ctx),
        Commands::List => commands::list::run(&ctx).await,
        Commands::Create {
            name,
            image,
            portrait,
        } => commands::create::run(&ctx, &name, image.as_deref(), portrait).await,
        Commands::Select { id } => commands::select::run(&mut ctx, id),
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Status => commands::status::show(&ctx).await,
        Commands::Allocate {
            strength,
            dexterity,
            wisdom,
            perception,
            dry_run,
        } => {
            let plan = Allocation {
                strength,
                dexterity,
                wisdom,
                perception,
            };
            commands::status::allocate(&ctx, plan, dry_run).await
        }
        Commands::Train => commands::train::run(&ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
