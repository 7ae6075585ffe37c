mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ReviewCommands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_dir = cli.config_dir();

    let result = match cli.command {
        Commands::Init { data_dir, store } => cli::init::run(&config_dir, data_dir, store),
        Commands::Login {
            email,
            role,
            password,
        } => cli::login::run(&config_dir, &email, role, &password).await,
        Commands::Logout => cli::login::logout(&config_dir).await,
        Commands::Status => cli::status::run(&config_dir),
        Commands::Open { path } => cli::open::run(&config_dir, &path).await,
        Commands::Proof { id } => cli::open::proof(&config_dir, &id).await,
        Commands::New(form) => cli::new::run(&config_dir, form).await,
        Commands::Review { command } => match command {
            ReviewCommands::List => cli::review::list(&config_dir).await,
            ReviewCommands::Show { id } => cli::review::show(&config_dir, &id).await,
            ReviewCommands::Accept { id, comment } => {
                cli::review::accept(&config_dir, &id, comment.as_deref()).await
            }
            ReviewCommands::Refuse { id, comment } => {
                cli::review::refuse(&config_dir, &id, comment.as_deref()).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
