mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taskgen",
    about = "Turn a feature description into user stories, engineering tasks and risks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./taskgen.yaml)
    #[arg(long, global = true, env = "TASKGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding specs.json (overrides the config file)
    #[arg(long, global = true, env = "TASKGEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (default: config `port`, 5000)
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Allowed CORS origin (default: any)
        #[arg(long, env = "FRONTEND_URL")]
        frontend_url: Option<String>,
    },

    /// Generate a breakdown for one feature and store it
    Generate {
        /// What the feature should achieve (at least 10 characters)
        #[arg(long)]
        goal: String,

        /// Who the feature is for
        #[arg(long)]
        users: String,

        #[arg(long)]
        constraints: Option<String>,

        /// Template label (default: General)
        #[arg(long)]
        template: Option<String>,

        /// Print the breakdown without storing it
        #[arg(long)]
        no_save: bool,
    },

    /// List stored specs, newest first
    List,

    /// Show one stored spec
    Show { id: String },

    /// Delete a stored spec
    Delete { id: String },

    /// Render a stored spec as markdown or plain text
    Export {
        id: String,

        /// markdown | text
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check storage and provider health
    Status,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = settings::resolve(cli.config.as_deref(), cli.data_dir.as_deref()).and_then(
        |config| match cli.command {
            Commands::Serve { port, frontend_url } => {
                cmd::serve::run(&config, cli.api_key, port, frontend_url)
            }
            Commands::Generate {
                goal,
                users,
                constraints,
                template,
                no_save,
            } => cmd::generate::run(
                &config,
                cli.api_key,
                cmd::generate::Input {
                    goal,
                    users,
                    constraints,
                    template,
                },
                !no_save,
                cli.json,
            ),
            Commands::List => cmd::specs::list(&config, cli.json),
            Commands::Show { id } => cmd::specs::show(&config, &id, cli.json),
            Commands::Delete { id } => cmd::specs::delete(&config, &id, cli.json),
            Commands::Export { id, format, output } => {
                cmd::specs::export(&config, &id, &format, output.as_deref())
            }
            Commands::Status => cmd::status::run(&config, cli.api_key, cli.json),
        },
    );

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
