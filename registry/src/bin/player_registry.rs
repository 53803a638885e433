use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use registry::{table, AvatarUpload, RankedPlayer, Registry, RegistrationForm, RegistryConfig};

#[derive(Parser, Debug)]
struct Params {
    /// YAML file with database_url, avatar_dir and leaderboard_size
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file or URL, overrides DATABASE_URL and the config file
    #[arg(short, long)]
    database: Option<String>,

    /// Directory avatars are copied into
    #[arg(long)]
    avatar_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every registered player with their rank
    List {
        #[arg(long)]
        json: bool,
    },
    /// Register a new player
    Register {
        #[arg(long)]
        player_name: Option<String>,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        level: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(short, long)]
        game: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        favorite: Option<String>,
        /// Image file to use as the avatar (png, jpg or jpeg)
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Delete a player by id
    Delete { id: i64 },
    /// Show the leaderboard
    Top {
        #[arg(long)]
        json: bool,
    },
}

fn print_players(players: &[RankedPlayer], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(players)?);
    } else {
        println!("{}", table::render(players));
    }
    Ok(())
}

async fn run(args: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RegistryConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.avatar_dir {
        config.avatar_dir = dir;
    }
    log::info!("config: {config:?}");

    let registry = Registry::open(&config, args.database).await?;

    match args.command {
        Command::List { json } => {
            print_players(&registry.list_players().await?, json)?;
        }
        Command::Register {
            player_name,
            username,
            level,
            team,
            game,
            role,
            favorite,
            avatar,
        } => {
            let upload = match avatar {
                Some(path) => Some(AvatarUpload::from_path(&path).await?),
                None => None,
            };
            let form = RegistrationForm {
                player_name,
                username,
                level,
                team,
                game,
                role,
                favorite,
            };
            let id = registry.register(form, upload).await?;
            println!("Player added (id {id})");
        }
        Command::Delete { id } => {
            registry.remove_player(id).await?;
            println!("Player deleted");
        }
        Command::Top { json } => {
            print_players(&registry.leaderboard().await?, json)?;
        }
    }

    registry.into_store().close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
