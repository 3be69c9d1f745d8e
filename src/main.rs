use std::path::PathBuf;
use std::process::ExitCode;

use bountydesk::app::{App, AppError};
use bountydesk::config::{Config, ConfigError, StoreLocation};
use bountydesk::net::types::{
    BountyCategory, BountyStatus, CreateBountyRequest, CreateTipRequest, Priority, TipCategory, TipStatus,
    UpdateBountyRequest, UpdateTipRequest, UserProfile,
};
use bountydesk::routes::Route;
use bountydesk::util::filter::{BountyFilter, TipFilter};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "bountydesk", about = "Bounty desk session and record CLI")]
struct Cli {
    #[arg(long, env = "BOUNTYDESK_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "BOUNTYDESK_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BOUNTYDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BOUNTYDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Run the route guard for a path.
    Open {
        path: String,
    },
    Dashboard,
    Profile(ProfileCommand),
    Bounty(BountyCommand),
    Tip(TipCommand),
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        notification_email: Option<String>,
        #[arg(long)]
        enable_notification: Option<bool>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BountyCommand {
    #[command(subcommand)]
    command: BountySubcommand,
}

#[derive(Subcommand, Debug)]
enum BountySubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<BountyCategory>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    Search {
        query: String,
    },
    View {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        reward: f64,
        #[arg(long, help = "RFC 3339 timestamp")]
        expires_at: Option<DateTime<Utc>>,
        #[arg(long, default_value = "general")]
        category: BountyCategory,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        reward: Option<f64>,
        #[arg(long)]
        status: Option<BountyStatus>,
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
        #[arg(long)]
        category: Option<BountyCategory>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    Delete {
        id: String,
    },
    Status {
        id: String,
        status: BountyStatus,
    },
    Priority {
        id: String,
        priority: Priority,
    },
    Category {
        id: String,
        category: BountyCategory,
    },
    Reward {
        id: String,
        amount: f64,
    },
}

#[derive(Args, Debug)]
struct TipCommand {
    #[command(subcommand)]
    command: TipSubcommand,
}

#[derive(Subcommand, Debug)]
enum TipSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<TipStatus>,
        #[arg(long)]
        category: Option<TipCategory>,
    },
    View {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "general")]
        category: TipCategory,
        #[arg(long, help = "RFC 3339 timestamp; defaults to now")]
        datetime: Option<DateTime<Utc>>,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        reward: f64,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<TipCategory>,
        #[arg(long)]
        datetime: Option<DateTime<Utc>>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        status: Option<TipStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        reward: Option<f64>,
    },
    Delete {
        id: String,
    },
    Status {
        id: String,
        status: TipStatus,
    },
    Priority {
        id: String,
        priority: Priority,
    },
    Reward {
        id: String,
        amount: f64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bountydesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(dir) = &cli.state_dir {
        config.store = StoreLocation::Dir(dir.clone());
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let app = App::new(load_config(&cli)?)?;

    match cli.command {
        Command::Login { email, password } => {
            let user = app.auth().login(&email, &password).await.map_err(AppError::from)?;
            tracing::info!(location = %app.history().current(), "signed in");
            print_json(&user)
        }
        Command::Register { username, email, password } => {
            let user = app
                .auth()
                .register(&username, &email, &password)
                .await
                .map_err(AppError::from)?;
            tracing::info!(location = %app.history().current(), "registered");
            print_json(&user)
        }
        Command::Logout => {
            app.auth().logout().await;
            Ok(())
        }
        Command::Whoami => {
            let state = app.auth().resolve().await;
            let user = state.user.ok_or(CliError::NotSignedIn)?;
            print_json(&user)
        }
        Command::Open { path } => {
            let route = app.open(&path).await?;
            if let Route::NotFound(path) = route {
                return Err(AppError::NotFound(path).into());
            }
            print_json(&serde_json::json!({ "route": route.path() }))
        }
        Command::Dashboard => {
            app.enter(Route::Dashboard).await?;
            let summary = app.checked(app.summary.fetch().await)?;
            print_json(&summary)
        }
        Command::Profile(profile) => run_profile(&app, profile).await,
        Command::Bounty(bounty) => run_bounty(&app, bounty).await,
        Command::Tip(tip) => run_tip(&app, tip).await,
    }
}

async fn run_profile(app: &App, profile: ProfileCommand) -> Result<(), CliError> {
    app.enter(Route::Profile).await?;
    let current = app.auth().state().user.ok_or(CliError::NotSignedIn)?;

    match profile.command {
        ProfileSubcommand::Show => print_json(&current.profile),
        ProfileSubcommand::Update {
            username,
            full_name,
            notification_email,
            enable_notification,
            bio,
            contact_number,
        } => {
            let base = current.profile;
            let next = UserProfile {
                username: username.unwrap_or(base.username),
                full_name: full_name.unwrap_or(base.full_name),
                notification_email: notification_email.unwrap_or(base.notification_email),
                enable_notification: enable_notification.unwrap_or(base.enable_notification),
                bio: bio.unwrap_or(base.bio),
                contact_number: contact_number.unwrap_or(base.contact_number),
            };
            let user = app.auth().update_profile(&next).await.map_err(AppError::from)?;
            print_json(&user.profile)
        }
    }
}

async fn run_bounty(app: &App, bounty: BountyCommand) -> Result<(), CliError> {
    let bounties = &app.bounties;
    match bounty.command {
        BountySubcommand::List { search, category, priority } => {
            app.enter(Route::Bounties).await?;
            let filter = BountyFilter { search, category, priority };
            let all = app.checked(bounties.list().await)?;
            print_json(&filter.apply(all))
        }
        BountySubcommand::Search { query } => {
            app.enter(Route::Bounties).await?;
            print_json(&app.checked(bounties.search(&query).await)?)
        }
        BountySubcommand::View { id } => {
            app.enter(Route::ViewBounty(id.clone())).await?;
            print_json(&app.checked(bounties.get(&id).await)?)
        }
        BountySubcommand::Create { title, description, reward, expires_at, category, priority } => {
            app.enter(Route::CreateBounty).await?;
            let request = CreateBountyRequest { title, description, reward, expires_at, category, priority };
            print_json(&app.checked(bounties.create(&request).await)?)
        }
        BountySubcommand::Edit { id, title, description, reward, status, expires_at, category, priority } => {
            app.enter(Route::EditBounty(id.clone())).await?;
            let request = UpdateBountyRequest {
                title,
                description,
                reward,
                status,
                expires_at,
                category,
                priority,
                ..UpdateBountyRequest::new(id)
            };
            print_json(&app.checked(bounties.update(&request).await)?)
        }
        BountySubcommand::Delete { id } => {
            app.enter(Route::Bounties).await?;
            app.checked(bounties.delete(&id).await)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        BountySubcommand::Status { id, status } => {
            app.enter(Route::EditBounty(id.clone())).await?;
            print_json(&app.checked(bounties.set_status(&id, status).await)?)
        }
        BountySubcommand::Priority { id, priority } => {
            app.enter(Route::EditBounty(id.clone())).await?;
            print_json(&app.checked(bounties.set_priority(&id, priority).await)?)
        }
        BountySubcommand::Category { id, category } => {
            app.enter(Route::EditBounty(id.clone())).await?;
            print_json(&app.checked(bounties.set_category(&id, category).await)?)
        }
        BountySubcommand::Reward { id, amount } => {
            app.enter(Route::EditBounty(id.clone())).await?;
            print_json(&app.checked(bounties.assign_reward(&id, amount).await)?)
        }
    }
}

async fn run_tip(app: &App, tip: TipCommand) -> Result<(), CliError> {
    let tips = &app.tips;
    match tip.command {
        TipSubcommand::List { search, status, category } => {
            app.enter(Route::Tips).await?;
            let filter = TipFilter { search, status, category };
            let all = app.checked(tips.list().await)?;
            print_json(&filter.apply(all))
        }
        TipSubcommand::View { id } => {
            app.enter(Route::ViewTip(id.clone())).await?;
            print_json(&app.checked(tips.get(&id).await)?)
        }
        TipSubcommand::Create { title, description, category, datetime, location, priority, reward } => {
            app.enter(Route::CreateTip).await?;
            let request = CreateTipRequest {
                title,
                description,
                category,
                datetime: datetime.unwrap_or_else(Utc::now),
                location,
                priority,
                reward,
            };
            print_json(&app.checked(tips.create(&request).await)?)
        }
        TipSubcommand::Edit { id, title, description, category, datetime, location, status, priority, reward } => {
            app.enter(Route::EditTip(id.clone())).await?;
            let request = UpdateTipRequest {
                title,
                description,
                category,
                datetime,
                location,
                status,
                priority,
                reward,
                ..UpdateTipRequest::new(id)
            };
            print_json(&app.checked(tips.update(&request).await)?)
        }
        TipSubcommand::Delete { id } => {
            app.enter(Route::Tips).await?;
            app.checked(tips.delete(&id).await)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        TipSubcommand::Status { id, status } => {
            app.enter(Route::EditTip(id.clone())).await?;
            print_json(&app.checked(tips.set_status(&id, status).await)?)
        }
        TipSubcommand::Priority { id, priority } => {
            app.enter(Route::EditTip(id.clone())).await?;
            print_json(&app.checked(tips.set_priority(&id, priority).await)?)
        }
        TipSubcommand::Reward { id, amount } => {
            app.enter(Route::EditTip(id.clone())).await?;
            print_json(&app.checked(tips.assign_reward(&id, amount).await)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
