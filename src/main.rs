//! OrangeBrick - command line front end
//!
//! Renders the listing site as text and drives its actions against a live
//! backend.
//!
//! Environment:
//!   ORANGEBRICK_BACKEND_URL  - Backend base URL (fallback: BACKEND_URL)
//!   ORANGEBRICK_TIMEOUT_SECS - Per-request timeout (default: 10)
//!   RUST_LOG                 - Log level (default: info)

use clap::{Args, Parser, Subcommand};
use orangebrick::utils::{APP_NAME, APP_VERSION};
use orangebrick::{BackendClient, ClientConfig, Page, SaveOutcome, SubmitOutcome};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "orangebrick")]
#[command(about = "OrangeBrick listings, offers and site settings from the terminal")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides the environment)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the whole page (default)
    Page,

    /// Seed demo data and show the listings
    Seed,

    /// Submit an offer on a listed property
    Offer(OfferArgs),

    /// Show or change site settings
    #[command(subcommand)]
    Settings(SettingsCommands),
}

#[derive(Args)]
struct OfferArgs {
    /// Property id, as shown on the listing card
    #[arg(long)]
    property: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    /// Offer amount in dollars
    #[arg(long)]
    amount: String,

    #[arg(long)]
    message: Option<String>,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the admin panel
    Show,

    /// Edit and save settings
    Set(SettingsSetArgs),
}

#[derive(Args)]
struct SettingsSetArgs {
    #[arg(long)]
    primary_color: Option<String>,

    #[arg(long)]
    accent_color: Option<String>,

    #[arg(long)]
    hero_heading: Option<String>,

    #[arg(long)]
    hero_subheading: Option<String>,

    #[arg(long)]
    announcement: Option<String>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn build_config(cli: &Cli) -> eyre::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.backend_url {
        config = config.with_base_url(url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("🧱 {} v{}", APP_NAME, APP_VERSION);
    let config = build_config(&cli)?;
    let page = Page::with_client(BackendClient::new(config)?);

    let ok = match cli.command.unwrap_or(Commands::Page) {
        Commands::Page => {
            page.init().await;
            print!("{}", page.render());
            true
        }
        Commands::Seed => run_seed(&page).await,
        Commands::Offer(args) => run_offer(&page, args).await,
        Commands::Settings(SettingsCommands::Show) => {
            page.settings().load().await;
            print_admin(&page);
            page.settings().state().failure().is_none()
        }
        Commands::Settings(SettingsCommands::Set(args)) => run_settings_set(&page, args).await,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================
// COMMANDS
// ============================================

async fn run_seed(page: &Page) -> bool {
    let outcome = page.seed().await;
    print_notice(page);
    print!("{}", page.render_listings());
    outcome.trigger.is_ok()
}

async fn run_offer(page: &Page, args: OfferArgs) -> bool {
    page.listings().load().await;

    let property = match page.begin_offer(&args.property) {
        Ok(property) => property,
        Err(e) => {
            error!("❌ {}", e);
            return false;
        }
    };
    info!("📝 Offer on {} ({})", property.title, property.id);

    let filled = page.offer_flow().update_form(|form| {
        form.full_name = args.name;
        form.email = args.email;
        form.phone = args.phone.unwrap_or_default();
        form.amount = args.amount;
        form.message = args.message.unwrap_or_default();
    });
    if let Err(e) = filled {
        error!("❌ {}", e);
        return false;
    }

    let outcome = page.submit_offer().await;
    print_notice(page);
    print!("{}", page.render_offers());
    // An unconfirmed offer still reached the backend
    matches!(outcome, SubmitOutcome::Submitted(_) | SubmitOutcome::Unconfirmed(_))
}

async fn run_settings_set(page: &Page, args: SettingsSetArgs) -> bool {
    let settings = page.settings();
    settings.load().await;

    let edited = settings.edit(|draft| {
        if let Some(v) = args.primary_color {
            draft.primary_color = v;
        }
        if let Some(v) = args.accent_color {
            draft.accent_color = v;
        }
        if let Some(v) = args.hero_heading {
            draft.hero_heading = v;
        }
        if let Some(v) = args.hero_subheading {
            draft.hero_subheading = v;
        }
        if let Some(v) = args.announcement {
            draft.announcement = v;
        }
    });
    if let Err(e) = edited {
        error!("❌ {}", e);
        return false;
    }

    let outcome = page.save_settings().await;
    print_notice(page);
    print_admin(page);
    matches!(outcome, SaveOutcome::Saved(_))
}

fn print_notice(page: &Page) {
    if let Some(notice) = page.notice() {
        if notice.is_error() {
            eprintln!("{}", notice.message);
        } else {
            println!("{}", notice.message);
        }
    }
}

fn print_admin(page: &Page) {
    let panel = page.render_admin();
    if panel.is_empty() {
        eprintln!("Settings are unavailable right now.");
    } else {
        print!("{}", panel);
    }
}
