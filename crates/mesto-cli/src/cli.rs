//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mesto_config::{ClientConfig, ConfigOverrides};
use mesto_core::AppState;
use mesto_telemetry::{LogFormat, LoggingConfig, init_logging, with_trace_context};
use tracing::debug;
use uuid::Uuid;

use crate::client::{CliResult, build_app};
use crate::commands::cards::{
    handle_cards_add, handle_cards_like, handle_cards_list, handle_cards_remove,
};
use crate::commands::profile::{handle_profile_avatar, handle_profile_set, handle_profile_show};
use crate::commands::session::{handle_login, handle_logout, handle_register, handle_whoami};

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let result = with_trace_context(trace_id, command_name, execute(cli)).await;

    match result {
        Ok(text) => {
            if !text.is_empty() {
                println!("{text}");
            }
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<String> {
    let config = ClientConfig::from_env()?.apply(cli.overrides())?;

    let logging = LoggingConfig {
        level: &config.log_level,
        format: LogFormat::resolve(config.log_format.as_deref()),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "configuration resolved");

    let mut app = build_app(&config)?;
    let status = app.check_persisted_token().await;
    debug!(?status, "persisted session checked");
    dispatch(&mut app, cli.command, cli.output).await
}

pub(crate) async fn dispatch(
    app: &mut AppState,
    command: Command,
    output: OutputFormat,
) -> CliResult<String> {
    match command {
        Command::Register(args) => handle_register(app, args).await,
        Command::Login(args) => handle_login(app, args, output).await,
        Command::Logout => Ok(handle_logout(app)),
        Command::Whoami => handle_whoami(app, output),
        Command::Profile(profile) => match profile {
            ProfileCommand::Show => handle_profile_show(app, output),
            ProfileCommand::Set(args) => handle_profile_set(app, args, output).await,
            ProfileCommand::Avatar(args) => handle_profile_avatar(app, args, output).await,
        },
        Command::Cards(cards) => match cards {
            CardsCommand::Ls => handle_cards_list(app, output),
            CardsCommand::Add(args) => handle_cards_add(app, args, output).await,
            CardsCommand::Rm(args) => handle_cards_remove(app, args).await,
            CardsCommand::Like(args) => handle_cards_like(app, args, output).await,
        },
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Register(_) => "register",
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Profile(ProfileCommand::Show) => "profile show",
        Command::Profile(ProfileCommand::Set(_)) => "profile set",
        Command::Profile(ProfileCommand::Avatar(_)) => "profile avatar",
        Command::Cards(CardsCommand::Ls) => "cards ls",
        Command::Cards(CardsCommand::Add(_)) => "cards add",
        Command::Cards(CardsCommand::Rm(_)) => "cards rm",
        Command::Cards(CardsCommand::Like(_)) => "cards like",
    }
}

#[derive(Parser)]
#[command(name = "mesto", about = "Command-line client for the Mesto photo gallery")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "MESTO_API_URL")]
    api_url: Option<String>,
    #[arg(long, global = true, env = "MESTO_TOKEN_PATH")]
    token_path: Option<PathBuf>,
    #[arg(long, global = true, env = "MESTO_HTTP_TIMEOUT_SECS")]
    timeout: Option<u64>,
    #[arg(long, global = true, env = "MESTO_LOG_FORMAT")]
    log_format: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            token_path: self.token_path.clone(),
            timeout_secs: self.timeout,
            log_format: self.log_format.clone(),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Create an account.
    Register(AuthArgs),
    /// Sign in and remember the session.
    Login(AuthArgs),
    /// Forget the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Show or edit the profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// List and edit photo cards.
    #[command(subcommand)]
    Cards(CardsCommand),
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    /// Print the current profile.
    Show,
    /// Change name and about.
    Set(ProfileSetArgs),
    /// Change the avatar link.
    Avatar(AvatarArgs),
}

#[derive(Subcommand)]
pub(crate) enum CardsCommand {
    /// List cards in server order.
    Ls,
    /// Upload a new card.
    Add(CardAddArgs),
    /// Delete one of your cards.
    Rm(CardIdArgs),
    /// Like a card, or remove your like.
    Like(CardIdArgs),
}

#[derive(Args, Clone)]
pub(crate) struct AuthArgs {
    #[arg(long, env = "MESTO_EMAIL")]
    pub(crate) email: String,
    /// Read interactively when omitted.
    #[arg(long, env = "MESTO_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Clone)]
pub(crate) struct ProfileSetArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) about: String,
}

#[derive(Args, Clone)]
pub(crate) struct AvatarArgs {
    pub(crate) link: String,
}

#[derive(Args, Clone)]
pub(crate) struct CardAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) link: String,
}

#[derive(Args, Clone)]
pub(crate) struct CardIdArgs {
    pub(crate) id: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
