#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Garden Defence experience.

mod client;
mod config;
mod scene;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use garden_defence_core::{Event, GameStatus, TICK_DURATION};
use garden_defence_rendering::{to_lawn_point, Color, Presentation, RenderingBackend, Scene};
use garden_defence_rendering_macroquad::MacroquadBackend;
use garden_defence_world::query;
use tracing_subscriber::EnvFilter;

use self::{
    client::{Account, AccountClient, GAME_LEVEL},
    config::GameConfig,
    simulation::{Autopilot, Outcome, PlayerInput, Simulation},
};

/// Defend the house from zombies by planting sunflowers and peashooters.
#[derive(Debug, Parser)]
#[command(name = "garden-defence", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open a window and play.
    Play(PlayArgs),
    /// Run a headless game driven by the autopilot and print a summary.
    Simulate(SimulateArgs),
    /// Create an account on the score server.
    Register(RegisterArgs),
    /// Check credentials against the score server.
    Login(LoginArgs),
    /// List a player's best scores.
    Scores(ScoresArgs),
}

#[derive(Debug, Args)]
struct GameArgs {
    /// TOML file with game tuning.
    #[arg(long, env = "GARDEN_DEFENCE_CONFIG")]
    config: Option<PathBuf>,
    /// Seed for zombie lanes; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

impl GameArgs {
    fn load(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

#[derive(Debug, Args)]
struct ServerArgs {
    /// Base URL of the account service.
    #[arg(long, env = "GARDEN_DEFENCE_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[command(flatten)]
    game: GameArgs,
    #[command(flatten)]
    server: ServerArgs,
    /// Log in before playing and submit the score of a won game.
    #[arg(long)]
    username: Option<String>,
    /// Password for `--username`; ignored when no username is given.
    #[arg(long, env = "GARDEN_DEFENCE_PASSWORD")]
    password: Option<String>,
    /// Render as fast as possible instead of waiting for the display.
    #[arg(long)]
    no_vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    game: GameArgs,
    /// Simulated seconds to run before giving up on a result.
    #[arg(long, default_value_t = 600)]
    seconds: u64,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[command(flatten)]
    server: ServerArgs,
    /// Name to register; must not be taken.
    #[arg(long)]
    username: String,
    #[arg(long, env = "GARDEN_DEFENCE_PASSWORD")]
    password: String,
    /// Optional contact address.
    #[arg(long)]
    email: Option<String>,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[command(flatten)]
    server: ServerArgs,
    #[arg(long)]
    username: String,
    #[arg(long, env = "GARDEN_DEFENCE_PASSWORD")]
    password: String,
}

#[derive(Debug, Args)]
struct ScoresArgs {
    #[command(flatten)]
    server: ServerArgs,
    /// Account whose scores are listed.
    #[arg(long)]
    user_id: i64,
}

/// Entry point for the Garden Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Play(args) => play(args),
        Command::Simulate(args) => simulate(&args),
        Command::Register(args) => {
            let client = AccountClient::new(&args.server.server);
            let account = client
                .register(&args.username, &args.password, args.email.as_deref())
                .context("registration failed")?;
            print_account("registered", &account);
            Ok(())
        }
        Command::Login(args) => {
            let client = AccountClient::new(&args.server.server);
            let account = client
                .login(&args.username, &args.password)
                .context("login failed")?;
            print_account("logged in", &account);
            Ok(())
        }
        Command::Scores(args) => {
            let client = AccountClient::new(&args.server.server);
            let scores = client.scores(args.user_id).context("failed to fetch scores")?;
            if scores.is_empty() {
                println!("no scores recorded for user {}", args.user_id);
            }
            for (rank, entry) in scores.iter().enumerate() {
                println!(
                    "{:>2}. score {:>5}  waves {}  level {}  at {}  (#{})",
                    rank + 1,
                    entry.score,
                    entry.waves,
                    entry.level,
                    entry.created_at,
                    entry.id
                );
            }
            Ok(())
        }
    }
}

fn print_account(action: &str, account: &Account) {
    println!("{action} as {} (user id {})", account.username, account.user_id);
}

/// Logged-in player whose won games are recorded.
struct Session {
    client: AccountClient,
    account: Account,
}

impl Session {
    fn record(&self, outcome: Outcome) -> String {
        match self
            .client
            .submit_score(self.account.user_id, outcome.score, outcome.waves_completed)
        {
            Ok(entry) => {
                tracing::info!(
                    id = entry.id,
                    score = entry.score,
                    level = GAME_LEVEL,
                    "score saved"
                );
                format!("Score {} saved for {}", entry.score, self.account.username)
            }
            Err(error) => {
                tracing::error!(error = %error, "failed to save score");
                format!("Could not save score: {error}")
            }
        }
    }
}

impl PlayArgs {
    /// Credentials to log in with; a password alone (usually from the
    /// environment) does not start a session.
    fn credentials(&self) -> Result<Option<(&str, &str)>> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Ok(Some((username, password))),
            (Some(_), None) => bail!("--username requires --password"),
            (None, _) => Ok(None),
        }
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let config = args.game.load()?;
    let session = match args.credentials()? {
        Some((username, password)) => {
            let client = AccountClient::new(&args.server.server);
            let account = client
                .login(username, password)
                .context("login failed")?;
            tracing::info!(user_id = account.user_id, "logged in");
            Some(Session { client, account })
        }
        None => None,
    };

    let mut simulation = Simulation::new(&config);
    let mut scene = Scene::new(scene::lawn_presentation()?);
    scene.status_line = session
        .as_ref()
        .map(|session| format!("Playing as {}", session.account.username));
    scene::refresh(&mut scene, simulation.world(), None);

    let presentation = Presentation::new(
        "Garden Defence",
        Color::from_rgb_u8(0x33, 0x69, 0x1e),
        scene,
    );

    MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, scene| {
            let click = if input.lawn_click {
                input.cursor_world_space.map(to_lawn_point)
            } else {
                None
            };
            let player = PlayerInput {
                packet: input.packet,
                click,
                restart: input.restart,
            };

            let events = simulation.frame(dt, player);
            if events
                .iter()
                .any(|event| matches!(event, Event::GameRestarted))
            {
                scene.status_line = session
                    .as_ref()
                    .map(|session| format!("Playing as {}", session.account.username));
            }
            if let Some(outcome) = Outcome::from_events(events) {
                if let (GameStatus::Won, Some(session)) = (outcome.status, session.as_ref()) {
                    scene.status_line = Some(session.record(outcome));
                }
            }

            scene::refresh(scene, simulation.world(), simulation.selected_packet());
        })
}

fn simulate(args: &SimulateArgs) -> Result<()> {
    let config = args.game.load()?;
    let mut simulation = Simulation::new(&config);
    let autopilot = Autopilot::new();
    println!("{}", query::welcome_banner(simulation.world()));

    let total = Duration::from_secs(args.seconds);
    let ticks = total.as_millis() / TICK_DURATION.as_millis();
    let mut outcome = None;
    for _ in 0..ticks {
        let input = autopilot.decide(simulation.world());
        if let Some(result) = Outcome::from_events(simulation.frame(TICK_DURATION, input)) {
            outcome = Some(result);
            break;
        }
    }

    let world = simulation.world();
    let progress = query::progress(world);
    println!("seed: {}", config.seed);
    println!("ticks: {}", query::tick_index(world));
    println!("status: {}", status_label(progress.status));
    println!("score: {}", progress.score);
    println!("wave: {} (kills {}/{})", progress.wave, progress.kills, progress.quota);
    println!("plants: {}", query::plant_view(world).len());
    println!("sun: {}", progress.sun.get());
    if let Some(outcome) = outcome {
        println!("waves completed: {}", outcome.waves_completed);
    }
    Ok(())
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    }
}
