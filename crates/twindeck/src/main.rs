use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use twindeck_core::{AppConfig, ConfigManager, JsonSettingsStore};
use twindeck_dj::{
    ClockedPlayer, Command, CommandOutcome, DeckController, DeckId, Mixer, SettingsBridge,
    SharedSettings, GAIN_CONTROL_MAX, SPEED_CONTROL_MAX,
};

mod view;

use view::ConsoleView;

/// Two-deck DJ playback controller driven from the terminal.
#[derive(Parser, Debug)]
#[command(name = "twindeck")]
#[command(about = "Two-deck DJ playback controller")]
struct Args {
    /// Configuration file (default: ./twindeck.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings file, overrides the configuration file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Sync tick interval in milliseconds, overrides the configuration file
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Write the effective configuration back to the configuration file
    #[arg(long)]
    save_config: bool,
}

const HELP: &str = "\
commands:
  play <deck>                 stop <deck>
  load <deck> [path]          drop <deck> <path>...
  arm <deck> <cue> on|off     recall <deck> <cue>
  gain <deck> <0-30>          speed <deck> <0-2>
  seek <deck> <0-1>           fade <0-30>
  reset gain|speed <deck>     reset fade
  clear <deck>                status
  help                        quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let settings_path = config.resolved_settings_path();
    let store = match JsonSettingsStore::open(&settings_path) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("{}; settings will not be saved this session", e);
            JsonSettingsStore::in_memory()
        }
    };
    let store: SharedSettings = Arc::new(Mutex::new(store));
    log::info!("Using settings file {:?}", settings_path);

    let views = [ConsoleView::new(), ConsoleView::new()];
    let mut mixer = Mixer::new(
        build_deck(DeckId::One, &store, &config, &views[0]),
        build_deck(DeckId::Two, &store, &config, &views[1]),
    );

    println!("twindeck ready, type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                mixer.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&mut mixer, &views, line.trim()) {
                    break;
                }
            }
        }
    }

    log::info!("Shutting down");
    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig, anyhow::Error> {
    let mut config_manager = ConfigManager::new(args.config.clone());
    let mut config = config_manager.load()?;

    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(settings) = &args.settings {
        config.settings_path = Some(settings.clone());
    }

    ConfigManager::validate(&config)
        .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join("; ")))?;

    if args.save_config {
        config_manager.update(config.clone())?;
        log::info!("Saved configuration to {:?}", config_manager.config_path());
    }

    log::debug!("Configuration {:?}", config);
    Ok(config)
}

fn build_deck(
    id: DeckId,
    store: &SharedSettings,
    config: &AppConfig,
    view: &ConsoleView,
) -> DeckController {
    DeckController::new(
        id,
        Box::new(ClockedPlayer::new(id)),
        Box::new(view.clone()),
        Box::new(view.clone()),
        SettingsBridge::new(id, store.clone()),
    )
    .with_rotation_step(config.rotation_step)
}

/// Handle one input line. Returns false when the user asked to quit.
fn handle_line(mixer: &mut Mixer, views: &[ConsoleView; 2], line: &str) -> bool {
    match line {
        "" => {}
        "quit" | "exit" => return false,
        "help" => println!("{HELP}"),
        "status" => print_status(mixer, views),
        _ => match line.parse::<Command>() {
            Ok(command) => {
                let deck = command.deck();
                report(mixer.handle_command(command), deck);
            }
            Err(e) => println!("{e}"),
        },
    }
    true
}

fn report(outcome: CommandOutcome, deck: Option<DeckId>) {
    match outcome {
        CommandOutcome::Applied => {}
        CommandOutcome::Ignored => match deck {
            Some(deck) => println!("deck {deck}: nothing to do"),
            None => println!("nothing to do"),
        },
        CommandOutcome::Loaded(deck) => println!("deck {deck}: loaded"),
        CommandOutcome::LoadFailed(deck) => println!("deck {deck}: could not load track"),
        CommandOutcome::NeedsPath(deck) => {
            println!("deck {deck}: no track remembered, use 'load {deck} <path>'")
        }
    }
}

fn print_status(mixer: &Mixer, views: &[ConsoleView; 2]) {
    for (snapshot, view) in mixer.snapshots().iter().zip(views) {
        let deck = mixer.deck(snapshot.id);
        let cues: String = deck
            .cue_points()
            .iter()
            .map(|cue| if cue.armed { '*' } else { '.' })
            .collect();

        println!(
            "deck {} {:?} {} gain {:.1}/{} speed {:.2}/{} cues {} {}",
            snapshot.id,
            snapshot.state,
            view.render(30),
            snapshot.gain,
            GAIN_CONTROL_MAX,
            snapshot.speed,
            SPEED_CONTROL_MAX,
            cues,
            snapshot.track_name().unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("crossfade {:.1}", mixer.crossfade().value());
}
