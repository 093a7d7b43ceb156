//! Star Strike headless runner
//!
//! Drives the session with the autopilot pilot, logging audio and keeping the
//! last presented frame. Useful for soak tests and deterministic replays.
//!
//! Usage: star-strike [--seed N] [--frames N] [--config PATH] [--assets DIR]
//!                    [--quality low|medium|high] [--realtime]

use std::process::ExitCode;

use star_strike::assets::{Assets, FsLoader, PlaceholderLoader, ResourceLoader};
use star_strike::audio::{AudioSink, LogAudio};
use star_strike::clock::Clock;
use star_strike::consts::TARGET_FPS;
use star_strike::render::{DrawSink, FrameLog};
use star_strike::sim::{GameState, autopilot, tick};
use star_strike::{GameConfig, GameError, QualityPreset, Settings};

#[derive(Debug)]
struct Args {
    seed: u64,
    frames: u64,
    config: Option<String>,
    assets: Option<String>,
    quality: QualityPreset,
    realtime: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 12345,
            frames: 60 * 60,
            config: None,
            assets: None,
            quality: QualityPreset::default(),
            realtime: false,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, GameError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| GameError::Argument(format!("{name} needs a value")))
        };
        match arg.as_str() {
            "--seed" => parsed.seed = parse_number("--seed", &value("--seed")?)?,
            "--frames" => parsed.frames = parse_number("--frames", &value("--frames")?)?,
            "--config" => parsed.config = Some(value("--config")?),
            "--assets" => parsed.assets = Some(value("--assets")?),
            "--quality" => {
                let name = value("--quality")?;
                parsed.quality = QualityPreset::from_str(&name)
                    .ok_or_else(|| GameError::Argument(format!("unknown quality '{name}'")))?;
            }
            "--realtime" => parsed.realtime = true,
            other => return Err(GameError::Argument(format!("unknown argument '{other}'"))),
        }
    }
    Ok(parsed)
}

fn parse_number(name: &str, value: &str) -> Result<u64, GameError> {
    value
        .parse()
        .map_err(|_| GameError::Argument(format!("{name} expects a number, got '{value}'")))
}

fn run(args: Args) -> Result<(), GameError> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;

    let mut loader: Box<dyn ResourceLoader> = match &args.assets {
        Some(root) => Box::new(FsLoader::new(root)),
        None => Box::new(PlaceholderLoader::default()),
    };
    let assets = Assets::load(&config, loader.as_mut())?;

    let settings = Settings::for_session(args.quality, &config.session);
    log::info!(
        "Quality {} ({} stars), music volume {:.1}",
        settings.quality.as_str(),
        settings.quality.star_count(),
        settings.music_volume
    );
    let mut audio = LogAudio::new(settings.music_volume, assets.sounds.clone());
    let mut state = GameState::new(&config, &assets, args.seed, settings)?;
    let mut screen = FrameLog::default();
    let mut clock = args.realtime.then(|| Clock::new(TARGET_FPS));
    let fixed_dt = 1.0 / f64::from(TARGET_FPS);

    for _ in 0..args.frames {
        let dt = clock.as_mut().map_or(fixed_dt, Clock::tick);
        let input = autopilot(&state);
        let out = tick(&mut state, &input, dt);

        for event in &out.audio {
            audio.handle(event);
        }
        if out.quit {
            break;
        }
        // Paused frames re-present the last one
        if let Some(frame) = out.frame.as_ref().or(screen.last()).cloned() {
            screen.present(&frame);
        }
    }

    log::info!(
        "Finished after {} ticks ({:.1}s simulated): score {}, level {}, player level {}, {} sounds, {} frames",
        state.time_ticks,
        state.elapsed,
        state.total_score,
        state.level.index() + 1,
        state.player().level,
        audio.played(),
        screen.presented()
    );
    if clock.is_some() {
        log::info!("Average FPS {:.1}", state.fps);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Strike starting...");

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
