//! Word Breaker entry point
//!
//! Runs a headless autopilot session.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use word_breaker::GameConfig;
use word_breaker::audio::{AudioManager, LogBackend};
use word_breaker::platform::{HeadlessHost, run};
use word_breaker::sim::GameState;
use word_breaker::sim::words::load_word_list;

/// Thirty minutes of game time
const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 30;

#[derive(Parser, Debug)]
#[command(name = "word-breaker")]
#[command(about = "Headless autopilot session of the Word Breaker vocabulary game")]
struct Args {
    /// Word list JSON (`[{"id", "word", "ja"}]`)
    #[arg(default_value = "data/words.json")]
    words: PathBuf,
    /// Game config JSON; defaults are used when omitted
    config: Option<PathBuf>,
    /// RNG seed; taken from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many frames if the result screen isn't reached
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    max_frames: u64,
    /// Master volume for cues, 0..1
    #[arg(long, default_value_t = 0.8)]
    volume: f32,
    /// Sound effect volume, 0..1
    #[arg(long, default_value_t = 1.0)]
    sfx_volume: f32,
    #[arg(long)]
    mute: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("Word Breaker (headless) starting...");

    let config = match &args.config {
        Some(path) => GameConfig::load(path),
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(clock_seed);

    let words = load_word_list(&args.words);
    let mut state = GameState::new(config, words, seed);
    let mut host = HeadlessHost::new(args.max_frames);

    let mut audio = AudioManager::with_backend(Box::new(LogBackend));
    audio.set_master_volume(args.volume);
    audio.set_sfx_volume(args.sfx_volume);
    audio.set_muted(args.mute);

    let frames = run(&mut state, &mut host, &mut audio);

    let summary = state.words.summary();
    log::info!(
        "Finished in {frames} frames at stage {} ({:?}), seed {}",
        state.stage,
        state.phase,
        state.seed
    );
    log::info!(
        "Final score: {} (perfect: {}, lives lost: {}, blocks hit: {}, stages cleared: {})",
        state.score.final_score(),
        state.score.is_perfect(),
        host.lives_lost(),
        host.blocks_hit(),
        host.stages_cleared()
    );
    log::info!(
        "Words: {} correct, {} to review, {} unseen",
        summary.correct,
        summary.missed,
        summary.unseen
    );
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
