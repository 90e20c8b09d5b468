//! Star Dash entry point
//!
//! Runs a headless session on the arcade world with a scripted player and
//! logs how it went. Usage: `star-dash [seed] [seconds] [tuning.json]`

use std::error::Error;

use star_dash::Settings;
use star_dash::Tuning;
use star_dash::consts::FRAME_MS;
use star_dash::sim::{ArcadeWorld, GameEvent, ScenePort, Session, TickInput};

/// Run summary
#[derive(Debug, Default)]
struct Stats {
    frames: u64,
    shots: u32,
    kills: u32,
    stars: u32,
    best_score: u32,
}

/// Scripted player: run right, hop regularly, back off now and then, keep firing
fn scripted_input(frame: u64) -> TickInput {
    let phase = frame % 360;
    TickInput {
        left: (300..330).contains(&phase),
        right: phase < 300,
        up: frame % 45 < 4,
        fire: true,
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 42,
    };
    let seconds: f64 = match args.next() {
        Some(s) => s.parse()?,
        None => 60.0,
    };
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("Loaded tuning from {}", path);
            Tuning::from_json(&json)?
        }
        None => Tuning::default(),
    };

    let settings = Settings::default();
    let viewport = settings.fit(1920.0, 1080.0);
    log::info!(
        "Surface {}x{} ({}), 1920x1080 viewport: scale {:.2}, offset ({:.0}, {:.0})",
        settings.width,
        settings.height,
        settings.scale_mode.as_str(),
        viewport.scale.x,
        viewport.offset.x,
        viewport.offset.y
    );

    let mut session = Session::seeded(ArcadeWorld::new(), tuning, seed);
    session.start();

    let total_frames = (seconds * 1000.0 / FRAME_MS).ceil() as u64;
    let mut stats = Stats::default();
    for frame in 0..total_frames {
        let score_before = session.score();
        for event in session.tick(&scripted_input(frame), FRAME_MS) {
            match event {
                GameEvent::Fired { .. } => stats.shots += 1,
                GameEvent::EnemyKilled { .. } => stats.kills += 1,
                GameEvent::Collected { .. } => stats.stars += 1,
                GameEvent::Restarted { cause } => {
                    stats.best_score = stats.best_score.max(score_before);
                    log::info!("Run over ({:?}) at {:.1}s", cause, session.port().now() / 1000.0);
                }
                _ => {}
            }
        }
        stats.frames += 1;
    }
    stats.best_score = stats.best_score.max(session.score());

    log::info!(
        "Done: {} frames, score {} (best {}), {} restart(s), {} stars, {} spiders shot, {} shots, {} live entities",
        stats.frames,
        session.score(),
        stats.best_score,
        session.restarts(),
        stats.stars,
        stats.kills,
        stats.shots,
        session.port().entity_count()
    );
    println!("{}", session.port().score_text());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Dash (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library and drive `Session::tick` themselves
}
