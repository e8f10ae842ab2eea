//! Unicorn Fly headless runner
//!
//! Plays one autopilot run at 60 fps without rendering and stores the best
//! score. Real hosts drive `Game::frame` from their animation callback.

use std::time::{SystemTime, UNIX_EPOCH};

use unicorn_fly::audio::AudioManager;
use unicorn_fly::persistence::JsonFileStore;
use unicorn_fly::sim::GamePhase;
use unicorn_fly::{Game, ScoreStore, Settings, StoredBestScore, WorldConfig};

/// Host frame rate for the demo
const FRAME_DT: f64 = 1.0 / 60.0;
/// Stop after this much simulated time even if still alive
const MAX_RUN_SECS: f64 = 300.0;
/// Optional path to a JSON world config
const CONFIG_ENV: &str = "UNICORN_FLY_CONFIG";

/// World config from `$UNICORN_FLY_CONFIG`, or the defaults
fn load_config() -> Result<WorldConfig, String> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(WorldConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    let config = WorldConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    log::info!("Loaded world config from {}", path);
    Ok(config)
}

fn main() {
    env_logger::init();
    log::info!("Unicorn Fly (headless) starting...");

    let save_path = std::env::temp_dir().join("unicorn_fly_save.json");
    let mut kv = JsonFileStore::open_or_empty(&save_path);
    let settings = Settings::load(&kv);
    // Write back so a fresh save file lists every setting
    settings.save(&mut kv);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x00C0_FFEE);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Could not load world config {}", e);
            std::process::exit(1);
        }
    };

    let scores = StoredBestScore::load(kv);
    let mut game = match Game::new(config, seed, scores, AudioManager::silent()) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid world config: {}", e);
            std::process::exit(1);
        }
    };
    game.apply_settings(&settings);
    game.set_autopilot(true);

    let mut now = 0.0;
    while now < MAX_RUN_SECS {
        now += FRAME_DT;
        game.frame(now);
        if game.state().phase == GamePhase::GameOver {
            break;
        }
    }

    match game.view().to_json() {
        Ok(json) => log::debug!("Final frame: {}", json),
        Err(e) => log::warn!("Could not serialize final frame: {}", e),
    }

    let state = game.state();
    println!(
        "Run finished after {:.1}s: score {}, level {}, best {}",
        now,
        state.score,
        state.level,
        game.scores().best_score()
    );
    log::info!("Save file: {}", game.scores().store().path().display());
}
