// Entry point for the Mine Hunter terminal game
// Loads configuration, sets up logging and the terminal, then runs one session

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use tracing::info;

// Module declarations
mod mh_color; // Terminal color depth and theme
mod mh_ui;    // Terminal frontend: input mapping and rendering

use minehunt::mh_config::load_or_create_config;
use minehunt::mh_lang::Lang;
use minehunt::{mh_log, run_session};
use mh_color::{Depth, Theme};
use mh_ui::{Glyphs, TerminalFrontend};

fn main() -> Result<(), Box<dyn Error>> {
    // Logging is opt-in via MINEHUNT_LOG and never writes to the terminal
    if let Err(e) = mh_log::init_from_env() {
        eprintln!("logging disabled: {e}");
    }

    // Load or create user configuration
    let cfg = load_or_create_config();
    let lang = Lang::new(&cfg.language);
    let mut rng = match cfg.seed {
        Some(seed) => {
            info!(seed, "using fixed RNG seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let theme = Theme::new(Depth::detect());
    let mut frontend = TerminalFrontend::enter(lang, theme, Glyphs::new(cfg.ascii_icons))?;
    let result = run_session(&mut frontend, &cfg, &mut rng);

    // Always try to restore terminal state
    let restored = frontend.exit();
    let outcomes = result?;
    restored?;
    info!(campaigns = outcomes.len(), last = ?outcomes.last(), "session finished");
    Ok(())
}
