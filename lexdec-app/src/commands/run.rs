use anyhow::{Context, Result};
use lexdec_core::{default_word_list, load_word_list};
use lexdec_experiment::{order_rng, shuffle_stimuli};
use lexdec_render::load_font;
use lexdec_session::{FileStorage, MemoryStorage, SessionStore};
use tracing::info;

use crate::RunArgs;
use crate::app::App;
use crate::config::AppConfig;

pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(ms) = args.feedback_delay_ms {
        config.runner.feedback_delay_ms = ms;
    }
    if let Some(font) = args.font.clone() {
        config.display.font = Some(font);
    }

    let mut stimuli = match &args.words {
        Some(path) => load_word_list(path)
            .with_context(|| format!("cannot use word list {}", path.display()))?,
        None => default_word_list(),
    };
    if args.shuffle {
        shuffle_stimuli(&mut stimuli, &mut order_rng(args.seed));
    }

    let font_path = config.font_path();
    let font = load_font(&font_path).context("a TrueType font is required, pass one with --font")?;

    info!(
        stimuli = stimuli.len(),
        feedback_delay_ms = config.runner.feedback_delay_ms,
        shuffled = args.shuffle,
        platform = std::env::consts::OS,
        "starting lexical decision task"
    );

    match args.session_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "session kept on disk");
            let store = SessionStore::new(FileStorage::new(dir));
            App::new(stimuli, config.runner, font, store).run()
        }
        None => {
            let store = SessionStore::new(MemoryStorage::new());
            App::new(stimuli, config.runner, font, store).run()
        }
    }
}
