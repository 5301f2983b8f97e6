mod app;
use flashcards_review::*;

use app::ReviewApp;
use models::{Clock, SeededRandom, SystemClock};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let settings_path = Settings::path_in(&Settings::default_dir());
    let settings = Settings::load_or_init(&settings_path).unwrap_or_else(|e| {
        log::warn!("Could not read {:?}, using defaults: {}", settings_path, e);
        Settings::default()
    });

    let store = JsonFileCardStore::new(settings.cards_dir());
    let loaded = match store.load_all(&settings.user_id) {
        Ok(cards) if cards.is_empty() => {
            let now = SystemClock.now();
            let samples = vec![
                Card::new("cześć", "hello", now),
                Card::new("dziękuję", "thank you", now),
                Card::new("proszę", "please", now),
            ];
            if let Err(e) = store.save_all(&settings.user_id, &samples) {
                log::warn!("Could not save sample cards: {}", e);
            }
            log::info!("Sample cards created");
            Ok(samples)
        }
        Ok(cards) => {
            log::info!("Loaded {} cards for '{}'", cards.len(), settings.user_id);
            Ok(cards)
        }
        Err(e) => Err(e),
    };

    let rng = match settings.fuzz_seed {
        Some(seed) => SeededRandom::from_seed_u64(seed),
        None => SeededRandom::from_entropy(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        "Flashcards Review",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ReviewApp::new(
                loaded,
                Box::new(store),
                settings.user_id,
                Box::new(rng),
            )))
        }),
    )
}
