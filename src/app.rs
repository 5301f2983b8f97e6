//! Main application UI and state management.
//! Handles the card list, card creation, import/export and review sessions.

use crate::export::json::{export_json_to_path, import_json};
use crate::models::scheduler::{
    format_interval, merge_updates, preview_intervals, review_stats, start_of_day,
};
use crate::models::{
    Card, Clock, RandomSource, Rating, ReviewSession, SimulatedClock, select_due_cards,
};
use crate::store::{CardStore, StoreError};
use eframe::egui;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// Main application state
pub struct ReviewApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    cards: Vec<Card>,
    store: Box<dyn CardStore>,
    user_id: String,
    clock: SimulatedClock,
    rng: Box<dyn RandomSource>,

    current_question: String,
    current_answer: String,

    current_screen: AppScreen,
    review_session: Option<ReviewSession>,

    show_result_dialog: bool,
    result_message: String,

    /// Set when the stored cards could not be read; saving is refused so the
    /// file on disk is never replaced by a partial collection.
    load_error: Option<String>,
}

impl eframe::App for ReviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_result_dialog {
            egui::Window::new("Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl ReviewApp {
    /// Creates the app from the result of loading the user's cards.
    /// A failed load starts the app in read-only mode.
    pub fn new(
        loaded: Result<Vec<Card>, StoreError>,
        store: Box<dyn CardStore>,
        user_id: String,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let (cards, load_error) = match loaded {
            Ok(cards) => (cards, None),
            Err(e) => {
                log::error!("Failed to load cards, changes will not be saved: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut app = Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            cards,
            store,
            user_id,
            clock: SimulatedClock::new(),
            rng,
            current_question: String::new(),
            current_answer: String::new(),
            current_screen: AppScreen::Main,
            review_session: None,
            show_result_dialog: false,
            result_message: String::new(),
            load_error,
        };

        if let Some(e) = &app.load_error {
            let message = format!(
                "Your cards could not be loaded: {}\n\nChanges made now will not be saved. \
                 Fix or move the cards file and restart.",
                e
            );
            app.show_result(message);
        }
        app
    }

    fn show_result(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    /// Returns whether the cards reached the store.
    fn save_cards(&mut self) -> bool {
        if let Some(e) = &self.load_error {
            log::warn!("Not saving cards, the stored cards failed to load: {}", e);
            let message = format!("Not saved: the stored cards failed to load ({})", e);
            self.show_result(message);
            return false;
        }

        match self.store.save_all(&self.user_id, &self.cards) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save cards: {}", e);
                self.show_result(format!("Saving failed: {}", e));
                false
            }
        }
    }

    /// Renders the main screen with the card list and review entry point
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        let now = self.clock.now();
        let stats = review_stats(&self.cards, now);

        let mut action_next_day = false;
        let mut action_export = false;
        let mut action_import = false;
        let mut action_add = false;
        let mut action_review = false;
        let mut action_delete: Option<usize> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(start_of_day(now).format("%Y-%m-%d").to_string());
                if self.clock.offset_days() > 0 {
                    ui.label(format!("(+{} days)", self.clock.offset_days()));
                }
                if ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Cards").clicked() {
                    action_export = true;
                }
                if ui.button("Import Cards").clicked() {
                    action_import = true;
                }
            });

            ui.separator();

            ui.heading("New Card");
            ui.horizontal(|ui| {
                ui.label("Question:");
                ui.text_edit_singleline(&mut self.current_question);
            });
            ui.horizontal(|ui| {
                ui.label("Answer:");
                ui.text_edit_singleline(&mut self.current_answer);
            });
            if ui.button("Add Card").clicked() {
                action_add = true;
            }

            ui.separator();

            ui.label(format!(
                "{} cards, {} due, {} new, {} reviewed today",
                stats.total, stats.due, stats.new, stats.reviewed_today
            ));
            if ui
                .add_enabled(stats.due > 0, egui::Button::new("Review Due Cards"))
                .clicked()
            {
                action_review = true;
            }

            ui.separator();

            ui.heading(format!("Cards ({})", self.cards.len()));

            egui::ScrollArea::vertical()
                .id_source("cards_list")
                .max_height(300.0)
                .show(ui, |ui| {
                    for (i, card) in self.cards.iter().enumerate() {
                        ui.group(|ui| {
                            ui.label(format!("{}. {}", i + 1, card.question));
                            ui.label(format!("   Answer: {}", card.answer));
                            ui.horizontal(|ui| {
                                ui.label(format!(
                                    "   Due {} · every {} · ease {:.2}",
                                    card.due_date.format("%Y-%m-%d"),
                                    format_interval(card.interval_days),
                                    card.ease_factor
                                ));
                                if ui.small_button("Delete").clicked() {
                                    action_delete = Some(i);
                                }
                            });
                        });
                    }
                });
        });

        // Execute deferred actions
        if action_next_day {
            self.clock.advance_day();
        }
        if action_add {
            self.add_card();
        }
        if let Some(i) = action_delete {
            let removed = self.cards.remove(i);
            log::info!("Deleted card {}", removed.id);
            self.save_cards();
        }
        if action_review {
            self.start_review_session();
        }
        if action_export {
            self.handle_export();
        }
        if action_import {
            self.handle_import();
        }
    }

    /// Renders the review screen, one card at a time
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        let mut action_toggle_answer = false;
        let mut action_rate: Option<Rating> = None;
        let mut action_back = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.review_session else {
                action_back = true;
                return;
            };

            let (rated, total) = session.progress();
            ui.heading("Review");
            ui.label(format!("Progress: {} / {}", rated, total));
            ui.add_space(20.0);

            if session.is_completed() {
                let result = session.result();
                ui.heading("Session complete!");
                for rating in Rating::ALL {
                    ui.label(format!("{}: {}", rating, result.count(rating)));
                }

                ui.add_space(20.0);
                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
            } else if let Some(card) = session.current_card() {
                ui.group(|ui| {
                    ui.set_min_height(200.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);

                        ui.heading("Question:");
                        ui.label(&card.question);

                        ui.add_space(20.0);

                        if session.show_answer {
                            ui.heading("Answer:");
                            ui.label(&card.answer);
                        } else {
                            ui.label("(Click 'Show Answer' to reveal)");
                        }

                        ui.add_space(20.0);
                    });
                });

                ui.add_space(20.0);

                if session.show_answer {
                    ui.label("How well did you remember?");
                    let previews = preview_intervals(card);
                    ui.horizontal(|ui| {
                        for (rating, days) in Rating::ALL.into_iter().zip(previews) {
                            if ui
                                .button(format!("{} ({})", rating, format_interval(days)))
                                .clicked()
                            {
                                action_rate = Some(rating);
                            }
                        }
                    });
                } else if ui.button("Show Answer").clicked() {
                    action_toggle_answer = true;
                }

                ui.add_space(20.0);

                if ui.button("Back to Main Screen").clicked() {
                    action_back = true;
                }
            }
        });

        // Execute deferred actions
        if action_toggle_answer {
            if let Some(session) = &mut self.review_session {
                session.toggle_answer();
            }
        }
        if let Some(rating) = action_rate {
            self.rate_current_card(rating);
        }
        if action_back {
            self.end_review_session();
        }
    }

    fn add_card(&mut self) {
        let question = self.current_question.trim();
        let answer = self.current_answer.trim();
        if question.is_empty() || answer.is_empty() {
            return;
        }

        let card = Card::new(question, answer, self.clock.now());
        log::info!("Added card {}", card.id);
        self.cards.push(card);
        self.current_question.clear();
        self.current_answer.clear();
        self.save_cards();
    }

    /// Starts a review session with the cards due today
    fn start_review_session(&mut self) {
        let due_cards = select_due_cards(&self.cards, self.clock.now());
        if due_cards.is_empty() {
            return;
        }

        let mut session = ReviewSession::new(due_cards);
        session.start();
        self.review_session = Some(session);
        self.current_screen = AppScreen::Review;
    }

    /// Rates the current card and saves it straight away, so quitting
    /// mid-session keeps every grade given so far.
    fn rate_current_card(&mut self, rating: Rating) {
        let now = self.clock.now();
        let Some(session) = &mut self.review_session else {
            return;
        };

        let updated = match session.record_rating(rating, now, self.rng.as_mut()) {
            Ok(card) => card.clone(),
            Err(e) => {
                log::warn!("Rating ignored: {}", e);
                return;
            }
        };

        self.cards = merge_updates(&self.cards, std::slice::from_ref(&updated));
        self.save_cards();
    }

    /// Leaves the review screen. Ratings are already saved.
    fn end_review_session(&mut self) {
        self.current_screen = AppScreen::Main;
        if let Some(session) = self.review_session.take() {
            if let Err(e) = session.finish() {
                log::info!("Review session left early: {}", e);
            }
        }
    }

    /// Handles card export to a JSON file
    fn handle_export(&mut self) {
        // Open file save dialog
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("cards.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            match export_json_to_path(&self.cards, &path) {
                Ok(()) => {
                    self.show_result(format!("Exported {} cards successfully!", self.cards.len()))
                }
                Err(e) => self.show_result(format!("Export failed: {}", e)),
            }
        }
    }

    /// Handles card import from a JSON file.
    /// Cards already present (same id) are replaced by the imported version.
    fn handle_import(&mut self) {
        // Open file selection dialog
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_json(&path) {
                Ok(imported) => {
                    self.cards = merge_updates(&self.cards, &imported);
                    if self.save_cards() {
                        self.show_result(format!(
                            "Imported {} cards successfully!",
                            imported.len()
                        ));
                    }
                }
                Err(e) => {
                    log::warn!("Import from {:?} failed: {}", path, e);
                    self.show_result(format!(
                        "Import failed: {}\n\nThe file must contain a JSON array of cards.",
                        e
                    ));
                }
            }
        }
    }
}
