//! View rendering (review editor, results, feedback, settings, alerts)

use super::{AlertKind, App, SessionState};
use crate::constants::*;
use crate::theme;
use crate::types::{AnalysisResult, SentimentTone, ViewMode};
use crate::ui::components::{self, SummaryFields};
use chrono::{DateTime, Local};
use eframe::egui;

impl App {
    // ========================================================================
    // MAIN PANEL
    // ========================================================================

    pub(crate) fn render_main_panel(&mut self, ctx: &egui::Context) {
        let state = self.session.snapshot();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(24, 20)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let width = ui.available_width().min(theme::CONTENT_MAX_WIDTH);
                        let margin = ((ui.available_width() - width) / 2.0).max(0.0);
                        ui.horizontal(|ui| {
                            ui.add_space(margin);
                            ui.vertical(|ui| {
                                ui.set_width(width);
                                self.render_review_editor(ui, &state);
                                self.render_results_area(ui, &state);
                                if state.feedback_visible {
                                    ui.add_space(theme::SPACING_XL);
                                    self.render_feedback(ui, &state);
                                }
                            });
                        });
                    });
            });
    }

    fn render_review_editor(&mut self, ui: &mut egui::Ui, state: &SessionState) {
        ui.label(
            egui::RichText::new("Aspect-Based Sentiment Analysis")
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(theme::SPACING_LG);

        let editor = ui.add(
            egui::TextEdit::multiline(&mut self.review_text)
                .id(review_editor_id())
                .hint_text("Enter your review here...")
                .desired_rows(5)
                .desired_width(f32::INFINITY)
                .font(egui::FontId::proportional(theme::FONT_BODY))
                .margin(egui::Margin::same(10)),
        );
        // Consumed so the alert modal later this frame does not also see the Enter
        let shortcut = editor.has_focus()
            && ui.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));

        ui.add_space(theme::SPACING_MD);
        ui.horizontal(|ui| {
            let label = format!("{}  Analyze", egui_phosphor::regular::MAGNIFYING_GLASS);
            let clicked = ui.add(theme::button_accent(label)).clicked();
            if clicked || shortcut {
                // Blank input is reported through the alert queue
                let _ = self.session.submit_review(&self.review_text);
            }
            if state.mode == ViewMode::Loading {
                ui.add_space(theme::SPACING_MD);
                ui.spinner();
                ui.label(egui::RichText::new("Analyzing review...").color(theme::TEXT_MUTED));
            }
        });
    }

    fn render_results_area(&self, ui: &mut egui::Ui, state: &SessionState) {
        let Some(result) = state.visible_result() else {
            return;
        };
        ui.add_space(theme::SPACING_XL);
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            self.render_results(ui, result, state.analyzed_at);
        });
    }

    fn render_results(
        &self,
        ui: &mut egui::Ui,
        result: &AnalysisResult,
        analyzed_at: Option<DateTime<Local>>,
    ) {
        let summary = SummaryFields::from_result(result);
        let tone = SentimentTone::from_label(&summary.overall);

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Overall Sentiment:")
                    .size(theme::FONT_HEADING)
                    .strong(),
            );
            ui.label(
                egui::RichText::new(&summary.overall)
                    .size(theme::FONT_HEADING)
                    .strong()
                    .color(theme::tone_color(tone)),
            );
            if let Some(at) = analyzed_at {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  {}",
                            egui_phosphor::regular::CLOCK,
                            at.format("%H:%M:%S")
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                    );
                });
            }
        });
        ui.add_space(theme::SPACING_MD);

        ui.horizontal(|ui| {
            if self.settings.show_gauge {
                ui.vertical(|ui| {
                    components::gauge(ui, result.sentiment_percentages.positive_percentage);
                    ui.label(
                        egui::RichText::new("Sentiment Percentage")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                });
                ui.add_space(theme::SPACING_XL);
            }
            ui.vertical(|ui| {
                percentage_line(ui, "Positive", &summary.positive, theme::STATUS_SUCCESS);
                percentage_line(ui, "Negative", &summary.negative, theme::STATUS_ERROR);
                ui.label(
                    egui::RichText::new(format!("{} sentences analyzed", result.analysis.len()))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
            });
        });

        ui.add_space(theme::SPACING_LG);
        let columns = self.table_columns();
        let rows = components::table_rows(&result.analysis, columns);
        components::aspect_table(ui, &rows, columns);
    }

    fn render_feedback(&mut self, ui: &mut egui::Ui, state: &SessionState) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new("Rate your experience:")
                    .size(theme::FONT_HEADING)
                    .strong(),
            );
            ui.add_space(theme::SPACING_SM);
            ui.horizontal(|ui| {
                if let Some(rating) = components::star_rating(ui, state.pending_rating) {
                    self.session.select_rating(rating);
                }
                ui.add_space(theme::SPACING_LG);
                let label = format!("{}  Submit Feedback", egui_phosphor::regular::PAPER_PLANE_RIGHT);
                if ui.add(theme::button_accent(label)).clicked() {
                    // Missing rating is reported through the alert queue
                    let _ = self.session.submit_feedback();
                }
            });
        });
    }

    // ========================================================================
    // STATUS BAR & SETTINGS
    // ========================================================================

    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(12, 2)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Service: {}", self.service_url))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let gear = ui.add(
                            egui::Button::new(
                                egui::RichText::new(egui_phosphor::regular::GEAR).size(theme::FONT_LABEL),
                            )
                            .frame(false),
                        );
                        if gear.on_hover_text("Settings").clicked() {
                            self.show_settings = !self.show_settings;
                            self.service_url_input = self.service_url.clone();
                            self.settings_error = None;
                        }
                        ui.label(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });
    }

    pub(crate) fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -36.0))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Service URL").size(theme::FONT_LABEL).color(theme::TEXT_MUTED));
                ui.horizontal(|ui| {
                    let input = ui.add(
                        egui::TextEdit::singleline(&mut self.service_url_input)
                            .desired_width(260.0)
                            .hint_text(DEFAULT_SERVICE_URL),
                    );
                    let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.add(theme::button("Apply")).clicked() || submitted {
                        self.apply_service_url();
                    }
                });
                if let Some(err) = &self.settings_error {
                    ui.label(
                        egui::RichText::new(format!("{}  {}", egui_phosphor::regular::WARNING, err))
                            .size(theme::FONT_SMALL)
                            .color(theme::STATUS_ERROR),
                    );
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                if theme::settings_checkbox(ui, self.settings.show_sentiment_words, "Show key sentiment words") {
                    self.settings.show_sentiment_words = !self.settings.show_sentiment_words;
                }
                if theme::settings_checkbox(ui, self.settings.show_gauge, "Show sentiment gauge") {
                    self.settings.show_gauge = !self.settings.show_gauge;
                }
            });

        if !open {
            self.show_settings = false;
        }
    }

    // ========================================================================
    // ALERTS
    // ========================================================================

    pub(crate) fn render_alert_modal(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.session.current_alert() else {
            return;
        };

        let (icon, color) = match alert.kind {
            AlertKind::Warning => (egui_phosphor::regular::WARNING, theme::STATUS_WARNING),
            AlertKind::Error => (egui_phosphor::regular::X_CIRCLE, theme::STATUS_ERROR),
            AlertKind::Success => (egui_phosphor::regular::CHECK_CIRCLE, theme::STATUS_SUCCESS),
        };

        let modal = egui::Modal::new(egui::Id::new("alert_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(160))
            .frame(theme::modal_frame());
        let response = modal.show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.set_max_width(320.0);
            let mut dismissed = false;
            ui.vertical_centered(|ui| {
                ui.add_space(theme::SPACING_SM);
                ui.label(egui::RichText::new(icon).size(32.0).color(color));
                ui.add_space(theme::SPACING_MD);
                ui.add(egui::Label::new(egui::RichText::new(&alert.message).size(theme::FONT_BODY)).wrap());
                ui.add_space(theme::SPACING_XL);
                let ok = ui.add(theme::button_accent(format!("{}  OK", egui_phosphor::regular::CHECK)));
                let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                dismissed = ok.clicked() || enter;
            });
            dismissed
        });

        if response.inner || response.should_close() {
            self.session.dismiss_alert();
        }
    }
}

fn review_editor_id() -> egui::Id {
    egui::Id::new("review_editor")
}

fn percentage_line(ui: &mut egui::Ui, label: &str, value: &str, color: egui::Color32) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("{label}:"))
                .size(theme::FONT_BODY)
                .color(theme::TEXT_MUTED),
        );
        ui.label(
            egui::RichText::new(format!("{value}%"))
                .size(theme::FONT_BODY)
                .strong()
                .color(color),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    fn command_enter() -> egui::RawInput {
        let modifiers = egui::Modifiers {
            ctrl: true,
            command: true,
            ..Default::default()
        };
        egui::RawInput {
            modifiers,
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers,
            }],
            ..Default::default()
        }
    }

    fn frame(ctx: &egui::Context, app: &mut App, input: egui::RawInput) {
        let _ = ctx.run(input, |ctx| {
            app.render_main_panel(ctx);
            app.render_alert_modal(ctx);
        });
    }

    #[test]
    fn shortcut_on_blank_review_leaves_alert_open() {
        let ctx = egui::Context::default();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&ctx, dir.path().to_path_buf());
        app.review_text = "   ".into();

        frame(&ctx, &mut app, egui::RawInput::default());
        ctx.memory_mut(|m| m.request_focus(review_editor_id()));
        frame(&ctx, &mut app, command_enter());

        assert_eq!(
            app.session.current_alert().map(|a| (a.kind, a.message)),
            Some((AlertKind::Warning, MSG_EMPTY_REVIEW.to_string()))
        );

        // A plain Enter on a later frame closes it
        ctx.memory_mut(|m| m.surrender_focus(review_editor_id()));
        let enter = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        frame(&ctx, &mut app, enter);
        assert!(app.session.current_alert().is_none());
    }
}
