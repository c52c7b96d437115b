//! Reusable UI components
//!
//! Stateless widgets for the results block and the feedback prompt. Each one
//! renders exactly what it is given; row building is split out so the table
//! contents can be checked without a window.

use crate::constants::MAX_RATING;
use crate::theme;
use crate::types::{AnalysisResult, FeedbackRating, Finding, SentimentTone};
use crate::utils::join_labels;
use eframe::egui;

// ============================================================================
// SUMMARY
// ============================================================================

/// Percentages are shown as received, never recomputed or rounded
pub fn format_percentage(value: f64) -> String {
    value.to_string()
}

/// Text for the overall label and the two percentage fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub overall: String,
    pub positive: String,
    pub negative: String,
}

impl SummaryFields {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            overall: result.overall_sentiment.clone(),
            positive: format_percentage(result.sentiment_percentages.positive_percentage),
            negative: format_percentage(result.sentiment_percentages.negative_percentage),
        }
    }
}

// ============================================================================
// ASPECT TABLE
// ============================================================================

/// Which optional columns the findings table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumns {
    pub sentiment_words: bool,
}

impl TableColumns {
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["Sentence", "Aspects", "Sentiment"];
        if self.sentiment_words {
            headers.push("Key Sentiment Words");
        }
        headers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub sentence: String,
    pub aspects: String,
    pub sentiment: String,
    pub sentiment_words: Option<String>,
    pub tone: SentimentTone,
}

impl TableRow {
    pub fn cells(&self) -> Vec<&str> {
        let mut cells = vec![self.sentence.as_str(), self.aspects.as_str(), self.sentiment.as_str()];
        if let Some(words) = &self.sentiment_words {
            cells.push(words);
        }
        cells
    }
}

/// One row per finding, in the order the service returned them
pub fn table_rows(findings: &[Finding], columns: TableColumns) -> Vec<TableRow> {
    findings
        .iter()
        .map(|f| TableRow {
            sentence: f.sentence.clone(),
            aspects: join_labels(&f.aspects),
            sentiment: f.sentiment.clone(),
            sentiment_words: columns.sentiment_words.then(|| join_labels(&f.sentiment_words)),
            tone: SentimentTone::from_label(&f.sentiment),
        })
        .collect()
}

pub fn aspect_table(ui: &mut egui::Ui, rows: &[TableRow], columns: TableColumns) {
    use egui_extras::{Column, TableBuilder};

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(380.0).at_least(160.0).clip(true))
        .column(Column::initial(170.0).at_least(80.0).clip(true));

    if columns.sentiment_words {
        table = table
            .column(Column::initial(110.0).at_least(80.0))
            .column(Column::remainder().at_least(120.0).clip(true));
    } else {
        table = table.column(Column::remainder().at_least(80.0));
    }

    table
        .header(theme::TABLE_HEADER_HEIGHT, |mut header| {
            for title in columns.headers() {
                header.col(|ui| {
                    ui.label(
                        egui::RichText::new(title)
                            .size(theme::FONT_LABEL)
                            .strong()
                            .color(theme::TEXT_MUTED),
                    );
                });
            }
        })
        .body(|body| {
            body.rows(theme::TABLE_ROW_HEIGHT, rows.len(), |mut row| {
                let data = &rows[row.index()];
                row.col(|ui| text_cell(ui, &data.sentence, theme::TEXT_PRIMARY));
                row.col(|ui| text_cell(ui, &data.aspects, theme::TEXT_SECONDARY));
                row.col(|ui| text_cell(ui, &data.sentiment, theme::tone_color(data.tone)));
                if let Some(words) = &data.sentiment_words {
                    row.col(|ui| text_cell(ui, words, theme::TEXT_SECONDARY));
                }
            });
        });
}

/// Single-line cell; the full text is on hover when it gets cut off
fn text_cell(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    let resp = ui.add(
        egui::Label::new(egui::RichText::new(text).size(theme::FONT_BODY).color(color)).truncate(),
    );
    if !text.is_empty() {
        resp.on_hover_text(text);
    }
}

// ============================================================================
// GAUGE
// ============================================================================

/// Path color: the accent blue with opacity proportional to the percentage
pub fn gauge_color(percentage: f64) -> egui::Color32 {
    let (r, g, b) = theme::GAUGE_PATH_RGB;
    let alpha = (percentage / 100.0).clamp(0.0, 1.0) * 255.0;
    egui::Color32::from_rgba_unmultiplied(r, g, b, alpha.round() as u8)
}

/// Circular progress indicator for the positive percentage
pub fn gauge(ui: &mut egui::Ui, percentage: f64) -> egui::Response {
    let size = theme::GAUGE_SIZE;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let center = rect.center();
        let radius = size / 2.0 - theme::GAUGE_STROKE;

        painter.circle_stroke(
            center,
            radius,
            egui::Stroke::new(theme::GAUGE_STROKE, theme::GAUGE_TRAIL),
        );

        let fraction = (percentage / 100.0).clamp(0.0, 1.0) as f32;
        if fraction > 0.0 {
            // Clockwise from 12 o'clock
            let segments = ((fraction * 96.0).ceil() as usize).max(2);
            let start = -std::f32::consts::FRAC_PI_2;
            let sweep = fraction * std::f32::consts::TAU;
            let points: Vec<egui::Pos2> = (0..=segments)
                .map(|i| {
                    let angle = start + sweep * i as f32 / segments as f32;
                    center + radius * egui::vec2(angle.cos(), angle.sin())
                })
                .collect();
            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(theme::GAUGE_STROKE, gauge_color(percentage)),
            ));
        }

        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            format!("{}%", format_percentage(percentage)),
            egui::FontId::proportional(theme::FONT_TITLE),
            theme::GAUGE_TEXT,
        );
    }

    response
}

// ============================================================================
// STAR RATING
// ============================================================================

/// Five clickable stars; every star up to the selection is lit.
/// Returns the star that was clicked this frame.
pub fn star_rating(ui: &mut egui::Ui, selected: Option<FeedbackRating>) -> Option<FeedbackRating> {
    let lit = selected.map(FeedbackRating::stars).unwrap_or(0);
    let mut clicked = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
        for star in 1..=MAX_RATING {
            let size = egui::vec2(theme::STAR_SIZE, theme::STAR_SIZE);
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
            let color = if star <= lit {
                theme::STAR_FILLED
            } else if response.hovered() {
                theme::TEXT_MUTED
            } else {
                theme::STAR_EMPTY
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "★",
                egui::FontId::proportional(theme::STAR_SIZE * 0.8),
                color,
            );
            let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
            if response.clicked() {
                clicked = FeedbackRating::new(star);
            }
        }
    });

    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentPercentages;

    fn finding(sentence: &str, aspects: &[&str], sentiment: &str, words: &[&str]) -> Finding {
        Finding {
            sentence: sentence.into(),
            aspects: aspects.iter().map(|s| s.to_string()).collect(),
            sentiment: sentiment.into(),
            sentiment_words: words.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn findings() -> Vec<Finding> {
        vec![
            finding("The battery life is amazing", &["battery", "life"], "POSITIVE", &["amazing"]),
            finding("the screen scratches easily", &["screen"], "NEGATIVE", &[]),
            finding("Shipping was fine", &[], "POSITIVE", &["fine"]),
        ]
    }

    #[test]
    fn one_row_per_finding_in_order() {
        let rows = table_rows(&findings(), TableColumns { sentiment_words: false });

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cells(), vec!["The battery life is amazing", "battery, life", "POSITIVE"]);
        assert_eq!(rows[1].cells(), vec!["the screen scratches easily", "screen", "NEGATIVE"]);
        assert_eq!(rows[2].cells(), vec!["Shipping was fine", "", "POSITIVE"]);
        assert_eq!(rows[1].tone, SentimentTone::Negative);
    }

    #[test]
    fn sentiment_words_column_is_optional() {
        let basic = TableColumns { sentiment_words: false };
        let detailed = TableColumns { sentiment_words: true };
        assert_eq!(basic.headers(), vec!["Sentence", "Aspects", "Sentiment"]);
        assert_eq!(detailed.headers().last(), Some(&"Key Sentiment Words"));

        let rows = table_rows(&findings(), detailed);
        assert_eq!(rows[0].sentiment_words.as_deref(), Some("amazing"));
        assert_eq!(rows[1].sentiment_words.as_deref(), Some(""));
        assert!(rows.iter().all(|r| r.cells().len() == detailed.headers().len()));
    }

    #[test]
    fn empty_analysis_has_no_rows() {
        assert!(table_rows(&[], TableColumns { sentiment_words: true }).is_empty());
    }

    #[test]
    fn summary_shows_values_verbatim() {
        let result = AnalysisResult {
            review: None,
            overall_sentiment: "NEGATIVE".into(),
            sentiment_percentages: SentimentPercentages {
                positive_percentage: 33.33,
                negative_percentage: 66.67,
            },
            analysis: vec![],
        };
        assert_eq!(
            SummaryFields::from_result(&result),
            SummaryFields {
                overall: "NEGATIVE".into(),
                positive: "33.33".into(),
                negative: "66.67".into(),
            }
        );
        assert_eq!(format_percentage(50.0), "50");
        assert_eq!(format_percentage(0.0), "0");
    }

    #[test]
    fn gauge_opacity_tracks_percentage() {
        assert_eq!(gauge_color(100.0).a(), 255);
        assert_eq!(gauge_color(0.0).a(), 0);
        assert_eq!(gauge_color(50.0).a(), 128);
        // Out-of-range values still draw
        assert_eq!(gauge_color(140.0).a(), 255);
        assert_eq!(gauge_color(-5.0).a(), 0);
    }
}
