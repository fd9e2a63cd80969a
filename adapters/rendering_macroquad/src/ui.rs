//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use garden_defence_rendering::OutcomePresentation;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Layout and data for the end-of-game overlay.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OutcomeUiContext {
    /// Top-left corner of the overlay in screen coordinates.
    pub origin: Vec2,
    /// Overlay dimensions in screen space.
    pub size: Vec2,
    /// Window colour, green for a victory and red for a loss.
    pub background: Color,
    /// Result being announced.
    pub outcome: OutcomePresentation,
}

/// Draws the outcome overlay and reports whether "Play again" was pressed.
pub(crate) fn draw_outcome_ui(ui: &mut Ui, context: OutcomeUiContext) -> bool {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    skin.window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();

    skin.label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();

    skin.button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();

    ui.push_skin(&skin);

    let mut pressed = false;
    let _ = ui.window(hash!("outcome"), context.origin, context.size, |ui| {
        let outcome = context.outcome;
        ui.label(None, outcome.headline());
        ui.label(None, &format!("Score: {}", outcome.score));
        ui.label(None, &format!("Waves cleared: {}", outcome.waves_completed));
        ui.label(None, "Press R or the button below to play again.");
        pressed = ui.button(None, "Play again");
    });

    ui.pop_skin();
    pressed
}
