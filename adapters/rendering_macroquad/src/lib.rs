#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Garden Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the dependency is declared without its default `audio`
//! feature.
//!
//! All uses of `macroquad::ui` live inside the local `ui` module.

mod ui;

use self::ui::{draw_outcome_ui, OutcomeUiContext};
use anyhow::Result;
use garden_defence_core::{GameStatus, PlantKind, SUN_PICK_RADIUS};
use garden_defence_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SeedPacket,
};
use glam::Vec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
};
use std::time::Duration;

/// Height of the packet bar above the lawn, in lawn world units.
const PACKET_BAR_HEIGHT: f32 = 90.0;
/// Width of a single seed packet, in lawn world units.
const PACKET_WIDTH: f32 = 120.0;
const PACKET_MARGIN: f32 = 10.0;
const HUD_FONT_SIZE: f32 = 26.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `1` picks the sunflower packet, `2` the peashooter packet.
    packet: Option<PlantKind>,
    /// `R` starts a fresh game.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let packet = if is_key_pressed(KeyCode::Key1) {
            Some(PlantKind::Sunflower)
        } else if is_key_pressed(KeyCode::Key2) {
            Some(PlantKind::Peashooter)
        } else {
            None
        };

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            packet,
            restart: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 640,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut restart_latched = false;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let (cursor_x, cursor_y) = mouse_position();
                let mut frame_input = gather_frame_input(
                    &scene,
                    &metrics_before,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard.packet,
                );
                frame_input.restart = keyboard.restart || std::mem::take(&mut restart_latched);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_packet_bar(&scene, &metrics);
                draw_lawn(&scene, &metrics);
                draw_plants(&scene, &metrics);
                draw_zombies(&scene, &metrics);
                draw_peas(&scene, &metrics);
                draw_suns(&scene, &metrics);

                if let Some(outcome) = scene.outcome {
                    let mut root = macroquad::ui::root_ui();
                    let pressed = draw_outcome_ui(
                        &mut root,
                        OutcomeUiContext {
                            origin: MacroquadVec2::new(
                                screen_width * 0.5 - 160.0,
                                screen_height * 0.5 - 90.0,
                            ),
                            size: MacroquadVec2::new(320.0, 180.0),
                            background: to_macroquad_color(outcome_background(outcome.status)),
                            outcome,
                        },
                    );
                    restart_latched |= pressed;
                }

                if let Some(fps) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        tracing::info!(fps, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, dt: Duration) -> Option<f32> {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(fps)
    }
}

/// Maps lawn world units onto the screen, reserving the packet bar above the lawn.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.lawn.width();
        let world_height = scene.lawn.height() + PACKET_BAR_HEIGHT;
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let offset_x = ((screen_width - world_width * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - world_height * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Converts a lawn world position into screen coordinates.
    fn lawn_to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + (position.y + PACKET_BAR_HEIGHT) * self.scale,
        )
    }

    /// Converts a screen position into lawn world coordinates.
    fn screen_to_lawn(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.x - self.offset_x) / self.scale,
            (position.y - self.offset_y) / self.scale - PACKET_BAR_HEIGHT,
        )
    }

    /// Screen rectangle covered by the packet at `index`, as `(x, y, width, height)`.
    fn packet_rect(&self, index: usize) -> (f32, f32, f32, f32) {
        let x = self.offset_x
            + (PACKET_MARGIN + index as f32 * (PACKET_WIDTH + PACKET_MARGIN)) * self.scale;
        let y = self.offset_y + PACKET_MARGIN * self.scale;
        (
            x,
            y,
            PACKET_WIDTH * self.scale,
            (PACKET_BAR_HEIGHT - 2.0 * PACKET_MARGIN) * self.scale,
        )
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor: Vec2,
    click: bool,
    shortcut_packet: Option<PlantKind>,
) -> FrameInput {
    let mut input = FrameInput {
        packet: shortcut_packet,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON {
        return input;
    }

    if click {
        let clicked_packet = scene.packets.iter().enumerate().find_map(|(index, packet)| {
            let (x, y, width, height) = metrics.packet_rect(index);
            let inside = cursor.x >= x
                && cursor.x < x + width
                && cursor.y >= y
                && cursor.y < y + height;
            inside.then_some(packet.kind)
        });
        if clicked_packet.is_some() {
            input.packet = clicked_packet;
            return input;
        }
    }

    let world = metrics.screen_to_lawn(cursor);
    if within_pick_margin(scene, world) {
        input.cursor_world_space = Some(world);
        input.lawn_click = click;
    }

    input
}

/// Suns rest on the bottom edge of the lawn, so clicks slightly outside it still count.
fn within_pick_margin(scene: &Scene, world: Vec2) -> bool {
    world.x >= -SUN_PICK_RADIUS
        && world.x <= scene.lawn.width() + SUN_PICK_RADIUS
        && world.y >= 0.0
        && world.y <= scene.lawn.height() + SUN_PICK_RADIUS
}

fn draw_packet_bar(scene: &Scene, metrics: &SceneMetrics) {
    let bar_origin = Vec2::new(metrics.offset_x, metrics.offset_y);
    macroquad::shapes::draw_rectangle(
        bar_origin.x,
        bar_origin.y,
        scene.lawn.width() * metrics.scale,
        PACKET_BAR_HEIGHT * metrics.scale,
        macroquad::color::Color::from_rgba(0x6d, 0x4c, 0x41, 0xff),
    );

    for (index, packet) in scene.packets.iter().enumerate() {
        draw_packet(*packet, metrics.packet_rect(index), metrics.scale);
    }

    let hud = scene.hud;
    let hud_x = metrics.offset_x
        + (PACKET_MARGIN + scene.packets.len() as f32 * (PACKET_WIDTH + PACKET_MARGIN) + 10.0)
            * metrics.scale;
    let font_size = HUD_FONT_SIZE * metrics.scale;
    let first_line = format!("Sun: {}   Score: {}", hud.sun, hud.score);
    let second_line = format!("Wave: {}   Kills: {}/{}", hud.wave, hud.kills, hud.quota);
    let _ = macroquad::text::draw_text(
        &first_line,
        hud_x,
        bar_origin.y + 36.0 * metrics.scale,
        font_size,
        WHITE,
    );
    let _ = macroquad::text::draw_text(
        &second_line,
        hud_x,
        bar_origin.y + 68.0 * metrics.scale,
        font_size,
        WHITE,
    );
    if let Some(line) = &scene.status_line {
        let _ = macroquad::text::draw_text(
            line,
            hud_x,
            bar_origin.y + 86.0 * metrics.scale,
            16.0 * metrics.scale,
            WHITE,
        );
    }
}

fn draw_packet(packet: SeedPacket, (x, y, width, height): (f32, f32, f32, f32), scale: f32) {
    let base = plant_color(packet.kind);
    let fill = if packet.affordable {
        base
    } else {
        base.lighten(0.6)
    };
    macroquad::shapes::draw_rectangle(x, y, width, height, to_macroquad_color(fill));
    let outline = if packet.selected { WHITE } else { BLACK };
    let thickness = if packet.selected { 4.0 } else { 2.0 };
    macroquad::shapes::draw_rectangle_lines(x, y, width, height, thickness, outline);

    let label = format!("{} ({})", packet.kind.label(), packet.cost.get());
    let _ = macroquad::text::draw_text(
        &label,
        x + 6.0 * scale,
        y + height * 0.6,
        18.0 * scale,
        BLACK,
    );
}

fn draw_lawn(scene: &Scene, metrics: &SceneMetrics) {
    let lawn = scene.lawn;
    let step = lawn.cell_length * metrics.scale;
    for row in 0..lawn.rows {
        for column in 0..lawn.columns {
            let origin = metrics.lawn_to_screen(Vec2::new(
                column as f32 * lawn.cell_length,
                row as f32 * lawn.cell_length,
            ));
            let color = if (row + column) % 2 == 0 {
                lawn.grass
            } else {
                lawn.grass.lighten(0.15)
            };
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                step,
                step,
                to_macroquad_color(color),
            );
        }
    }
}

fn draw_plants(scene: &Scene, metrics: &SceneMetrics) {
    let cell_length = scene.lawn.cell_length;
    for plant in &scene.plants {
        let center = metrics.lawn_to_screen(Vec2::new(
            (plant.cell.column() as f32 + 0.5) * cell_length,
            (plant.cell.row() as f32 + 0.5) * cell_length,
        ));
        let radius = cell_length * 0.35 * metrics.scale;
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius,
            to_macroquad_color(plant_color(plant.kind)),
        );
        macroquad::shapes::draw_circle_lines(center.x, center.y, radius, 2.0, BLACK);
    }
}

fn draw_zombies(scene: &Scene, metrics: &SceneMetrics) {
    let cell = scene.lawn.cell_length * metrics.scale;
    let body = to_macroquad_color(Color::from_rgb_u8(0x78, 0x90, 0x9c));
    for zombie in &scene.zombies {
        let origin = metrics.lawn_to_screen(zombie.position);
        let inset = cell * 0.2;
        macroquad::shapes::draw_rectangle(
            origin.x + inset,
            origin.y + inset * 0.5,
            cell - 2.0 * inset,
            cell - inset,
            body,
        );

        let bar_width = cell - 2.0 * inset;
        macroquad::shapes::draw_rectangle(origin.x + inset, origin.y, bar_width, 4.0, BLACK);
        macroquad::shapes::draw_rectangle(
            origin.x + inset,
            origin.y,
            bar_width * zombie.health_fraction.clamp(0.0, 1.0),
            4.0,
            to_macroquad_color(Color::from_rgb_u8(0xe5, 0x39, 0x35)),
        );
    }
}

fn draw_peas(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(Color::from_rgb_u8(0x2e, 0x7d, 0x32));
    for pea in &scene.peas {
        let center = metrics.lawn_to_screen(pea.position);
        macroquad::shapes::draw_circle(center.x, center.y, 5.0 * metrics.scale, color);
    }
}

fn draw_suns(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(Color::from_rgb_u8(0xff, 0xd5, 0x4f));
    for sun in &scene.suns {
        let center = metrics.lawn_to_screen(sun.position);
        let radius = 16.0 * metrics.scale;
        macroquad::shapes::draw_circle(center.x, center.y, radius, color);
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            2.0,
            to_macroquad_color(Color::from_rgb_u8(0xff, 0x8f, 0x00)),
        );
    }
}

fn plant_color(kind: PlantKind) -> Color {
    match kind {
        PlantKind::Sunflower => Color::from_rgb_u8(0xfd, 0xd8, 0x35),
        PlantKind::Peashooter => Color::from_rgb_u8(0x43, 0xa0, 0x47),
    }
}

fn outcome_background(status: GameStatus) -> Color {
    match status {
        GameStatus::Won => Color::from_rgb_u8(0x2e, 0x7d, 0x32),
        GameStatus::Lost | GameStatus::Playing => Color::from_rgb_u8(0x8e, 0x24, 0x24),
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_defence_core::{CellCoord, SunAmount};
    use garden_defence_rendering::LawnPresentation;

    fn scene() -> Scene {
        let lawn = LawnPresentation::new(9, 5, 80.0, Color::from_rgb_u8(0x4c, 0xaf, 0x50))
            .expect("valid lawn");
        let mut scene = Scene::new(lawn);
        scene.packets = PlantKind::ALL
            .iter()
            .map(|kind| SeedPacket {
                kind: *kind,
                cost: kind.cost(),
                affordable: kind.cost() <= SunAmount::new(150),
                selected: false,
            })
            .collect();
        scene
    }

    #[test]
    fn metrics_round_trip_lawn_positions() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 1_440.0, 980.0);
        let world = Vec2::new(123.0, 45.0);

        let restored = metrics.screen_to_lawn(metrics.lawn_to_screen(world));

        assert!((restored - world).length() < 1e-3);
    }

    #[test]
    fn click_on_packet_selects_it_instead_of_the_lawn() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 720.0, 490.0);
        let (x, y, width, height) = metrics.packet_rect(1);

        let input = gather_frame_input(
            &scene,
            &metrics,
            Vec2::new(x + width * 0.5, y + height * 0.5),
            true,
            None,
        );

        assert_eq!(input.packet, Some(PlantKind::Peashooter));
        assert!(!input.lawn_click);
    }

    #[test]
    fn click_on_lawn_reports_world_position() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 720.0, 490.0);
        let cursor = metrics.lawn_to_screen(Vec2::new(250.0, 130.0));

        let input = gather_frame_input(&scene, &metrics, cursor, true, None);

        assert!(input.lawn_click);
        let world = input.cursor_world_space.expect("cursor on lawn");
        assert_eq!(scene.lawn.cell_at(world), Some(CellCoord::new(3, 1)));
    }

    #[test]
    fn click_below_lawn_edge_reaches_resting_sun() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 720.0, 490.0);
        let cursor = metrics.lawn_to_screen(Vec2::new(20.0, 410.0));

        let input = gather_frame_input(&scene, &metrics, cursor, true, None);

        assert!(input.lawn_click);
        let world = input.cursor_world_space.expect("cursor within pick margin");
        assert!((world - Vec2::new(20.0, 410.0)).length() < 1e-3);
        assert_eq!(scene.lawn.cell_at(world), None);
    }

    #[test]
    fn click_far_below_lawn_is_ignored() {
        let scene = scene();
        let metrics = SceneMetrics::from_scene(&scene, 720.0, 490.0);
        let cursor = metrics.lawn_to_screen(Vec2::new(20.0, 400.0 + SUN_PICK_RADIUS + 5.0));

        let input = gather_frame_input(&scene, &metrics, cursor, true, None);

        assert!(!input.lawn_click);
        assert_eq!(input.cursor_world_space, None);
    }

    #[test]
    fn outcome_overlay_colour_depends_on_result() {
        assert_ne!(
            outcome_background(GameStatus::Won),
            outcome_background(GameStatus::Lost)
        );
    }
}
