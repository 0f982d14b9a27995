use std::collections::HashMap;
use std::sync::Arc;

use ftcsim_kinematics::{FieldCalibration, Unit};
use ftcsim_simulation::color::{WHEEL_GRADIENT, diagonal_corners};
use ftcsim_simulation::wheel::RollerLine;
use ftcsim_simulation::{
    MecanumSimulation, RenderFrame, ScreenTransform, Simulation, SimulationRegistry, Wheel,
};
use macroquad::models::{Mesh, Vertex, draw_mesh};
use macroquad::prelude::*;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::driver::{DriveAxes, KeyboardDriver};

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "FTCSim".to_string(),
        window_width: 1120,
        window_height: 820,
        high_dpi: true,
        window_resizable: false,
        ..Default::default()
    }
}

const FIELD_ORIGIN: (f32, f32) = (10.0, 10.0);
const FIELD_TILES: usize = 6;
const HUD_X: f32 = 830.0;
const MARKER_RADIUS: f32 = 3.0;

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::from_rgba(r, g, b, 255)
}

fn to_screen((x, y): (f64, f64)) -> Vec2 {
    vec2(FIELD_ORIGIN.0 + x as f32, FIELD_ORIGIN.1 + y as f32)
}

fn draw_quad(
    t: &ScreenTransform,
    origin: (f64, f64),
    size: (f64, f64),
    gradient: ([u8; 3], [u8; 3]),
    outline: Color,
) {
    let corners = [
        origin,
        (origin.0 + size.0, origin.1),
        (origin.0 + size.0, origin.1 + size.1),
        (origin.0, origin.1 + size.1),
    ]
    .map(|p| to_screen(t.apply(p)));
    let colors = diagonal_corners(gradient);
    let vertices = corners
        .iter()
        .zip(colors)
        .map(|(p, c)| Vertex::new(p.x, p.y, 0.0, 0.0, 0.0, rgb(c)))
        .collect();
    draw_mesh(&Mesh {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
        texture: None,
    });
    for i in 0..4 {
        let (a, b) = (corners[i], corners[(i + 1) % 4]);
        draw_line(a.x, a.y, b.x, b.y, 1.0, outline);
    }
}

fn draw_field(length: f32) {
    draw_rectangle(FIELD_ORIGIN.0, FIELD_ORIGIN.1, length, length, LIGHTGRAY);
    let tile = length / FIELD_TILES as f32;
    for i in 0..=FIELD_TILES {
        let offset = i as f32 * tile;
        draw_line(
            FIELD_ORIGIN.0 + offset,
            FIELD_ORIGIN.1,
            FIELD_ORIGIN.0 + offset,
            FIELD_ORIGIN.1 + length,
            1.0,
            GRAY,
        );
        draw_line(
            FIELD_ORIGIN.0,
            FIELD_ORIGIN.1 + offset,
            FIELD_ORIGIN.0 + length,
            FIELD_ORIGIN.1 + offset,
            1.0,
            GRAY,
        );
    }
}

fn draw_robot(sim: &MecanumSimulation, frame: &RenderFrame, selected: bool) {
    let footprint = sim.footprint();
    let t = &frame.transform;
    let gradient = sim.color().gradient();
    let outline = if selected { YELLOW } else { BLACK };

    draw_quad(t, footprint.body_origin, footprint.body_size, gradient, outline);
    let marker = to_screen(t.apply(footprint.marker));
    draw_circle(marker.x, marker.y, MARKER_RADIUS, rgb(gradient.1));

    for (i, placement) in footprint.wheels.iter().enumerate() {
        draw_quad(t, placement.origin, footprint.wheel_size, WHEEL_GRADIENT, BLACK);
        let wheel = &sim.state().wheels[i];
        let (ox, oy) = placement.origin;
        for line in wheel.roller_lines(frame.wheel_rolls[i]) {
            let Some(RollerLine { start, end }) = line.clipped(wheel.width()) else {
                continue;
            };
            let a = to_screen(t.apply((ox + start.0, oy + start.1)));
            let b = to_screen(t.apply((ox + end.0, oy + end.1)));
            draw_line(a.x, a.y, b.x, b.y, 1.0, BLACK);
        }
    }
}

fn draw_hud(
    robots: &[Arc<MecanumSimulation>],
    driver: &KeyboardDriver,
    calibration: &FieldCalibration,
) {
    let mut y = 30.0;
    for (i, sim) in robots.iter().enumerate() {
        let unit = sim.units();
        let pose = sim.pose();
        let x_u = calibration.convert(pose.x, Unit::Pixels, unit);
        let y_u = calibration.convert(pose.y, Unit::Pixels, unit);
        let marker = if i == driver.selected_robot() { ">" } else { " " };
        let status = if sim.is_running() { "running" } else { "idle" };
        draw_text(
            &format!("{} {} [{}]", marker, sim.name(), status),
            HUD_X,
            y,
            22.0,
            BLACK,
        );
        draw_text(
            &format!("x={:.2}{u} y={:.2}{u} th={:.2}", x_u, y_u, pose.theta, u = unit),
            HUD_X,
            y + 20.0,
            18.0,
            DARKGRAY,
        );
        let c = sim.commands().snapshot();
        draw_text(
            &format!("w=[{:.1} {:.1} {:.1} {:.1}]", c[0], c[1], c[2], c[3]),
            HUD_X,
            y + 38.0,
            18.0,
            DARKGRAY,
        );
        y += 64.0;
    }

    let wheel = driver
        .selected_wheel()
        .map_or("-".to_string(), |w| format!("{:?}", w));
    let help = [
        "Space  start/stop all".to_string(),
        "R      reset all".to_string(),
        "Tab    next robot".to_string(),
        "W/S A/D Q/E  drive".to_string(),
        format!("1-4 + Up/Down  wheel ({})", wheel),
    ];
    for line in help {
        y += 20.0;
        draw_text(&line, HUD_X, y, 18.0, BLACK);
    }
}

fn handle_input(
    driver: &mut KeyboardDriver,
    robots: &[Arc<MecanumSimulation>],
    registry: &SimulationRegistry,
) {
    if is_key_pressed(KeyCode::Space) {
        if robots.iter().any(|r| r.is_running()) {
            registry.stop_all();
        } else if let Err(e) = registry.start_all() {
            error!("Failed to start simulations: {}", e);
        }
    }
    if is_key_pressed(KeyCode::R) {
        registry.reset_all();
        driver.release();
    }
    if is_key_pressed(KeyCode::Tab) {
        driver.cycle_robot(robots.len());
    }
    for (key, index) in [
        (KeyCode::Key1, 0),
        (KeyCode::Key2, 1),
        (KeyCode::Key3, 2),
        (KeyCode::Key4, 3),
    ] {
        if is_key_pressed(key) {
            if let Some(wheel) = Wheel::from_index(index) {
                driver.select_wheel(wheel);
            }
        }
    }

    let Some(sim) = robots.get(driver.selected_robot()) else {
        return;
    };
    if is_key_pressed(KeyCode::Up) {
        driver.nudge(1, sim.commands());
    }
    if is_key_pressed(KeyCode::Down) {
        driver.nudge(-1, sim.commands());
    }
    let axes = DriveAxes::from_keys(
        is_key_down(KeyCode::W),
        is_key_down(KeyCode::S),
        is_key_down(KeyCode::A),
        is_key_down(KeyCode::D),
        is_key_down(KeyCode::Q),
        is_key_down(KeyCode::E),
    );
    driver.apply_axes(axes, sim.commands());
}

pub async fn run_visualization_loop(
    mut frame_rx: broadcast::Receiver<Arc<RenderFrame>>,
    robots: Vec<Arc<MecanumSimulation>>,
    registry: Arc<SimulationRegistry>,
    calibration: FieldCalibration,
) {
    let mut latest: HashMap<Arc<str>, Arc<RenderFrame>> = HashMap::new();
    let mut driver = KeyboardDriver::new();

    info!("Visualization loop starting inside graphics module...");

    loop {
        loop {
            match frame_rx.try_recv() {
                Ok(frame) => {
                    latest.insert(Arc::clone(&frame.robot), frame);
                }
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Visualization frame receiver lagged.");
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    error!("Frame channel closed. Exiting visualization loop.");
                    return;
                }
            }
        }

        handle_input(&mut driver, &robots, &registry);

        clear_background(WHITE);
        draw_field(calibration.field_length_px() as f32);
        for (i, sim) in robots.iter().enumerate() {
            if let Some(frame) = latest.get(sim.name()) {
                draw_robot(sim, frame, i == driver.selected_robot());
            }
        }
        draw_hud(&robots, &driver, &calibration);

        next_frame().await
    }
}
