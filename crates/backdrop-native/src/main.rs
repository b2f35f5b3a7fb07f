mod audio;
mod render;

use anyhow::Context;
use instant::Instant;
use nebula_backdrop::{AnimationController, BackdropConfig, TelemetryEvent, TelemetryRouter};
use render::GpuState;
use std::sync::mpsc;
use winit::keyboard::{Key, NamedKey};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

// Queue depth between the audio callback and the render loop
const TELEMETRY_QUEUE: usize = 64;
// Keyboard nudge for normalized controls
const KEY_STEP: f32 = 0.05;

fn load_config() -> anyhow::Result<BackdropConfig> {
    match std::env::var("BACKDROP_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = BackdropConfig::from_json(&json)
                .with_context(|| format!("parsing config {path}"))?;
            log::info!("[config] loaded {path}");
            Ok(config)
        }
        Err(_) => Ok(BackdropConfig::default()),
    }
}

fn nudge(value: f32, delta: f32) -> f32 {
    (value + delta).clamp(0.0, 1.0)
}

// Wraps back to 0 so a single key sweeps the full range
fn cycle(value: f32) -> f32 {
    if value + KEY_STEP > 1.0 + f32::EPSILON {
        0.0
    } else {
        value + KEY_STEP
    }
}

/// Keyboard stand-ins for the plugin's knobs. Bypass is not telemetry and is
/// applied to the scene directly.
fn key_event(key: &Key, scene: &mut AnimationController) -> Option<TelemetryEvent> {
    let visual = scene.visual();
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(TelemetryEvent::RoomSize(nudge(visual.size(), KEY_STEP))),
        Key::Named(NamedKey::ArrowDown) => {
            Some(TelemetryEvent::RoomSize(nudge(visual.size(), -KEY_STEP)))
        }
        Key::Character(c) => match c.as_str() {
            "m" => Some(TelemetryEvent::Mix(cycle(visual.mix()))),
            "w" => Some(TelemetryEvent::Width(cycle(visual.width()))),
            "d" => Some(TelemetryEvent::Damp(cycle(visual.damp()))),
            "f" => Some(TelemetryEvent::Freeze(!visual.is_frozen())),
            "b" => {
                let bypassed = !scene.is_bypassed();
                scene.set_bypass(bypassed);
                None
            }
            _ => None,
        },
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = load_config()?;
    let mut scene = AnimationController::new(&config);
    let mut router = TelemetryRouter::new(&config.timing);

    let (tx, rx) = mpsc::sync_channel(TELEMETRY_QUEUE);
    let _audio_stream = audio::start_capture(tx);

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title("Nebula backdrop (native)")
        .build(&event_loop)
        .context("window")?;

    let mut state = pollster::block_on(GpuState::new(&window)).context("gpu")?;
    let mut last = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(ev) = key_event(&logical_key, &mut scene) {
                let gate = router.dispatch(ev, Instant::now(), &mut scene);
                log::debug!("[input] {logical_key:?} -> {gate:?}");
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = now.saturating_duration_since(last).as_secs_f32();
            last = now;

            for ev in rx.try_iter() {
                router.dispatch(ev, now, &mut scene);
            }
            router.poll(now, &mut scene);

            match scene.tick(dt, &mut state) {
                Ok(_) => state.window.request_redraw(),
                Err(e) => match e.downcast_ref::<wgpu::SurfaceError>() {
                    Some(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Some(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    _ => log::trace!("[render] {e}"),
                },
            }
        }
        _ => {}
    })?;
    Ok(())
}
