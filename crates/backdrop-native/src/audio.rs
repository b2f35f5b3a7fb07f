// ---------------- Native audio capture (cpal) ----------------
//
// Stands in for the plugin backend: the default input device is metered and
// its peak level and a coarse envelope are sent to the render thread as
// telemetry events.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use nebula_backdrop::TelemetryEvent;
use std::sync::mpsc::{SyncSender, TrySendError};

// Envelope bins per levels event
const LEVEL_BINS: usize = 512;
// Floor reported for digital silence
const SILENCE_DB: f32 = -100.0;

struct Meter {
    tx: SyncSender<TelemetryEvent>,
    channels: usize,
    bins: Vec<f32>,
    cursor: usize,
    peak: f32,
}

impl Meter {
    fn new(tx: SyncSender<TelemetryEvent>, channels: usize) -> Self {
        Self {
            tx,
            channels: channels.max(1),
            bins: vec![0.0; LEVEL_BINS],
            cursor: 0,
            peak: 0.0,
        }
    }

    fn process<T: Copy>(&mut self, data: &[T], to_f32: impl Fn(T) -> f32) {
        for frame in data.chunks(self.channels) {
            let left = frame.first().map(|s| to_f32(*s).abs()).unwrap_or(0.0);
            self.peak = self.peak.max(left);
            self.bins[self.cursor] = self.bins[self.cursor].max(left);
            self.cursor += 1;
            if self.cursor == LEVEL_BINS {
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        let db = if self.peak > 0.0 {
            (20.0 * self.peak.log10()).max(SILENCE_DB)
        } else {
            SILENCE_DB
        };
        self.send(TelemetryEvent::OutputLevel(db));
        let levels = std::mem::replace(&mut self.bins, vec![0.0; LEVEL_BINS]);
        self.send(TelemetryEvent::Levels(levels));
        self.cursor = 0;
        self.peak = 0.0;
    }

    // Render thread falls behind: drop rather than block the audio callback
    fn send(&self, event: TelemetryEvent) {
        if let Err(TrySendError::Disconnected(_)) = self.tx.try_send(event) {
            log::trace!("[audio] telemetry receiver gone");
        }
    }
}

pub fn start_capture(tx: SyncSender<TelemetryEvent>) -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let Some(device) = host.default_input_device() else {
        log::warn!("[audio] no input device; waiting for keyboard telemetry only");
        return None;
    };
    let config = device.default_input_config().ok()?;
    let channels = config.channels() as usize;
    log::info!(
        "[audio] capturing from {} at {} Hz, {} ch",
        device.name().unwrap_or_else(|_| "<unknown>".into()),
        config.sample_rate().0,
        channels
    );

    let err_fn = |err| log::error!("[audio] stream error: {err}");
    let mut meter = Meter::new(tx, channels);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _| meter.process(data, |s| s),
                err_fn,
                None,
            )
            .ok()?,
        cpal::SampleFormat::I16 => device
            .build_input_stream(
                &config.into(),
                move |data: &[i16], _| meter.process(data, |s| s as f32 / i16::MAX as f32),
                err_fn,
                None,
            )
            .ok()?,
        other => {
            log::warn!("[audio] unsupported sample format {other:?}");
            return None;
        }
    };

    stream.play().ok()?;
    Some(stream)
}
