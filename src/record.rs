//! Loop capture.
//!
//! The recorder drains the engine's capture stream into a take, and a
//! finished take becomes a `LoopRecording`: the raw samples for instant
//! playback plus a 16-bit mono WAV for export.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::engine::RecordingStream;

/// A finished take. Duration comes from the sample count, not wall time,
/// so it stays honest even when the UI polled late.
pub struct LoopRecording {
    pub id: u64,
    pub name: String,
    pub samples: Arc<[f32]>,
    pub sample_rate: f32,
    pub duration_secs: f32,
    pub created_at: SystemTime,
    pub wav: Vec<u8>,
}

impl LoopRecording {
    pub fn new(id: u64, name: String, samples: Vec<f32>, sample_rate: f32) -> hound::Result<Self> {
        let wav = encode_wav(&samples, sample_rate as u32)?;
        let duration_secs = samples.len() as f32 / sample_rate;
        Ok(Self {
            id,
            name,
            samples: samples.into(),
            sample_rate,
            duration_secs,
            created_at: SystemTime::now(),
            wav,
        })
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.wav)
    }
}

/// Encode mono samples as a 16-bit PCM WAV, entirely in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> hound::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec)?;
    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(bytes)
}

struct Session {
    stream: RecordingStream,
    samples: Vec<f32>,
}

/// Pulls the capture stream while armed. Call `poll` regularly (the UI loop
/// does it every pass); the ring holds a couple of seconds, so even a
/// sluggish caller loses nothing.
#[derive(Default)]
pub struct LoopRecorder {
    session: Option<Session>,
}

impl LoopRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Arm the recorder. Samples rendered before this moment are still
    /// sitting in the ring; they belong to nobody and are discarded.
    pub fn start(&mut self, stream: RecordingStream) {
        let mut stale = Vec::new();
        stream.drain(&mut stale);
        self.session = Some(Session {
            stream,
            samples: Vec::new(),
        });
    }

    /// Move whatever the engine has rendered since the last poll into the
    /// take. No-op when not recording.
    pub fn poll(&mut self) {
        if let Some(session) = &mut self.session {
            session.stream.drain(&mut session.samples);
        }
    }

    /// Length of the take so far, in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.session
            .as_ref()
            .map(|s| s.samples.len() as f32 / s.stream.sample_rate())
            .unwrap_or(0.0)
    }

    /// Disarm and hand back the captured samples with their sample rate.
    /// `None` when nothing was being recorded.
    pub fn stop(&mut self) -> Option<(Vec<f32>, f32)> {
        let mut session = self.session.take()?;
        session.stream.drain(&mut session.samples);
        let rate = session.stream.sample_rate();
        Some((session.samples, rate))
    }
}
