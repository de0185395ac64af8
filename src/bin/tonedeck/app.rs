//! Application wiring: audio stream, terminal, event loop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};

use tonedeck::catalog::notes::NoteKey;
use tonedeck::catalog::{drum_presets::drum_presets, melody_presets::melody_presets};
use tonedeck::scope::Scope;
use tonedeck::station::Workstation;
use tonedeck::MAX_BLOCK_SIZE;

use super::input;
use super::ui;

/// Without key-release reporting a note is held this long past its last
/// press or repeat event.
const AUTO_RELEASE: Duration = Duration::from_millis(250);

pub struct App {
    station: Arc<Mutex<Workstation>>,
    scope: Scope,
    held: HashMap<NoteKey, Instant>,
    drum_preset_idx: Option<usize>,
    release_events: bool,
    should_quit: bool,
    // Keeps the output stream alive for the lifetime of the app.
    _stream: cpal::Stream,
}

impl App {
    pub fn new() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut workstation = Workstation::new();
        workstation.init_engine(sample_rate);

        let mut scope = Scope::new(sample_rate);
        if let Some(tap) = workstation.take_analysis_tap() {
            scope.attach(tap);
        }

        let station = Arc::new(Mutex::new(workstation));
        let callback_station = station.clone();
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let mut station = match callback_station.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                let total_frames = data.len() / channels;
                let mut written = 0;

                while written < total_frames {
                    let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    station.render(block);

                    // Mono engine output duplicated to every channel.
                    let base = written * channels;
                    for (i, &sample) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[base + i * channels + ch] = sample;
                        }
                    }
                    written += frames;
                }
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            station,
            scope,
            held: HashMap::new(),
            drum_preset_idx: None,
            release_events: false,
            should_quit: false,
            _stream: stream,
        })
    }

    pub fn run(&mut self) -> EyreResult<()> {
        let mut terminal = ratatui::init();

        // Terminals speaking the kitty protocol report key releases; on the
        // rest we fall back to auto-release timers.
        self.release_events = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            crossterm::execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let result = self.event_loop(&mut terminal);

        if self.release_events {
            let _ = crossterm::execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.scope.update();
            self.expire_held_notes();
            {
                let mut station = self.lock_station();
                station.poll_recording();
            }

            let snapshot = ui::Snapshot::capture(&self.lock_station(), &self.scope);
            terminal.draw(|frame| ui::render(frame, &snapshot, &self.scope))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key(key.code),
                        KeyEventKind::Release => self.handle_release(key.code),
                    }
                }
            }
        }
        Ok(())
    }

    fn lock_station(&self) -> std::sync::MutexGuard<'_, Workstation> {
        match self.station.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if let Some((pitch, offset)) = input::note_for(code) {
            let octave = self.lock_station().octave() + offset;
            let key = (pitch, octave);
            let fresh = !self.held.contains_key(&key);
            self.held.insert(key, Instant::now());
            if fresh {
                self.lock_station().note_on(pitch, octave);
            }
            return;
        }

        if let Some(pad) = input::pad_for(code) {
            let mut station = self.lock_station();
            let kit = tonedeck::catalog::kits::kit(station.kit());
            if let Some(instrument) = kit.instruments.get(pad) {
                station.play_drum_hit(instrument.id);
            }
            return;
        }

        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.lock_station().toggle_drums(),
            KeyCode::Char('p') => self.lock_station().toggle_melody(),
            KeyCode::Char('k') => self.lock_station().cycle_kit(),
            KeyCode::Char('o') => self.lock_station().cycle_waveform(),
            KeyCode::Up => self.lock_station().shift_octave(1),
            KeyCode::Down => self.lock_station().shift_octave(-1),
            KeyCode::Tab => self.scope.cycle_mode(),
            KeyCode::Left => self.adjust_bpm(-5.0),
            KeyCode::Right => self.adjust_bpm(5.0),
            KeyCode::Char('[') => self.next_drum_preset(),
            KeyCode::Char(']') => self.next_melody_preset(),
            KeyCode::Char('l') => self.toggle_recording(),
            KeyCode::Char(';') => self.toggle_loop_playback(),
            _ => {}
        }
    }

    fn handle_release(&mut self, code: KeyCode) {
        let Some((pitch, _)) = input::note_for(code) else {
            return;
        };
        // Release whichever octave this pitch is held at; the octave may
        // have shifted since the press.
        let released: Vec<NoteKey> = self
            .held
            .keys()
            .filter(|(p, _)| *p == pitch)
            .copied()
            .collect();
        for key in released {
            self.held.remove(&key);
            self.lock_station().note_off(key.0, key.1);
        }
    }

    fn expire_held_notes(&mut self) {
        if self.release_events {
            return;
        }
        let now = Instant::now();
        let expired: Vec<NoteKey> = self
            .held
            .iter()
            .filter(|(_, pressed)| now.duration_since(**pressed) > AUTO_RELEASE)
            .map(|(key, _)| *key)
            .collect();
        for key in expired {
            self.held.remove(&key);
            self.lock_station().note_off(key.0, key.1);
        }
    }

    fn adjust_bpm(&mut self, delta: f32) {
        let mut station = self.lock_station();
        let bpm = station.bpm() + delta;
        station.set_bpm(bpm);
    }

    fn next_drum_preset(&mut self) {
        let presets = drum_presets();
        let idx = self
            .drum_preset_idx
            .map(|i| (i + 1) % presets.len())
            .unwrap_or(0);
        self.drum_preset_idx = Some(idx);
        self.lock_station().load_drum_preset_def(&presets[idx]);
    }

    fn next_melody_preset(&mut self) {
        let mut station = self.lock_station();
        let presets = melody_presets();
        let current = station.melody_preset().id;
        let idx = presets
            .iter()
            .position(|p| p.id == current)
            .map(|i| (i + 1) % presets.len())
            .unwrap_or(0);
        station.select_melody(presets[idx].id);
    }

    fn toggle_recording(&mut self) {
        let mut station = self.lock_station();
        if station.is_recording() {
            if let Err(err) = station.stop_loop_recording() {
                drop(station);
                ratatui::restore();
                eprintln!("failed to encode loop: {err}");
                self.should_quit = true;
            }
        } else {
            station.start_loop_recording();
        }
    }

    fn toggle_loop_playback(&mut self) {
        let mut station = self.lock_station();
        if station.playing_loop().is_some() {
            station.stop_loop_playback();
        } else if let Some(last) = station.loops().last() {
            let id = last.id;
            station.play_loop(id);
        }
    }
}
