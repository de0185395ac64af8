//! Terminal front panel: transport bar, step grid, oscilloscope.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use tonedeck::catalog::kits::kit;
use tonedeck::catalog::STEP_COUNT;
use tonedeck::scope::{Scope, ScopeMode};
use tonedeck::station::Workstation;

/// Everything the draw pass needs, copied out while the station lock is
/// held so rendering itself never touches the audio thread's mutex.
pub struct Snapshot {
    pub bpm: f32,
    pub kit_name: &'static str,
    pub waveform: &'static str,
    pub octave: i32,
    pub drums_running: bool,
    pub melody_running: bool,
    pub melody_name: &'static str,
    pub current_step: Option<usize>,
    pub rows: Vec<(&'static str, [bool; STEP_COUNT])>,
    pub recording: bool,
    pub recording_secs: f32,
    pub loop_count: usize,
    pub loop_playing: bool,
    pub peak: f32,
}

impl Snapshot {
    pub fn capture(station: &Workstation, scope: &Scope) -> Self {
        let kit_def = kit(station.kit());
        let rows = station
            .drums()
            .pattern()
            .rows()
            .map(|(id, cells)| {
                let name = kit_def
                    .instruments
                    .iter()
                    .find(|pad| pad.id == id)
                    .map(|pad| pad.name)
                    .unwrap_or(id);
                (name, *cells)
            })
            .collect();

        let peak = scope
            .waveform()
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));

        Self {
            bpm: station.bpm(),
            kit_name: kit_def.name,
            waveform: station.waveform().label(),
            octave: station.octave(),
            drums_running: station.drums_running(),
            melody_running: station.melody_running(),
            melody_name: station.melody_preset().name,
            current_step: station.current_drum_step(),
            rows,
            recording: station.is_recording(),
            recording_secs: station.recording_duration(),
            loop_count: station.loops().len(),
            loop_playing: station.playing_loop().is_some(),
            peak,
        }
    }
}

pub fn render(frame: &mut Frame, snapshot: &Snapshot, scope: &Scope) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // transport
            Constraint::Length(12), // step grid
            Constraint::Min(8),     // scope
            Constraint::Length(1),  // help
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], snapshot);
    render_grid(frame, chunks[1], snapshot);
    match scope.mode() {
        ScopeMode::Waveform => render_waveform(frame, chunks[2], scope.waveform()),
        ScopeMode::Spectrum => render_spectrum(frame, chunks[2], scope.spectrum()),
    }

    let help = Paragraph::new(
        " [z..m/q..i] play  [F1-F8] pads  [Space] drums  [p] melody  [k] kit  [o] wave  \
         [l] record  [;] loop  [Tab] scope  [Esc] quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn render_transport(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default().title(" tonedeck ").borders(Borders::ALL);

    let running = |on: bool| if on { Color::Green } else { Color::DarkGray };
    let mut spans = vec![
        Span::styled(
            format!(" BPM {:>3.0}  ", snapshot.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{}  ", snapshot.kit_name),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("{} oct{}  ", snapshot.waveform, snapshot.octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("drums {}  ", if snapshot.drums_running { "on" } else { "off" }),
            Style::default().fg(running(snapshot.drums_running)),
        ),
        Span::styled(
            format!(
                "melody {} ({})  ",
                if snapshot.melody_running { "on" } else { "off" },
                snapshot.melody_name
            ),
            Style::default().fg(running(snapshot.melody_running)),
        ),
        Span::styled(
            format!("loops {}{}  ", snapshot.loop_count, if snapshot.loop_playing { " >" } else { "" }),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("peak {:.2}", snapshot.peak),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if snapshot.recording {
        spans.push(Span::styled(
            format!("  REC {:.1}s", snapshot.recording_secs),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_grid(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default().title(" Pattern ").borders(Borders::ALL);

    let mut lines = Vec::with_capacity(snapshot.rows.len());
    for (name, cells) in &snapshot.rows {
        let mut spans = vec![Span::styled(
            format!(" {name:<12}"),
            Style::default().fg(Color::White),
        )];
        for (step, on) in cells.iter().enumerate() {
            let playing = snapshot.current_step == Some(step);
            let symbol = if *on { "[#]" } else { "[.]" };
            let style = match (playing, on) {
                (true, _) => Style::default().fg(Color::Black).bg(Color::Green),
                (false, true) => Style::default().fg(Color::Cyan),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            spans.push(Span::styled(symbol, style));
            if step % 4 == 3 {
                spans.push(Span::raw(" "));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_waveform(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / samples.len() as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_freq = spectrum.iter().map(|(f, _)| *f).fold(1.0, f64::max);
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(-100.0, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_freq])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-100.0, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
