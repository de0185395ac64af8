/*
Automated Parameters
====================

An `AudioParam` is a scalar (a gain, a cutoff, a delay time) plus a schedule
of automation events evaluated against the engine's sample clock.

Vocabulary
----------

  anchor      The (time, value) pair the current segment starts from. Every
              step or completed ramp moves the anchor forward.

  ramp        A linear segment from the anchor to a target (time, value).
              Used for envelope attack/decay/release shapes.

  target      An exponential approach toward a value with a time constant.
              Used by live controls (~10ms) so a dragged knob never steps.

Ordering guarantee: issuing `cancel_scheduled(t)` drops every event at or
after `t`, so a release scheduled while an attack is still ramping replaces
the attack cleanly. Pinning the current value first (`set_value_at(t,
value())`) makes the replacement continuous - no jump, no click.

Evaluation is strictly forward in time: `tick(dt)` advances the clock one
sample and returns the new value. Events are kept sorted; at most a handful
are ever pending (attack + decay, or a single target), so the per-sample
cost is a comparison and occasionally a removal.
*/

/// Ramp durations are floored at 5ms. Shorter ramps produce audible clicks.
pub const MIN_RAMP_TIME: f64 = 0.005;

#[derive(Debug, Clone, Copy)]
enum AutomationEvent {
    /// Step to `value` at `time`.
    SetValue { time: f64, value: f32 },
    /// Linear ramp from the previous anchor, reaching `value` at `time`.
    RampTo { time: f64, value: f32 },
    /// From `time` on, approach `value` exponentially.
    SetTarget {
        time: f64,
        value: f32,
        time_constant: f64,
    },
}

impl AutomationEvent {
    fn time(&self) -> f64 {
        match *self {
            AutomationEvent::SetValue { time, .. }
            | AutomationEvent::RampTo { time, .. }
            | AutomationEvent::SetTarget { time, .. } => time,
        }
    }
}

/// A scalar parameter with a sample-clock automation timeline.
pub struct AudioParam {
    value: f32,
    now: f64,
    anchor_time: f64,
    anchor_value: f32,
    events: Vec<AutomationEvent>,
    target: Option<(f32, f64)>,
}

impl AudioParam {
    pub fn new(value: f32) -> Self {
        Self::at(value, 0.0)
    }

    /// Create a parameter whose clock starts at `now`. Voices allocated
    /// mid-performance use this so their schedules share the engine clock.
    pub fn at(value: f32, now: f64) -> Self {
        Self {
            value,
            now,
            anchor_time: now,
            anchor_value: value,
            events: Vec::with_capacity(4),
            target: None,
        }
    }

    /// Current value of the parameter.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current position of the parameter's clock, in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Drop every scheduled event at or after `from`.
    pub fn cancel_scheduled(&mut self, from: f64) {
        self.events.retain(|e| e.time() < from);
    }

    /// Step to `value` at `time`.
    pub fn set_value_at(&mut self, time: f64, value: f32) {
        self.insert(AutomationEvent::SetValue { time, value });
    }

    /// Ramp linearly to `value`, arriving at `time`.
    pub fn ramp_to(&mut self, time: f64, value: f32) {
        self.insert(AutomationEvent::RampTo { time, value });
    }

    /// From `time` on, approach `value` exponentially with `time_constant`
    /// seconds. The standard smoothing for live controls.
    pub fn set_target(&mut self, time: f64, value: f32, time_constant: f64) {
        self.insert(AutomationEvent::SetTarget {
            time,
            value,
            time_constant,
        });
    }

    /// Jump immediately, discarding any pending automation. For discrete
    /// values that must not glide.
    pub fn set(&mut self, value: f32) {
        self.cancel_scheduled(self.now);
        self.value = value;
        self.anchor_time = self.now;
        self.anchor_value = value;
        self.target = None;
    }

    fn insert(&mut self, event: AutomationEvent) {
        let idx = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(idx, event);
    }

    /// Advance the clock by `dt` seconds (one sample) and return the value.
    pub fn tick(&mut self, dt: f64) -> f32 {
        self.now += dt;

        // Activate every event whose time has arrived.
        while let Some(&event) = self.events.first() {
            if event.time() > self.now {
                break;
            }
            match event {
                AutomationEvent::SetValue { time, value }
                | AutomationEvent::RampTo { time, value } => {
                    self.value = value;
                    self.anchor_time = time;
                    self.anchor_value = value;
                    self.target = None;
                }
                AutomationEvent::SetTarget {
                    time,
                    value,
                    time_constant,
                } => {
                    self.anchor_time = time;
                    self.anchor_value = self.value;
                    self.target = Some((value, time_constant));
                }
            }
            self.events.remove(0);
        }

        // Evaluate the current segment.
        if let Some(&AutomationEvent::RampTo { time, value }) = self.events.first() {
            let span = time - self.anchor_time;
            if span > 0.0 {
                let t = ((self.now - self.anchor_time) / span).clamp(0.0, 1.0) as f32;
                self.value = self.anchor_value + (value - self.anchor_value) * t;
            }
        } else if let Some((goal, tau)) = self.target {
            let alpha = (1.0 - (-dt / tau.max(1e-6)).exp()) as f32;
            self.value += (goal - self.value) * alpha;
        }

        self.value
    }

    /// Advance by one block, writing the value of every sample into `out`.
    pub fn render(&mut self, out: &mut [f32], dt: f64) {
        for sample in out.iter_mut() {
            *sample = self.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 1_000.0; // 1kHz test clock keeps the math readable

    fn run(param: &mut AudioParam, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| param.tick(DT)).collect()
    }

    #[test]
    fn ramp_is_linear_and_lands_on_target() {
        let mut p = AudioParam::new(0.0);
        p.set_value_at(0.0, 0.0);
        p.ramp_to(0.1, 1.0);

        let values = run(&mut p, 100);
        assert!((values[49] - 0.5).abs() < 0.02, "midpoint should be ~0.5");
        assert!((values[99] - 1.0).abs() < 1e-6, "ramp should land on 1.0");

        // Values never decrease on an upward ramp.
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-6);
        }
    }

    #[test]
    fn cancel_removes_pending_events_only() {
        let mut p = AudioParam::new(0.0);
        p.set_value_at(0.0, 0.0);
        p.ramp_to(0.05, 1.0);
        p.ramp_to(0.2, 0.3);

        run(&mut p, 60); // past the first ramp
        p.cancel_scheduled(p.now());
        let settled = p.value();
        let later = run(&mut p, 50);
        assert!(later.iter().all(|&v| (v - settled).abs() < 1e-6));
    }

    #[test]
    fn replacing_a_ramp_midway_is_continuous() {
        let mut p = AudioParam::new(0.0);
        p.set_value_at(0.0, 0.0);
        p.ramp_to(0.1, 1.0);

        run(&mut p, 50); // mid-ramp, value ~0.5
        let pinned = p.value();
        p.cancel_scheduled(p.now());
        p.set_value_at(p.now(), pinned);
        p.ramp_to(p.now() + 0.05, 0.0);

        let values = run(&mut p, 50);
        assert!(
            (values[0] - pinned).abs() < 0.05,
            "no jump at the splice point: {} vs {}",
            values[0],
            pinned
        );
        assert!(values.last().unwrap().abs() < 1e-3);
    }

    #[test]
    fn target_converges_exponentially() {
        let mut p = AudioParam::new(0.0);
        p.set_target(0.0, 1.0, 0.01);

        run(&mut p, 10); // one time constant
        assert!((p.value() - 0.63).abs() < 0.05);
        run(&mut p, 90);
        assert!(p.value() > 0.99);
    }

    #[test]
    fn set_discards_schedule() {
        let mut p = AudioParam::new(0.5);
        p.ramp_to(1.0, 0.0);
        p.set(0.25);
        let values = run(&mut p, 20);
        assert!(values.iter().all(|&v| (v - 0.25).abs() < 1e-6));
    }
}
