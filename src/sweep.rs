//! Self-test needle sweep: up to max, down to min, back to the live value.

use crate::motion::MotionSimulator;

/// How long the needle is driven toward `max` before heading down.
pub const SWEEP_UP_MS: f64 = 800.0;

/// The down phase ends once the needle is this close to `min`, in radians.
pub const SWEEP_SETTLE_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepState {
    #[default]
    Idle,
    SweepingUp,
    SweepingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEvent {
    Completed,
}

/// Sweep sequencing for one gauge. While not idle it owns the simulator's target.
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    state: SweepState,
    phase_start: Option<f64>,
}

impl Sweep {
    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SweepState::Idle
    }

    /// Begins (or restarts) the sequence by driving the needle to `max_angle`. The up phase is
    /// timed from the next [`Sweep::update`].
    pub fn start(&mut self, sim: &mut MotionSimulator, max_angle: f64) {
        log::info!("gauge sweep started");
        self.state = SweepState::SweepingUp;
        self.phase_start = None;
        sim.set_target(max_angle, false);
    }

    /// Steps the sequence at `now_ms`. `real_angle` is where the needle belongs once done.
    pub fn update(
        &mut self,
        now_ms: f64,
        sim: &mut MotionSimulator,
        min_angle: f64,
        real_angle: f64,
    ) -> Option<SweepEvent> {
        if !now_ms.is_finite() {
            return None;
        }
        match self.state {
            SweepState::Idle => None,
            SweepState::SweepingUp => {
                let started = *self.phase_start.get_or_insert(now_ms);
                if now_ms - started >= SWEEP_UP_MS {
                    self.state = SweepState::SweepingDown;
                    self.phase_start = Some(now_ms);
                    sim.set_target(min_angle, false);
                }
                None
            }
            SweepState::SweepingDown => {
                if !sim.is_settled(SWEEP_SETTLE_THRESHOLD) {
                    return None;
                }
                sim.set_target(real_angle, false);
                self.state = SweepState::Idle;
                self.phase_start = None;
                log::info!("gauge sweep completed");
                Some(SweepEvent::Completed)
            }
        }
    }
}
