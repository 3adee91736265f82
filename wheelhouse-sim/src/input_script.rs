use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};
use wheelhouse_core::{InputEvent, SharedInput};

// One stretch of constant driver input
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputPhase {
    pub duration: Duration,
    pub steer: f32,
    pub throttle: f32,
    pub brake_held: bool,
}

impl InputPhase {
    pub fn new(duration_ms: u64, steer: f32, throttle: f32, brake_held: bool) -> Self {
        InputPhase {
            duration: Duration::from_millis(duration_ms),
            steer,
            throttle,
            brake_held,
        }
    }
}

/// Plays back a fixed list of input phases, the way a keyboard would feed
/// the controller, optionally with analog stick noise on top.
pub struct InputScript {
    phases: Vec<InputPhase>,
    // maximum noise added to each axis; 0 behaves like a digital input
    analog_jitter: f32,
}

pub struct ScriptHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ScriptHandle {
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        self.thread.join().expect("input script thread panicked");
    }
}

impl InputScript {
    pub fn new(phases: Vec<InputPhase>, analog_jitter: f32) -> Self {
        InputScript {
            phases,
            analog_jitter,
        }
    }

    // accelerate, corner, coast into the idle brake, reverse, then stand on the brake
    pub fn demo(analog_jitter: f32) -> Self {
        InputScript::new(
            vec![
                InputPhase::new(1500, 0.0, 1.0, false),
                InputPhase::new(1000, 0.6, 0.8, false),
                InputPhase::new(1000, 0.0, 0.0, false),
                InputPhase::new(500, -0.3, -0.5, false),
                InputPhase::new(1000, 0.0, 0.0, true),
            ],
            analog_jitter,
        )
    }

    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|phase| phase.duration).sum()
    }

    pub fn phase_at(&self, elapsed: Duration) -> Option<&InputPhase> {
        let mut phase_end = Duration::ZERO;
        for phase in &self.phases {
            phase_end += phase.duration;
            if elapsed < phase_end {
                return Some(phase);
            }
        }
        None
    }

    // the events a device would report at `elapsed`, or None once the script is over
    pub fn sample_at<R: Rng>(&self, elapsed: Duration, rng: &mut R) -> Option<[InputEvent; 2]> {
        let phase = self.phase_at(elapsed)?;
        let mut noise = || {
            if self.analog_jitter > 0.0 {
                rng.gen_range(-self.analog_jitter..=self.analog_jitter)
            } else {
                0.0
            }
        };

        Some([
            InputEvent::Drive {
                steer: phase.steer + noise(),
                throttle: phase.throttle + noise(),
            },
            InputEvent::Brake(phase.brake_held),
        ])
    }

    /// Feeds `input` from a separate thread every `sample_period` until the
    /// script runs out or the returned handle is stopped.
    pub fn spawn(self, input: SharedInput, sample_period: Duration) -> ScriptHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let thread = thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let start = Instant::now();
            info!(duration = ?self.total_duration(), "input script started");

            while !stop_flag.load(Ordering::Relaxed) {
                match self.sample_at(start.elapsed(), &mut rng) {
                    Some(events) => events.into_iter().for_each(|e| input.store_event(e)),
                    None => break,
                }
                thread::sleep(sample_period);
            }

            // let go of everything once the script is done
            input.store_axes(0.0, 0.0);
            input.store_brake(false);
            debug!("input script finished");
        });

        ScriptHandle { stop, thread }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_phase_lookup() {
        let script = InputScript::demo(0.0);
        assert_eq!(script.total_duration(), Duration::from_millis(5000));

        assert_eq!(script.phase_at(Duration::ZERO).unwrap().throttle, 1.0);
        assert_eq!(script.phase_at(Duration::from_millis(1500)).unwrap().steer, 0.6);
        assert!(script.phase_at(Duration::from_millis(4999)).unwrap().brake_held);
        assert!(script.phase_at(Duration::from_millis(5000)).is_none());
    }

    #[test]
    fn test_digital_input_rests_at_exact_zero() {
        let script = InputScript::demo(0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let events = script
            .sample_at(Duration::from_millis(3000), &mut rng)
            .unwrap();

        assert_eq!(
            events,
            [
                InputEvent::Drive {
                    steer: 0.0,
                    throttle: 0.0
                },
                InputEvent::Brake(false),
            ]
        );
    }

    #[test]
    fn test_analog_jitter_stays_in_bounds() {
        let script = InputScript::demo(0.05);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let events = script
                .sample_at(Duration::from_millis(3000), &mut rng)
                .unwrap();
            match events[0] {
                InputEvent::Drive { steer, throttle } => {
                    assert!(steer.abs() <= 0.05);
                    assert!(throttle.abs() <= 0.05);
                }
                InputEvent::Brake(_) => panic!("first event should be the axes"),
            }
        }
    }

    #[test]
    fn test_spawned_script_writes_input() {
        let input = SharedInput::new();
        let script = InputScript::new(vec![InputPhase::new(10_000, 0.5, 0.25, true)], 0.0);
        let handle = script.spawn(input.clone(), Duration::from_millis(1));

        let deadline = Instant::now() + Duration::from_secs(5);
        while input.load().steer != 0.5 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let seen = input.load();
        assert_eq!(seen.steer, 0.5);
        assert_eq!(seen.throttle, 0.25);
        assert!(seen.brake_held);

        handle.stop();
        // stopping releases the controls
        assert_eq!(input.load().throttle, 0.0);
        assert!(!input.load().brake_held);
    }
}
