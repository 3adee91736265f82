use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// InputEvent gets produced by whatever polls the driver's devices; each
// variant maps onto exactly one of the controller's setters
#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum InputEvent {
    Drive { steer: f32, throttle: f32 },
    Brake(bool),
}

// The latest driver sample. Nothing is clamped here: steer and throttle are
// expected in [-1, 1] but out-of-range values just scale their outputs
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub steer: f32,
    pub throttle: f32,
    pub brake_held: bool,
}

struct InputCell {
    // steer in the low 32 bits, throttle in the high 32 bits, so a pair is
    // always replaced as a unit
    axes: AtomicU64,
    brake_held: AtomicBool,
}

/// Single-slot, last-write-wins container for driver input.
///
/// Cloning yields another handle onto the same slot, so an input thread can
/// keep writing while the physics loop reads once per tick. There is no
/// queue: a sample that is overwritten before the next tick is never seen.
#[derive(Clone)]
pub struct SharedInput {
    cell: Arc<InputCell>,
}

fn pack_axes(steer: f32, throttle: f32) -> u64 {
    ((throttle.to_bits() as u64) << 32) | steer.to_bits() as u64
}

fn unpack_axes(bits: u64) -> (f32, f32) {
    let steer = f32::from_bits(bits as u32);
    let throttle = f32::from_bits((bits >> 32) as u32);
    (steer, throttle)
}

impl SharedInput {
    pub fn new() -> Self {
        SharedInput {
            cell: Arc::new(InputCell {
                axes: AtomicU64::new(pack_axes(0.0, 0.0)),
                brake_held: AtomicBool::new(false),
            }),
        }
    }

    pub fn store_axes(&self, steer: f32, throttle: f32) {
        self.cell
            .axes
            .store(pack_axes(steer, throttle), Ordering::Relaxed);
    }

    pub fn store_brake(&self, held: bool) {
        self.cell.brake_held.store(held, Ordering::Relaxed);
    }

    pub fn store_event(&self, event: InputEvent) {
        match event {
            InputEvent::Drive { steer, throttle } => self.store_axes(steer, throttle),
            InputEvent::Brake(held) => self.store_brake(held),
        }
    }

    pub fn load(&self) -> InputState {
        let (steer, throttle) = unpack_axes(self.cell.axes.load(Ordering::Relaxed));
        InputState {
            steer,
            throttle,
            brake_held: self.cell.brake_held.load(Ordering::Relaxed),
        }
    }
}

impl Default for SharedInput {
    fn default() -> Self {
        Self::new()
    }
}
