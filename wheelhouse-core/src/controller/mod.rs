use tracing::{debug, trace};

use crate::axle::{AxleRole, DriveMode};
use crate::input::{InputEvent, InputState, SharedInput};
use crate::vehicle_config::VehicleConfig;
use crate::wheel::{ChassisBody, PhysicsWheel, VisualTransform, WheelActuator};


/// Converts configured engine force into the torque unit the physics side expects.
pub const ENGINE_FORCE_SCALE: f32 = 600.0;
/// Converts configured brake force into brake torque.
pub const BRAKE_SCALE: f32 = 300.0;

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Turns driver input into per-wheel motor, steering and brake commands.
///
/// The host calls [`tick`](Self::tick) once per fixed physics step and
/// [`sync_visuals`](Self::sync_visuals) once per rendered frame. Input can be
/// pushed at any rate in between; only the latest sample is used.
pub struct VehicleController<W: PhysicsWheel, V: VisualTransform> {
    config: VehicleConfig,
    input: SharedInput,
    wheels: Vec<WheelActuator<W, V>>,
}

impl<W: PhysicsWheel, V: VisualTransform> VehicleController<W, V> {
    /// Panics if `wheels` is empty: a vehicle with no wheels is a setup bug,
    /// not something to drive around.
    pub fn new(config: VehicleConfig, wheels: Vec<WheelActuator<W, V>>) -> Self {
        assert!(
            !wheels.is_empty(),
            "a vehicle needs at least one wheel actuator"
        );
        debug!(
            wheels = wheels.len(),
            drive_mode = ?config.drive_mode,
            "vehicle controller created"
        );

        VehicleController {
            config,
            input: SharedInput::new(),
            wheels,
        }
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    // tuning between ticks; the next tick picks up whatever is here
    pub fn config_mut(&mut self) -> &mut VehicleConfig {
        &mut self.config
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.config.drive_mode
    }

    pub fn set_drive_mode(&mut self, mode: DriveMode) {
        if mode != self.config.drive_mode {
            debug!(from = ?self.config.drive_mode, to = ?mode, "drive mode changed");
        }
        self.config.drive_mode = mode;
    }

    pub fn wheels(&self) -> &[WheelActuator<W, V>] {
        &self.wheels
    }

    // the slice can't grow or shrink, so the wheel count stays fixed
    pub fn wheels_mut(&mut self) -> &mut [WheelActuator<W, V>] {
        &mut self.wheels
    }

    pub fn input(&self) -> InputState {
        self.input.load()
    }

    /// A handle other threads can write driver input through.
    pub fn input_handle(&self) -> SharedInput {
        self.input.clone()
    }

    pub fn set_input(&mut self, steer: f32, throttle: f32) {
        self.input.store_axes(steer, throttle);
    }

    pub fn set_brake_held(&mut self, held: bool) {
        self.input.store_brake(held);
    }

    pub fn apply_input_event(&mut self, event: InputEvent) {
        self.input.store_event(event);
    }

    pub fn configure_chassis<C: ChassisBody>(&self, chassis: &mut C) {
        if let Some(center_of_mass) = self.config.center_of_mass {
            debug!(?center_of_mass, "moving chassis center of mass");
            chassis.set_center_of_mass(center_of_mass);
        }
    }

    /// Advances one fixed physics step of `dt` seconds.
    ///
    /// Panics if `dt` is not a positive, finite duration.
    pub fn tick(&mut self, dt: f32) {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "tick needs a positive step duration, got {}",
            dt
        );

        // read once so every wheel sees the same sample
        let input = self.input.load();

        self.distribute_torque(input.throttle, dt);
        self.steer(input.steer, dt);
        self.brake(input, dt);

        trace!(
            steer = input.steer,
            throttle = input.throttle,
            brake_held = input.brake_held,
            "vehicle ticked"
        );
    }

    /// Copies each wheel's simulated pose onto its visual.
    pub fn sync_visuals(&mut self) {
        for wheel in &mut self.wheels {
            let pose = wheel.world_pose();
            wheel.set_visual_pose(pose.position, pose.orientation);
        }
    }

    fn distribute_torque(&mut self, throttle: f32, dt: f32) {
        let torque = throttle * self.config.max_engine_force * dt * ENGINE_FORCE_SCALE;
        let drive_mode = self.config.drive_mode;

        for wheel in &mut self.wheels {
            if drive_mode.drives(wheel.axle()) {
                wheel.apply_motor_torque(torque);
            } else {
                wheel.apply_motor_torque(0.0);
            }
        }
    }

    fn steer(&mut self, steer: f32, dt: f32) {
        let target = steer * self.config.turn_sensitivity * self.config.max_steer_angle;
        let factor = self.config.steer_smoothing.factor(dt);

        for wheel in &mut self.wheels {
            if self.config.steers(wheel.axle()) {
                // rear wheels counter-steer
                let signed_target = match wheel.axle() {
                    AxleRole::Front => target,
                    AxleRole::Rear => -target,
                };
                let angle = lerp(wheel.current_steer_angle(), signed_target, factor);
                wheel.apply_steer_angle(angle);
            } else {
                wheel.apply_steer_angle(0.0);
            }
        }
    }

    fn brake(&mut self, input: InputState, dt: f32) {
        // Idle brake: a throttle resting at exactly zero brakes just like the
        // pedal does. Analog sticks that rest slightly off zero won't trigger it.
        let braking = input.brake_held || input.throttle == 0.0;
        let torque = if braking {
            BRAKE_SCALE * self.config.brake_force * dt
        } else {
            0.0
        };

        for wheel in &mut self.wheels {
            wheel.apply_brake_torque(torque);
        }
    }
}
