use glam::{Quat, Vec3};

use crate::axle::AxleRole;
use crate::wheel_pose::WheelPose;

/// A wheel inside whatever engine simulates suspension and contact.
///
/// Commands are consumed once per fixed step. The engine owns physical
/// limits, so implementations get the raw values with no clamping applied.
pub trait PhysicsWheel {
    fn set_motor_torque(&mut self, torque: f32);
    fn set_steer_angle(&mut self, degrees: f32);
    fn set_brake_torque(&mut self, torque: f32);
    fn world_pose(&self) -> WheelPose;
}

/// A renderable transform that mirrors one wheel.
pub trait VisualTransform {
    fn set_world_position(&mut self, position: Vec3);
    fn set_world_orientation(&mut self, orientation: Quat);
}

/// The rigid body the wheels are attached to.
pub trait ChassisBody {
    fn set_center_of_mass(&mut self, local: Vec3);
}

// what was last forwarded to a wheel's physics handle
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelCommand {
    pub motor_torque: f32,
    pub steer_angle: f32,
    pub brake_torque: f32,
}

pub struct WheelActuator<W: PhysicsWheel, V: VisualTransform> {
    axle: AxleRole,
    // degrees; persists across ticks so steering can be smoothed
    current_steer_angle: f32,
    last_command: WheelCommand,
    physical: W,
    visual: V,
}

impl<W: PhysicsWheel, V: VisualTransform> WheelActuator<W, V> {
    pub fn new(axle: AxleRole, physical: W, visual: V) -> Self {
        WheelActuator {
            axle,
            current_steer_angle: 0.0,
            last_command: WheelCommand::default(),
            physical,
            visual,
        }
    }

    pub fn axle(&self) -> AxleRole {
        self.axle
    }

    pub fn current_steer_angle(&self) -> f32 {
        self.current_steer_angle
    }

    pub fn last_command(&self) -> WheelCommand {
        self.last_command
    }

    pub fn physical(&self) -> &W {
        &self.physical
    }

    pub fn physical_mut(&mut self) -> &mut W {
        &mut self.physical
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    pub fn apply_motor_torque(&mut self, value: f32) {
        self.last_command.motor_torque = value;
        self.physical.set_motor_torque(value);
    }

    pub fn apply_steer_angle(&mut self, degrees: f32) {
        self.current_steer_angle = degrees;
        self.last_command.steer_angle = degrees;
        self.physical.set_steer_angle(degrees);
    }

    pub fn apply_brake_torque(&mut self, value: f32) {
        self.last_command.brake_torque = value;
        self.physical.set_brake_torque(value);
    }

    pub fn world_pose(&self) -> WheelPose {
        self.physical.world_pose()
    }

    pub fn set_visual_pose(&mut self, position: Vec3, orientation: Quat) {
        self.visual.set_world_position(position);
        self.visual.set_world_orientation(orientation);
    }
}
