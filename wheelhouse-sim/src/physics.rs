use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::{Quat, Vec3};
use tracing::debug;
use wheelhouse_core::{ChassisBody, PhysicsWheel, WheelPose};

// A deliberately tiny stand-in for a real physics engine: wheels spin up
// under motor torque, brakes bleed spin off, and the chassis rolls forward
// at the average wheel surface speed. No suspension, no tire model.

pub const WHEEL_RADIUS: f32 = 0.35;
pub const WHEEL_INERTIA: f32 = 1.5;

// proportional to spin rate, so it dominates at low speeds
pub const ROLLING_RESISTANCE_COEFFICIENT: f32 = 0.3;

pub struct WheelBody {
    pub mount: Vec3, // chassis-local

    pub motor_torque: f32,
    pub steer_angle: f32, // degrees
    pub brake_torque: f32,

    pub spin_angle: f32, // radians
    pub spin_rate: f32,  // radians per second
    pub position: Vec3,
}

impl WheelBody {
    fn new(mount: Vec3) -> Self {
        WheelBody {
            mount,
            motor_torque: 0.0,
            steer_angle: 0.0,
            brake_torque: 0.0,
            spin_angle: 0.0,
            spin_rate: 0.0,
            position: mount,
        }
    }

    fn integrate_spin(&mut self, dt: f32) {
        self.spin_rate += self.motor_torque / WHEEL_INERTIA * dt;

        // brakes only ever remove spin, they never reverse it
        let brake_delta = self.brake_torque.abs() / WHEEL_INERTIA * dt;
        if self.spin_rate.abs() <= brake_delta {
            self.spin_rate = 0.0;
        } else {
            self.spin_rate -= brake_delta * self.spin_rate.signum();
        }

        self.spin_rate -= self.spin_rate * ROLLING_RESISTANCE_COEFFICIENT * dt;
        self.spin_angle = (self.spin_angle + self.spin_rate * dt).rem_euclid(TAU);
    }

    fn pose(&self) -> WheelPose {
        let steer = Quat::from_rotation_y(self.steer_angle.to_radians());
        let spin = Quat::from_rotation_x(self.spin_angle);
        WheelPose::new(self.position, steer * spin)
    }
}

// What the controller holds on to for each wheel; the world keeps a clone
#[derive(Clone)]
pub struct SimWheel(Rc<RefCell<WheelBody>>);

impl SimWheel {
    pub fn spin_rate(&self) -> f32 {
        self.0.borrow().spin_rate
    }
}

impl PhysicsWheel for SimWheel {
    fn set_motor_torque(&mut self, torque: f32) {
        self.0.borrow_mut().motor_torque = torque;
    }

    fn set_steer_angle(&mut self, degrees: f32) {
        self.0.borrow_mut().steer_angle = degrees;
    }

    fn set_brake_torque(&mut self, torque: f32) {
        self.0.borrow_mut().brake_torque = torque;
    }

    fn world_pose(&self) -> WheelPose {
        self.0.borrow().pose()
    }
}

pub struct PhysicsWorld {
    pub chassis_position: Vec3,
    pub center_of_mass: Vec3,
    wheels: Vec<SimWheel>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        PhysicsWorld {
            chassis_position: Vec3::ZERO,
            center_of_mass: Vec3::ZERO,
            wheels: Vec::new(),
        }
    }

    pub fn add_wheel(&mut self, mount: Vec3) -> SimWheel {
        let wheel = SimWheel(Rc::new(RefCell::new(WheelBody::new(mount))));
        self.wheels.push(wheel.clone());
        wheel
    }

    pub fn chassis_speed(&self) -> f32 {
        if self.wheels.is_empty() {
            return 0.0;
        }
        let total_spin: f32 = self.wheels.iter().map(|w| w.spin_rate()).sum();
        total_spin / self.wheels.len() as f32 * WHEEL_RADIUS
    }

    pub fn step(&mut self, dt: f32) {
        for wheel in &self.wheels {
            wheel.0.borrow_mut().integrate_spin(dt);
        }

        // the chassis always faces +z; steering only shows up on the wheels
        self.chassis_position.z += self.chassis_speed() * dt;

        for wheel in &self.wheels {
            let mut body = wheel.0.borrow_mut();
            body.position = self.chassis_position + body.mount;
        }
    }
}

impl ChassisBody for PhysicsWorld {
    fn set_center_of_mass(&mut self, local: Vec3) {
        debug!(?local, "chassis center of mass set");
        self.center_of_mass = local;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_torque_spins_wheel_up() {
        let mut world = PhysicsWorld::new();
        let mut wheel = world.add_wheel(Vec3::new(0.8, 0.0, 1.3));
        wheel.set_motor_torque(360.0);

        world.step(0.02);

        // 360 / 1.5 * 0.02, less rolling resistance
        let expected = 4.8 - 4.8 * ROLLING_RESISTANCE_COEFFICIENT * 0.02;
        assert!((wheel.spin_rate() - expected).abs() < 1e-4);
        assert!(world.chassis_position.z > 0.0);
    }

    #[test]
    fn test_brake_stops_without_reversing() {
        let mut world = PhysicsWorld::new();
        let mut wheel = world.add_wheel(Vec3::ZERO);
        wheel.set_motor_torque(150.0);
        world.step(0.02);
        assert!(wheel.spin_rate() > 0.0);

        wheel.set_motor_torque(0.0);
        wheel.set_brake_torque(300.0);
        world.step(0.02);
        assert_eq!(wheel.spin_rate(), 0.0);

        world.step(0.02);
        assert_eq!(wheel.spin_rate(), 0.0);
    }

    #[test]
    fn test_pose_follows_chassis_and_steer() {
        let mut world = PhysicsWorld::new();
        let mount = Vec3::new(-0.8, 0.0, 1.3);
        let mut wheel = world.add_wheel(mount);
        wheel.set_steer_angle(90.0);
        world.chassis_position = Vec3::new(0.0, 0.0, 5.0);
        world.step(0.02);

        let pose = wheel.world_pose();
        assert!(pose.position.abs_diff_eq(Vec3::new(-0.8, 0.0, 6.3), 1e-5));
        // a wheel steered 90 degrees rolls along x instead of z
        let rolling_axis = pose.orientation * Vec3::X;
        assert!(rolling_axis.abs_diff_eq(-Vec3::Z, 1e-5));
    }

    #[test]
    fn test_center_of_mass() {
        let mut world = PhysicsWorld::new();
        world.set_center_of_mass(Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(world.center_of_mass, Vec3::new(0.0, -0.5, 0.0));
    }
}
