use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;
use serde::Serialize;
use tracing::{info, warn};
use wheelhouse_core::{
    AxleRole, InputState, Settings, SharedInput, VehicleController, WheelActuator,
};

use crate::physics::{PhysicsWorld, SimWheel};
use crate::scene::{Scene, SceneNode};

// physics steps we are willing to run for a single rendered frame before
// giving up on catching up
const MAX_STEPS_PER_FRAME: u32 = 5;

// chassis-local wheel mounts, fronts first
fn wheel_layout() -> [(&'static str, AxleRole, Vec3); 4] {
    [
        ("front_left", AxleRole::Front, Vec3::new(-0.8, 0.0, 1.3)),
        ("front_right", AxleRole::Front, Vec3::new(0.8, 0.0, 1.3)),
        ("rear_left", AxleRole::Rear, Vec3::new(-0.8, 0.0, -1.2)),
        ("rear_right", AxleRole::Rear, Vec3::new(0.8, 0.0, -1.2)),
    ]
}

#[derive(Serialize)]
struct WheelTelemetry {
    axle: AxleRole,
    motor_torque: f32,
    steer_angle: f32,
    brake_torque: f32,
}

#[derive(Serialize)]
struct TelemetryLine {
    tick: u64,
    steer: f32,
    throttle: f32,
    brake_held: bool,
    chassis_speed: f32,
    wheels: Vec<WheelTelemetry>,
}

pub struct Simulation {
    world: PhysicsWorld,
    scene: Scene,
    car: VehicleController<SimWheel, SceneNode>,

    physics_step: Duration,
    render_frame: Duration,
    telemetry: bool,
    ticks: u64,
}

impl Simulation {
    pub fn new(settings: &Settings) -> Simulation {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();

        let wheels = wheel_layout()
            .into_iter()
            .map(|(name, axle, mount)| {
                WheelActuator::new(axle, world.add_wheel(mount), scene.spawn(name))
            })
            .collect();

        let car = VehicleController::new(settings.vehicle.clone(), wheels);
        car.configure_chassis(&mut world);

        Simulation {
            world,
            scene,
            car,
            physics_step: Duration::from_millis(settings.physics_tick_ms),
            render_frame: Duration::from_millis(settings.render_frame_ms),
            telemetry: settings.telemetry,
            ticks: 0,
        }
    }

    pub fn input_handle(&self) -> SharedInput {
        self.car.input_handle()
    }

    pub fn car(&self) -> &VehicleController<SimWheel, SceneNode> {
        &self.car
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // one fixed physics step: controller commands first, then the world moves
    pub fn step_physics(&mut self) {
        let dt = self.physics_step.as_secs_f32();
        self.car.tick(dt);
        self.world.step(dt);
        self.ticks += 1;

        if self.telemetry {
            self.emit_telemetry(self.car.input());
        }
    }

    // runs as many fixed steps as fit into `accumulator`, leaving the remainder
    pub fn advance(&mut self, accumulator: &mut Duration) -> u32 {
        let mut steps = 0;
        while *accumulator >= self.physics_step {
            if steps == MAX_STEPS_PER_FRAME {
                warn!(
                    behind = ?*accumulator,
                    "physics fell behind, dropping simulated time"
                );
                *accumulator = Duration::ZERO;
                break;
            }
            self.step_physics();
            *accumulator -= self.physics_step;
            steps += 1;
        }
        steps
    }

    pub fn render(&mut self) {
        self.car.sync_visuals();
        self.scene.render();
    }

    pub fn run_for(&mut self, duration: Duration) {
        info!(
            physics_step = ?self.physics_step,
            render_frame = ?self.render_frame,
            "simulation started"
        );

        let start = Instant::now();
        let mut last_frame = start;
        let mut accumulator = Duration::ZERO;

        while start.elapsed() < duration {
            let frame_start = Instant::now();
            accumulator += frame_start - last_frame;
            last_frame = frame_start;

            self.advance(&mut accumulator);
            self.render();

            // wait until the render frame has elapsed
            thread::sleep(self.render_frame.saturating_sub(frame_start.elapsed()));
        }
    }

    fn emit_telemetry(&self, input: InputState) {
        let line = TelemetryLine {
            tick: self.ticks,
            steer: input.steer,
            throttle: input.throttle,
            brake_held: input.brake_held,
            chassis_speed: self.world.chassis_speed(),
            wheels: self
                .car
                .wheels()
                .iter()
                .map(|wheel| {
                    let command = wheel.last_command();
                    WheelTelemetry {
                        axle: wheel.axle(),
                        motor_torque: command.motor_torque,
                        steer_angle: command.steer_angle,
                        brake_torque: command.brake_torque,
                    }
                })
                .collect(),
        };

        match serde_json::to_string(&line) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("could not serialize telemetry: {}", e),
        }
    }
}
