pub mod axle;
pub mod controller;
pub mod input;
pub mod vehicle_config;
pub mod wheel;
pub mod wheel_pose;
mod settings;

pub use axle::{AxleRole, DriveMode};
pub use controller::VehicleController;
pub use input::{InputEvent, InputState, SharedInput};
pub use settings::{Settings, GLOBAL_CONFIG};
pub use vehicle_config::{SteerSmoothing, VehicleConfig};
pub use wheel::{ChassisBody, PhysicsWheel, VisualTransform, WheelActuator, WheelCommand};
pub use wheel_pose::WheelPose;
