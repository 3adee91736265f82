use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

// WheelPose is what the physics side reports for a wheel after simulating
// contact == where to render it
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelPose {
    pub position: Vec3,
    pub orientation: Quat, // should be a normalized quaternion
}

impl WheelPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        WheelPose {
            position,
            orientation,
        }
    }
}
