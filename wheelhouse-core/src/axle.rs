use serde::{Deserialize, Serialize};

// Which pair of wheels a wheel belongs to; fixed for the wheel's lifetime
#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AxleRole {
    Front,
    Rear,
}

// Which axles receive motor torque
#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    FrontWheelDrive,
    RearWheelDrive,
    AllWheelDrive,
}

impl DriveMode {
    pub fn drives(self, axle: AxleRole) -> bool {
        match self {
            DriveMode::AllWheelDrive => true,
            DriveMode::FrontWheelDrive => axle == AxleRole::Front,
            DriveMode::RearWheelDrive => axle == AxleRole::Rear,
        }
    }
}
