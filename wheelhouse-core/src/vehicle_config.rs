use config::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::axle::{AxleRole, DriveMode};

/// Per-tick weight given to the steering target.
pub const SMOOTHING_FACTOR: f32 = 0.6;

/// How the steer angle chases its target.
///
/// `PerTick` applies [`SMOOTHING_FACTOR`] once per `tick` call no matter how
/// long the step was, so steering response is only tuned as authored when the
/// host ticks at a constant rate. `TimeNormalized` is an opt-in alternative
/// that rescales the factor so that a step of `reference_step` seconds behaves
/// exactly like one `PerTick` step.
#[derive(Copy, Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SteerSmoothing {
    #[default]
    PerTick,
    TimeNormalized { reference_step: f32 },
}

impl SteerSmoothing {
    pub fn factor(self, dt: f32) -> f32 {
        match self {
            SteerSmoothing::PerTick => SMOOTHING_FACTOR,
            SteerSmoothing::TimeNormalized { reference_step } => {
                1.0 - (1.0 - SMOOTHING_FACTOR).powf(dt / reference_step)
            }
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct VehicleConfig {
    pub max_engine_force: f32,
    pub brake_force: f32,
    pub drive_mode: DriveMode,
    pub turn_sensitivity: f32,
    pub max_steer_angle: f32, // degrees
    pub steer_front_enabled: bool,
    pub steer_rear_enabled: bool,

    #[serde(default)]
    pub steer_smoothing: SteerSmoothing,
    // chassis-local; left to the physics engine when unset
    #[serde(default)]
    pub center_of_mass: Option<Vec3>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            max_engine_force: 30.0,
            brake_force: 50.0,
            drive_mode: DriveMode::AllWheelDrive,
            turn_sensitivity: 1.0,
            max_steer_angle: 30.0,
            steer_front_enabled: true,
            steer_rear_enabled: false,
            steer_smoothing: SteerSmoothing::PerTick,
            center_of_mass: None,
        }
    }
}

impl VehicleConfig {
    pub fn steers(&self, axle: AxleRole) -> bool {
        match axle {
            AxleRole::Front => self.steer_front_enabled,
            AxleRole::Rear => self.steer_rear_enabled,
        }
    }

    // The controller trusts whatever it is handed, so anything loading
    // tuning from outside should run this first
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_engine_force.is_finite() && self.max_engine_force > 0.0) {
            return Err(ConfigError::Message(format!(
                "vehicle.max_engine_force must be positive, got {}",
                self.max_engine_force
            )));
        }
        if !(self.brake_force.is_finite() && self.brake_force > 0.0) {
            return Err(ConfigError::Message(format!(
                "vehicle.brake_force must be positive, got {}",
                self.brake_force
            )));
        }
        if let SteerSmoothing::TimeNormalized { reference_step } = self.steer_smoothing {
            if !(reference_step.is_finite() && reference_step > 0.0) {
                return Err(ConfigError::Message(format!(
                    "vehicle.steer_smoothing.reference_step must be positive, got {}",
                    reference_step
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(VehicleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_forces() {
        let mut config = VehicleConfig::default();
        config.max_engine_force = 0.0;
        assert!(config.validate().is_err());

        let mut config = VehicleConfig::default();
        config.brake_force = -5.0;
        assert!(config.validate().is_err());

        let mut config = VehicleConfig::default();
        config.brake_force = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_reference_step() {
        let config = VehicleConfig {
            steer_smoothing: SteerSmoothing::TimeNormalized {
                reference_step: 0.0,
            },
            ..VehicleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_steering_axles() {
        let config = VehicleConfig::default();
        assert!(config.steers(AxleRole::Front));
        assert!(!config.steers(AxleRole::Rear));
    }

    #[test]
    fn test_time_normalized_factor() {
        let smoothing = SteerSmoothing::TimeNormalized {
            reference_step: 0.02,
        };
        assert!((smoothing.factor(0.02) - SMOOTHING_FACTOR).abs() < 1e-6);
        // two half steps should land where one full step does
        let half = smoothing.factor(0.01);
        let remaining = (1.0 - half) * (1.0 - half);
        assert!((remaining - (1.0 - SMOOTHING_FACTOR)).abs() < 1e-6);
        assert_eq!(SteerSmoothing::PerTick.factor(0.5), SMOOTHING_FACTOR);
    }
}
