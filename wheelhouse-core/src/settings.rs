use config::{Config, ConfigError, File};
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::vehicle_config::VehicleConfig;

#[derive(Deserialize)]
pub struct Settings {
    pub physics_tick_ms: u64,
    pub render_frame_ms: u64,
    pub sim_duration_ms: u64,
    pub telemetry: bool,
    pub input_jitter: f32,
    pub vehicle: VehicleConfig,
}

impl Settings {
    pub fn new() -> Result<Settings, ConfigError> {
        Settings::from_file("config.yaml")
    }

    pub fn from_file(name: &str) -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("physics_tick_ms", 20)?
            .set_default("render_frame_ms", 16)?
            .set_default("sim_duration_ms", 5000)?
            .set_default("telemetry", false)?
            .set_default("input_jitter", 0.0)?
            .set_default("vehicle.max_engine_force", 30.0)?
            .set_default("vehicle.brake_force", 50.0)?
            .set_default("vehicle.drive_mode", "all_wheel_drive")?
            .set_default("vehicle.turn_sensitivity", 1.0)?
            .set_default("vehicle.max_steer_angle", 30.0)?
            .set_default("vehicle.steer_front_enabled", true)?
            .set_default("vehicle.steer_rear_enabled", false)?
            .set_default("vehicle.steer_smoothing", "per_tick")?
            .add_source(File::with_name(name).required(false))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.vehicle.validate()?;
        Ok(settings)
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axle::DriveMode;
    use crate::vehicle_config::SteerSmoothing;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::from_file("definitely-not-a-config-file").unwrap();
        assert_eq!(settings.physics_tick_ms, 20);
        assert_eq!(settings.render_frame_ms, 16);
        assert!(!settings.telemetry);
        assert_eq!(settings.input_jitter, 0.0);
        assert_eq!(settings.vehicle, VehicleConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("wheelhouse-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tuned.yaml");
        std::fs::write(
            &path,
            "physics_tick_ms: 10\n\
             vehicle:\n  \
               drive_mode: rear_wheel_drive\n  \
               steer_rear_enabled: true\n  \
               max_steer_angle: 20.0\n  \
               steer_smoothing:\n    \
                 time_normalized:\n      \
                   reference_step: 0.02\n",
        )
        .unwrap();

        let settings = Settings::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.physics_tick_ms, 10);
        assert_eq!(settings.vehicle.drive_mode, DriveMode::RearWheelDrive);
        assert!(settings.vehicle.steer_rear_enabled);
        assert_eq!(settings.vehicle.max_steer_angle, 20.0);
        assert_eq!(
            settings.vehicle.steer_smoothing,
            SteerSmoothing::TimeNormalized {
                reference_step: 0.02
            }
        );
        // untouched keys keep their defaults
        assert_eq!(settings.vehicle.brake_force, 50.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_force_is_rejected() {
        let dir = std::env::temp_dir().join(format!("wheelhouse-invalid-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.yaml");
        std::fs::write(&path, "vehicle:\n  brake_force: 0.0\n").unwrap();

        assert!(Settings::from_file(path.to_str().unwrap()).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
