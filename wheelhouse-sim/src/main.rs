use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;
use wheelhouse_core::GLOBAL_CONFIG;

mod input_script;
mod physics;
mod scene;
mod sim;

use input_script::InputScript;
use sim::Simulation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = &*GLOBAL_CONFIG;
    info!(
        drive_mode = ?settings.vehicle.drive_mode,
        physics_tick_ms = settings.physics_tick_ms,
        "loaded vehicle settings"
    );

    let mut simulation = Simulation::new(settings);

    // input arrives on its own thread, at the render rate rather than the physics rate
    let script = InputScript::demo(settings.input_jitter);
    let script_handle = script.spawn(
        simulation.input_handle(),
        Duration::from_millis(settings.render_frame_ms),
    );

    simulation.run_for(Duration::from_millis(settings.sim_duration_ms));
    script_handle.stop();

    let front = &simulation.car().wheels()[0];
    info!(
        ticks = simulation.ticks(),
        distance = simulation.world().chassis_position.z,
        speed = simulation.world().chassis_speed(),
        front_steer_angle = front.current_steer_angle(),
        visuals = simulation.scene().nodes().len(),
        "simulation finished"
    );
}
