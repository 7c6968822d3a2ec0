mod communication;
mod config;

use brain::{Map, Position, RobotBrain};
use clap::Parser;
use communication::CommunicationLayer;
use config::InterfaceConfig;
use kinematics::IkSolver;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(name = "interface", version, about = "Plan a grid path and drive the arm along it")]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start cell as row,col
    #[arg(long, value_name = "X,Y", value_parser = parse_cell)]
    start: Option<Position>,

    /// Goal cell as row,col
    #[arg(long, value_name = "X,Y", value_parser = parse_cell)]
    goal: Option<Position>,

    /// Publish joint commands over zenoh
    #[arg(long)]
    publish: bool,

    /// Delay between executed steps
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,
}

fn parse_cell(value: &str) -> Result<Position, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {value:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad row {x:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad column {y:?}: {e}"))?;
    Ok(Position::new(x, y))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            InterfaceConfig::load(path)?
        }
        None => InterfaceConfig::default(),
    };
    if let Some(start) = args.start {
        config.start = start;
    }
    if let Some(goal) = args.goal {
        config.goal = goal;
    }
    if let Some(interval) = args.interval_ms {
        config.step_interval_ms = interval;
    }
    config.comm.publish |= args.publish;

    println!("Initializing arm motion planner...");

    let solver = IkSolver::new(config.arm).with_policy(config.reach_policy);
    let mut brain = RobotBrain::with_config(Map::default(), config.planner, solver);

    let comm = if config.comm.publish {
        let comm = CommunicationLayer::new(&config.comm).await?;
        comm.subscribe_joint_state(|angles| debug!("Joint state feedback: {:?}", angles)).await?;
        Some(comm)
    } else {
        None
    };

    println!("Planning motion from {} to {}", config.start, config.goal);
    let report = brain.plan_motion(config.start, config.goal)?;
    if report.steps == 0 {
        println!("No path found.");
        return Ok(());
    }
    for point in &report.clamped {
        println!("Waypoint ({}, {}) is out of reach, arm will stop short of it", point.x, point.y);
    }

    for (i, point) in brain.path().iter().enumerate() {
        println!("Waypoint {}: ({}, {})", i, point.x, point.y);
    }

    // Simulation loop
    while let Some(state) = brain.execute_next_step() {
        println!("Executing step: {:?}", state);
        if let Some(comm) = &comm {
            if let Err(e) = comm.publish_joint_command(&state).await {
                warn!("Failed to publish joint command: {}", e);
            }
        }
        // Simulate hardware execution time
        sleep(Duration::from_millis(config.step_interval_ms)).await;
    }
    println!("Motion complete.");
    Ok(())
}
