use anyhow::Context;
use bridge::server::TableBridge;
use clap::Parser;
use motion::model::{BallMotionModel, MotionConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod motion;

#[derive(Parser)]
#[command(author, version, about = "Table stand-in driver for the foosball control panel")]
struct Args {
    /// Run the motion model for a fixed number of ticks and emit a trace summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a motion config from YAML
    #[arg(long)]
    motion: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Steps to simulate in offline mode
    #[arg(long, default_value_t = 120)]
    ticks: usize,
    /// Host the HTTP bridge for the panel (Ctrl+C to stop)
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Bridge port; the panel expects 5000 by default
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let motion_config = if let Some(path) = args.motion {
        MotionConfig::load(path)?
    } else {
        MotionConfig::from_seed(args.seed)
    };

    if args.offline {
        let mut model = BallMotionModel::new(motion_config.clone());
        let trajectory = model.trajectory(args.ticks);
        let final_position = model.position();

        println!(
            "Offline run -> ticks {}, final position ({:.1}, {:.1}), at rest {}",
            trajectory.len(),
            final_position.x,
            final_position.y,
            model.at_rest()
        );

        let report = format!(
            "ticks={} final=({:.1}, {:.1}) at_rest={} seed={}\n",
            trajectory.len(),
            final_position.x,
            final_position.y,
            model.at_rest(),
            motion_config.seed
        );
        let report_path = PathBuf::from("tools/data/offline_trace.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let bridge = TableBridge::new(motion_config);
        bridge.spawn(args.port);
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
