use std::io::Write;

use clap::Args;
use dayboard_core::timer::{TimerAction, TimerApp, TimerView};
use dayboard_core::{Config, Frame, Host};
use tracing::{debug, info};

#[derive(Args)]
pub struct TimerArgs {
    /// Duration in minutes; must be one of the configured presets
    minutes: u32,
    /// Print every frame as one JSON line instead of redrawing in place
    #[arg(long)]
    json: bool,
}

fn draw(frame: &Frame<TimerView>, json: bool) {
    if json {
        match serde_json::to_string(frame) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("error: {e}"),
        }
    } else {
        print!("\r{}", frame.view);
        if let Err(e) = std::io::stdout().flush() {
            debug!(error = %e, "stdout flush failed");
        }
    }
}

pub async fn run(args: TimerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let app = TimerApp::new(config.timer);
    if !app.presets().contains(&args.minutes) {
        let presets: Vec<String> = app.presets().iter().map(u32::to_string).collect();
        return Err(format!(
            "{} is not a preset duration (choose one of: {})",
            args.minutes,
            presets.join(", ")
        )
        .into());
    }

    let mut host = Host::new(app);
    let id = host.open_session();
    let first = host.dispatch(id, TimerAction::Start(args.minutes)).await?;
    draw(&first, args.json);

    let last = host.drive(first, |frame| draw(frame, args.json)).await?;
    if !args.json {
        println!();
    }
    info!(pass = last.pass, "countdown finished");
    host.end_session(id);
    Ok(())
}
