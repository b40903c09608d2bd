use chrono::NaiveDate;
use clap::Args;
use dayboard_core::dday::{parse_date, CalculatorAction, CalculatorApp, CountMode};
use dayboard_core::{Clock, Config, Host};

use super::{clock_for, print_view};

#[derive(Args)]
pub struct CalcArgs {
    /// Name of the D-day
    #[arg(long)]
    title: Option<String>,
    /// Target date: YYYY-MM-DD, 'today', or +N/-N days from today
    #[arg(long, allow_hyphen_values = true)]
    date: Option<String>,
    /// remaining (D-day) or elapsed (day count)
    #[arg(long)]
    mode: Option<CountMode>,
    /// Restore title, date and mode to their defaults first
    #[arg(long)]
    reset: bool,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
    /// Pretend today is this date
    #[arg(long, hide = true)]
    today: Option<NaiveDate>,
}

pub async fn run(args: CalcArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut host = Host::with_clock(CalculatorApp::new(config.calculator), clock_for(args.today));
    let id = host.open_session();
    let mut frame = host.render(id)?;

    if args.reset {
        frame = host.dispatch(id, CalculatorAction::Reset).await?;
    }
    if let Some(title) = args.title {
        frame = host.dispatch(id, CalculatorAction::SetTitle(title)).await?;
    }
    if let Some(date) = args.date {
        let date = parse_date(&date, host.clock().today())?;
        frame = host.dispatch(id, CalculatorAction::SetDate(date)).await?;
    }
    if let Some(mode) = args.mode {
        frame = host.dispatch(id, CalculatorAction::SetMode(mode)).await?;
    }

    print_view(&frame.view, args.json)
}
