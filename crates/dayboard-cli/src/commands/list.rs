//! Line-oriented D-day list session.
//!
//! The whole list lives in one in-memory session for as long as stdin stays
//! open. Each line is parsed like a tiny command line:
//!
//! ```text
//! add --date +14 Exam
//! edit 1
//! save 1 --date 2026-01-05 Final exam
//! delete 1
//! ```

use std::io::{BufRead, IsTerminal, Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dayboard_core::dday::{parse_date, ItemCard, ListAction, ListApp, ListView};
use dayboard_core::error::Result;
use dayboard_core::{Clock, Config, Frame, Host, SessionId};

use super::clock_for;

#[derive(Args)]
pub struct ListArgs {
    /// Print each frame as one JSON line
    #[arg(long)]
    json: bool,
    /// Pretend today is this date
    #[arg(long, hide = true)]
    today: Option<NaiveDate>,
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: LineCommand,
}

#[derive(Subcommand)]
enum LineCommand {
    /// Add a D-day (blank title and date fall back to defaults)
    Add {
        /// YYYY-MM-DD, 'today', or +N/-N days
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
        title: Vec<String>,
    },
    /// Open an item for editing
    Edit { position: usize },
    /// Save an item; omitted title or date keep their current value
    Save {
        position: usize,
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
        title: Vec<String>,
    },
    /// Leave edit mode without changes
    Cancel,
    /// Delete an item
    Delete { position: usize },
    /// Delete every item
    Clear,
    /// Show the list
    Show,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

struct Session<C> {
    host: Host<ListApp, C>,
    id: SessionId,
    last: Frame<ListView>,
    json: bool,
}

impl<C: Clock> Session<C> {
    fn card(&self, position: usize) -> Option<&ItemCard> {
        self.last
            .view
            .columns
            .iter()
            .flatten()
            .find(|c| c.position == position)
    }

    fn show(&self) -> std::result::Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string(&self.last)?);
        } else {
            println!("{}", self.last.view);
        }
        Ok(())
    }

    /// Returns false once the session should end.
    async fn execute(&mut self, command: LineCommand) -> Result<bool> {
        let today = self.host.clock().today();
        let action = match command {
            LineCommand::Quit => return Ok(false),
            LineCommand::Show => {
                self.last = self.host.render(self.id)?;
                self.show()?;
                return Ok(true);
            }
            LineCommand::Add { date, title } => {
                let date = date.map(|d| parse_date(&d, today)).transpose()?;
                self.host
                    .dispatch(self.id, ListAction::SetNewTitle(title.join(" ")))
                    .await?;
                self.host
                    .dispatch(self.id, ListAction::SetNewDate(date))
                    .await?;
                ListAction::Add
            }
            LineCommand::Edit { position } => match self.card(position) {
                Some(card) => ListAction::StartEdit(card.id),
                None => return not_found(position),
            },
            LineCommand::Save {
                position,
                date,
                title,
            } => {
                let Some(card) = self.card(position) else {
                    return not_found(position);
                };
                let title = match title.join(" ") {
                    t if t.trim().is_empty() => card.title.clone(),
                    t => t,
                };
                let date = match date {
                    Some(d) => parse_date(&d, today)?,
                    None => card.date,
                };
                ListAction::SaveEdit {
                    id: card.id,
                    title,
                    date,
                }
            }
            LineCommand::Cancel => ListAction::CancelEdit,
            LineCommand::Delete { position } => match self.card(position) {
                Some(card) => ListAction::Delete(card.id),
                None => return not_found(position),
            },
            LineCommand::Clear => ListAction::ClearAll,
        };

        self.last = self.host.dispatch(self.id, action).await?;
        self.show()?;
        Ok(true)
    }
}

fn not_found(position: usize) -> Result<bool> {
    eprintln!("no item at position {position}");
    Ok(true)
}

pub async fn run(args: ListArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut host = Host::with_clock(ListApp::new(config.list), clock_for(args.today));
    let id = host.open_session();
    let last = host.render(id)?;
    let mut session = Session {
        host,
        id,
        last,
        json: args.json,
    };

    let interactive = std::io::stdin().is_terminal();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let command = match Line::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Help and parse errors alike; the session goes on.
                eprintln!("{e}");
                continue;
            }
        };
        match session.execute(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    session.host.end_session(session.id);
    Ok(())
}
