use clap::Args;
use dayboard_core::prompt::{
    PromptAction, PromptApp, PromptGenerator, PromptOutcome, LIGHTING, MOODS, PALETTES, STYLE_TAGS,
};
use dayboard_core::{Config, Host};
use tracing::debug;

use super::print_view;

#[derive(Args)]
pub struct PromptArgs {
    /// What the image should show
    #[arg(long, short, default_value = "")]
    description: String,
    /// Style tag; repeat for several (see --options)
    #[arg(long = "style", short, value_name = "TAG")]
    styles: Vec<String>,
    #[arg(long)]
    mood: Option<String>,
    #[arg(long)]
    lighting: Option<String>,
    /// Color palette
    #[arg(long)]
    palette: Option<String>,
    /// Anything else worth mentioning
    #[arg(long)]
    details: Option<String>,
    /// API key for the chat-completions endpoint
    #[arg(long, default_value = "")]
    api_key: String,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
    /// List the suggested styles, moods, lighting and palettes, then exit
    #[arg(long)]
    options: bool,
}

fn print_options() {
    for (label, values) in [
        ("styles", STYLE_TAGS),
        ("moods", MOODS),
        ("lighting", LIGHTING),
        ("palettes", PALETTES),
    ] {
        println!("{label}: {}", values.join(", "));
    }
}

pub async fn run(args: PromptArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.options {
        print_options();
        return Ok(());
    }

    let config = Config::load()?;
    let generator = PromptGenerator::from_config(config.prompt)?;
    let mut host = Host::new(PromptApp::new(generator));
    let id = host.open_session();

    let mut actions = vec![
        PromptAction::SetApiKey(args.api_key),
        PromptAction::SetDescription(args.description),
    ];
    actions.extend(args.styles.into_iter().map(PromptAction::ToggleStyle));
    actions.extend([
        PromptAction::SetMood(args.mood),
        PromptAction::SetLighting(args.lighting),
        PromptAction::SetPalette(args.palette),
        PromptAction::SetDetails(args.details),
    ]);
    for action in actions {
        host.dispatch(id, action).await?;
    }

    debug!("requesting prompt");
    let frame = host.dispatch(id, PromptAction::Generate).await?;

    match (&frame.view.outcome, args.json) {
        (Some(PromptOutcome::Failed { message, .. }), false) => Err(message.clone().into()),
        (Some(PromptOutcome::Failed { .. }), true) => {
            print_view(&frame.view, true)?;
            Err("prompt generation failed".into())
        }
        _ => print_view(&frame.view, args.json),
    }
}
