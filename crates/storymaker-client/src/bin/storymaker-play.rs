//! Line-oriented player for the StoryMaker engine.
//!
//! Usage: `storymaker-play <name> [seed]`
//!
//! Connects to `STORYMAKER_URL` (default `ws://127.0.0.1:8000/ws`), starts
//! or resumes the named session, and prints each topic as it changes.
//! Type a menu number to perform that entry, `c` to cancel a pending
//! choice, `m` to redraw the map, `q` to quit. `STORYMAKER_LOCALE=fr`
//! switches the display to French.

use anyhow::{Context, bail};
use storymaker_client::{GameClient, GameView, Locale};
use storymaker_types::TopicName;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "ws://127.0.0.1:8000/ws";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let name = args.next().context("usage: storymaker-play <name> [seed]")?;
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed `{raw}`"))?,
        None => 0,
    };
    let url = std::env::var("STORYMAKER_URL").unwrap_or_else(|_| DEFAULT_URL.to_owned());
    let locale = std::env::var("STORYMAKER_LOCALE")
        .ok()
        .and_then(|tag| Locale::parse(&tag))
        .unwrap_or_default();

    let client = GameClient::connect(&url).await?;
    let mut topics = client.topics();
    let mut view = GameView::default();
    let mut printed = 0_usize;

    client.start(&name, seed).await?;
    client.ready().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(envelope) = topics.next() => {
                if let Some(topic) = view.apply(&envelope)? {
                    show(&view, topic, locale, &mut printed);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "q" => break,
                    "c" => client.cancel().await?,
                    "m" => print!("{}", view.render_map()),
                    "" => {}
                    other => match other.parse::<usize>().ok().and_then(|n| view.command_for(n)) {
                        Some(command) => client.send(&command).await?,
                        None => println!("No entry `{other}`"),
                    },
                }
            }
            () = client.closed() => bail!("connection to the game server was lost"),
        }
    }

    client.close().await?;
    Ok(())
}

fn show(view: &GameView, topic: TopicName, locale: Locale, printed: &mut usize) {
    match topic {
        TopicName::Profile => {
            if let Some(profile) = &view.profile {
                println!("== {} (seed {}) ==", profile.name, profile.seed);
            }
        }
        TopicName::Time => {
            if let Some(time) = view.time {
                println!("[{time}]");
            }
        }
        TopicName::Health | TopicName::Energy => println!(
            "health {} / energy {}",
            view.health.unwrap_or_default(),
            view.energy.unwrap_or_default()
        ),
        TopicName::Money => {
            let money: Vec<String> = view.money.iter().map(|(c, a)| format!("{a} {c}")).collect();
            println!("money: {}", money.join(", "));
        }
        TopicName::Map | TopicName::Position => {}
        TopicName::Inventory => {
            let items: Vec<&str> = view.inventory.iter().map(|i| locale.pick(&i.name)).collect();
            println!("carrying: {}", items.join(", "));
        }
        TopicName::Actions => {
            if let Some(context) = &view.context {
                println!("{}", locale.pick(&context.prompt));
            }
            for (number, entry) in (1_usize..).zip(&view.actions) {
                match (&entry.reason, entry.available) {
                    (Some(reason), false) => println!(
                        "  {number}. {} ({})",
                        locale.pick(&entry.label),
                        locale.pick(reason)
                    ),
                    _ => println!("  {number}. {}", locale.pick(&entry.label)),
                }
            }
        }
        TopicName::Message => {
            for message in view.messages.iter().skip(*printed) {
                println!(
                    "{} | {}: {}",
                    message.time,
                    locale.pick(&message.title),
                    locale.pick(&message.content)
                );
            }
            *printed = view.messages.len();
        }
    }
}
