#![warn(clippy::pedantic)]

mod events;
mod replay;
mod svg;

use anyhow::{Context, Result as AnyResult};
use scribble_core::{
    color::{Color, ColorMode},
    config::Config,
    persistence::InMemoryStore,
    util::Rect,
};

/// Surface size until a script resizes it.
const DEFAULT_EXTENT: Rect = Rect::from_size(1024.0, 768.0);
const DARK_BACKGROUND: Color = Color::rgb(0x19, 0x19, 0x19);

const USAGE: &str = "usage: scribble [-o OUTPUT.svg] SCRIPT.jsonl...";

struct Args {
    output: Option<std::path::PathBuf>,
    scripts: Vec<std::path::PathBuf>,
}
impl Args {
    /// `None` if help was requested.
    fn parse(mut args: impl Iterator<Item = std::ffi::OsString>) -> AnyResult<Option<Self>> {
        let mut parsed = Self {
            output: None,
            scripts: Vec::new(),
        };
        while let Some(arg) = args.next() {
            match arg.to_str() {
                Some("-h" | "--help") => return Ok(None),
                Some("-o" | "--output") => {
                    let path = args.next().context("missing path after --output")?;
                    parsed.output = Some(path.into());
                }
                // Paths are OSStrings, let the system handle character encoding restrictions.
                _ => parsed.scripts.push(arg.into()),
            }
        }
        Ok(Some(parsed))
    }
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let Some(args) = Args::parse(std::env::args_os().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    let config = Config::load();
    if let Err(e) = config.save() {
        log::warn!("Failed to save settings:\n{e:?}");
    }

    let mut events = Vec::new();
    for path in &args.scripts {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {path:?}"))?;
        events.extend(events::parse_script(&text).with_context(|| format!("in {path:?}"))?);
    }
    if events.is_empty() {
        log::warn!("No input events given.");
    }

    let store = InMemoryStore::default();
    let key = store.insert_new();
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    let outcome = runtime.block_on(replay::run(
        events,
        &config,
        &store,
        key.clone(),
        DEFAULT_EXTENT,
    ))?;
    let reloaded = runtime.block_on(replay::reload(&config, &store, &key))?;
    if reloaded == (outcome.valid_index, outcome.visible) {
        log::info!(
            "Stored drawing reloads with {} visible curves",
            outcome.visible
        );
    } else {
        log::warn!(
            "Stored drawing diverged: local (valid {}, {} visible), stored (valid {}, {} visible)",
            outcome.valid_index,
            outcome.visible,
            reloaded.0,
            reloaded.1
        );
    }

    let background = match outcome.color_mode {
        ColorMode::Light => Color::WHITE,
        ColorMode::Dark => DARK_BACKGROUND,
    };
    let extent = outcome.canvas.extent();
    let svg = outcome.canvas.persistent().to_svg(extent, background);
    match args.output {
        Some(path) => {
            std::fs::write(&path, svg).with_context(|| format!("failed to write {path:?}"))?;
            log::info!("Wrote {path:?}");
        }
        None => print!("{svg}"),
    }
    Ok(())
}
