use std::{
    env,
    error::Error,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use component::{LegacySerializer, TextComponent};
use customnametags::{ChatReceiveEvent, ChatReceiveListener, CustomNameTags, CustomNameTagsConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "customnametags.json";

/// Reads one JSON chat component per line from stdin and prints it with the configured
/// name tags applied.
///
/// Usage: `customnametags [--legacy] [CONFIG]`. With `--legacy` the result is printed with
/// section sign codes instead of as JSON.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut legacy_output = false;
    let mut config_path = None;
    for arg in env::args_os().skip(1) {
        if arg == "--legacy" {
            legacy_output = true;
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    tracing::info!("Loading config from {}...", config_path.display());
    let addon = CustomNameTags::new(CustomNameTagsConfig::load(&config_path)?);
    tracing::info!(
        "Loaded {} custom name tags.",
        addon.configuration().custom_tags().len()
    );

    let listener = ChatReceiveListener::new(&addon);
    let serializer = LegacySerializer::section();
    let mut stdout = io::stdout().lock();

    for (i, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let message: TextComponent = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!("Skipping line {}, not a chat component: {}.", i + 1, err);
                continue;
            }
        };

        let mut event = ChatReceiveEvent::new(message);
        listener.on_chat_receive(&mut event);

        if legacy_output {
            writeln!(stdout, "{}", serializer.serialize(event.message()))?;
        } else {
            serde_json::to_writer(&mut stdout, event.message())?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
