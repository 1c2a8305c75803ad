use anyhow::Context;
use clap::Parser;

use glyphtess_bridge::config::{AppConfig, Cli};
use glyphtess_bridge::{shell, util};

fn main() -> anyhow::Result<()> {
    util::init_tracing();
    util::install_panic_hook();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli).context("loading configuration")?;
    tracing::info!(
        text = %config.text,
        fonts = config.fonts.len(),
        max_patches = config.max_patches,
        "starting glyphtess"
    );

    shell::run(config).context("running glyphtess")
}
