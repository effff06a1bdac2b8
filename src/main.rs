use anyhow::{Context, Result};
use log::{info, warn};
use std::rc::Rc;

use hotspot::{platform::x11::X11CursorFactory, utils::x11::Display, Config, ScaleSource};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using default configuration: {:#}", e);
        Config::default()
    });

    let display = Rc::new(Display::new()?);
    let scale = config.cursor.effective_scale(display.scale_factor());
    let factory = Rc::new(X11CursorFactory::new(display.clone()));

    let mut cursor = config.cursor.build(factory.clone())?;
    cursor.rescale(scale).context("Failed to rescale cursor")?;

    if let Some(&handle) = cursor.handle() {
        factory.define(display.root(), handle);
    }
    display.sync();

    info!("Installed {} cursor on the root window at scale {}", cursor, scale);

    Ok(())
}
