use anyhow::Error;
use log::{info, warn};
use rusty_ledstrip::prelude::*;
use tokio::sync::watch;

#[cfg(not(feature = "pi"))]
fn init_sink(config: &Config) -> Result<SimulatedSink, Error> {
    warn!("Built without the pi feature, frames go to the simulated strip");
    Ok(SimulatedSink::new(config.strip.pixel_count))
}

#[cfg(feature = "pi")]
fn init_sink(config: &Config) -> Result<Ws2812Spi, Error> {
    Ws2812Spi::init(&config.strip)
}

/// Resolves on Ctrl-C, or SIGTERM where there is such a thing
async fn shutdown_signal() -> Result<(), Error> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting config...");
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default config: {:#}", e);
            Config::default()
        }
    };

    info!("Starting strip...");
    let commands = CommandState::new(Command::idle(config.idle_tick()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let animator = Animator::init(init_sink(&config)?, commands.clone(), shutdown_rx)?;

    info!("Starting command socket...");
    let receiver = CommandReceiver::new(commands, animator.strip().len(), config.idle_tick());
    let listener = bind(&config.socket)?;
    // The listener blocks on accept, so it gets a plain thread that dies with
    // the process rather than a runtime task the runtime would wait on
    std::thread::Builder::new()
        .name("command-listener".to_string())
        .spawn(move || listen(listener, receiver))?;

    let animation = tokio::spawn(animator.run());

    shutdown_signal().await?;
    info!("Shutting down...");
    shutdown_tx.send(true).ok();
    animation.await?;

    std::fs::remove_file(&config.socket).ok();

    Ok(())
}
