use anyhow::{bail, Context, Error};
use common::command::{LedModeColor, MODES};
use log::info;
use rusty_ledstrip::{config::Config, receiver::publish};

const USAGE: &str = "usage: ledpub <mode> [r g b] [--length n] [--wait ms] [--socket path]";

fn parse_args(args: &[String]) -> Result<(LedModeColor, Option<String>), Error> {
    let Some(mode) = args.first() else {
        bail!("{}", USAGE);
    };

    let mut rgb = Vec::new();
    let mut length = None;
    let mut wait_ms = None;
    let mut socket = None;

    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .with_context(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--length" => length = Some(value("--length")?.parse::<i64>()?),
            "--wait" => wait_ms = Some(value("--wait")?.parse::<u64>()?),
            "--socket" => socket = Some(value("--socket")?),
            channel => rgb.push(
                channel
                    .parse::<i64>()
                    .with_context(|| format!("bad colour channel {:?}", channel))?,
            ),
        }
    }

    let [r, g, b] = match rgb.as_slice() {
        [] => [0, 0, 0],
        [r, g, b] => [*r, *g, *b],
        _ => bail!("expected three colour channels\n{}", USAGE),
    };

    let mut message = LedModeColor::new(mode, r, g, b);
    message.length = length;
    message.wait_ms = wait_ms;

    Ok((message, socket))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (message, socket) = parse_args(&args)?;

    if !MODES.contains(&message.mode.as_str()) {
        info!("{:?} is not a known mode, the strip will idle", message.mode);
    }

    let socket = match socket {
        Some(socket) => socket,
        None => Config::load().unwrap_or_default().socket,
    };

    publish(&socket, &message)?;
    info!("Sent {} to {}", message.mode, socket);

    Ok(())
}
