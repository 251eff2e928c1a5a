use std::{
    io::{self, prelude::*, BufReader},
    path::Path,
    time::Duration,
};

use anyhow::{Context, Error};
use common::command::LedModeColor;
use interprocess::local_socket::{LocalSocketListener, LocalSocketStream};
use log::{debug, info, warn};
use smart_leds::RGB8;

use crate::command::{Command, CommandState, Mode};

/// Turns inbound messages into command replacements.
#[derive(Clone, Debug)]
pub struct CommandReceiver {
    state: CommandState,
    pixel_count: usize,
    idle_tick: Duration,
}

impl CommandReceiver {
    pub fn new(state: CommandState, pixel_count: usize, idle_tick: Duration) -> Self {
        Self {
            state,
            pixel_count,
            idle_tick,
        }
    }

    /// Apply one message. Never fails: colours and lengths are clamped and
    /// unknown modes are stored as they came.
    pub fn handle(&self, message: &LedModeColor) -> u64 {
        let mode = Mode::parse(&message.mode);
        let [r, g, b] = message.color.clamped();
        let color = RGB8::new(r, g, b);
        let length = message
            .length
            .unwrap_or(self.pixel_count as i64)
            .clamp(1, self.pixel_count.max(1) as i64) as usize;
        let frame_interval = message
            .wait_ms
            .map(Duration::from_millis)
            .or_else(|| mode.default_interval())
            .unwrap_or(self.idle_tick);

        info!("Command received: {} {:?}", mode, color);

        self.state.replace(|current| Command {
            previous_color: if mode == Mode::FadeTo {
                current.color
            } else {
                current.previous_color
            },
            mode,
            color,
            length,
            frame_interval,
        })
    }

    /// Handle every newline separated message on a connection until the
    /// publisher hangs up. Returns how many messages were applied.
    pub fn handle_stream(&self, stream: impl Read) -> io::Result<usize> {
        let mut handled = 0;
        for line in BufReader::new(stream).split(b'\n') {
            let line = line?;
            let line = match std::str::from_utf8(&line) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Ignoring command that is not UTF-8: {}", e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match LedModeColor::from_line(line) {
                Ok(message) => {
                    self.handle(&message);
                    handled += 1;
                }
                Err(e) => warn!("Ignoring malformed command {:?}: {}", line, e),
            }
        }
        Ok(handled)
    }
}

fn handle_error(conn: io::Result<LocalSocketStream>) -> Option<LocalSocketStream> {
    match conn {
        Ok(val) => Some(val),
        Err(error) => {
            warn!("Incoming connection failed: {}", error);
            None
        }
    }
}

/// Bind the command socket. A socket file left behind by a previous run is
/// removed first.
pub fn bind(socket: &str) -> Result<LocalSocketListener, Error> {
    if Path::new(socket).exists() {
        std::fs::remove_file(socket).with_context(|| format!("removing stale {}", socket))?;
    }
    let listener =
        LocalSocketListener::bind(socket).with_context(|| format!("binding {}", socket))?;
    info!("Listening for commands on {}", socket);
    Ok(listener)
}

/// Accept publishers forever, each served on its own thread so a quiet
/// connection cannot hold up the others. Blocks, so it belongs on its own
/// thread too.
pub fn listen(listener: LocalSocketListener, receiver: CommandReceiver) {
    for conn in listener.incoming().filter_map(handle_error) {
        let receiver = receiver.clone();
        let spawned = std::thread::Builder::new()
            .name("command-publisher".to_string())
            .spawn(move || match receiver.handle_stream(conn) {
                Ok(count) => debug!("Publisher disconnected after {} commands", count),
                Err(e) => warn!("Publisher connection dropped: {}", e),
            });
        if let Err(e) = spawned {
            warn!("Could not serve publisher: {}", e);
        }
    }
}

/// Send a single command to a running daemon
pub fn publish(socket: &str, message: &LedModeColor) -> Result<(), Error> {
    let mut conn =
        LocalSocketStream::connect(socket).with_context(|| format!("connecting to {}", socket))?;
    conn.write_all(message.to_line()?.as_bytes())?;
    conn.flush()?;
    Ok(())
}
