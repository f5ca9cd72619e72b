//! Playback worker: a dedicated thread owns the audio output stream and
//! services fire-and-forget play requests sent over a channel.

use anyhow::Context;
use rand::Rng;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;

/// Per-clip playback rate is drawn uniformly from this range so rapid
/// typing does not sound mechanical.
const MIN_RATE: f32 = 0.6;
const MAX_RATE: f32 = 1.4;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("audio player is closed")]
    Closed,
}

enum Command {
    Play(PathBuf),
    SetGain(f32),
    Flush(Sender<()>),
}

/// Handle to the playback worker.
///
/// `play` and `set_gain` are non-blocking sends; completion is never awaited
/// and playback failures never reach the caller. Any number of clips may be
/// in flight at once. `close` is idempotent and releases the output device.
pub struct Player {
    tx: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Player {
    pub fn spawn(initial_gain: f32) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(rx, initial_gain));
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn play(&self, path: PathBuf) -> Result<(), PlayerError> {
        self.send(Command::Play(path))
    }

    pub fn set_gain(&self, gain: f32) -> Result<(), PlayerError> {
        self.send(Command::SetGain(gain.clamp(0.0, 1.0)))
    }

    /// Blocks until every clip dispatched so far has finished. Only the
    /// one-shot `play` command uses this; event handlers never wait.
    pub fn wait_idle(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    pub fn close(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn send(&self, command: Command) -> Result<(), PlayerError> {
        match &self.tx {
            Some(tx) => tx.send(command).map_err(|_| PlayerError::Closed),
            None => Err(PlayerError::Closed),
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_worker(rx: Receiver<Command>, initial_gain: f32) {
    // The stream is created here because it is not Send; if no output
    // device exists, drain commands so senders stay well-behaved.
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!(error = ?err, "no audio output device; sounds disabled");
            while let Ok(command) = rx.recv() {
                if let Command::Flush(ack) = command {
                    let _ = ack.send(());
                }
            }
            return;
        }
    };

    let mut gain = initial_gain.clamp(0.0, 1.0);
    let mut live: Vec<Sink> = Vec::new();
    let mut rng = rand::thread_rng();

    while let Ok(command) = rx.recv() {
        live.retain(|sink| !sink.empty());

        match command {
            Command::Play(path) => {
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "sound file missing; skipping");
                    continue;
                }

                match start_clip(&handle, &path, gain, &mut rng) {
                    Ok(sink) => live.push(sink),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = ?err, "playback failed; skipping");
                    }
                }
            }
            Command::SetGain(new_gain) => {
                gain = new_gain;
                // In-flight clips pick up the new gain too, not just
                // future ones.
                for sink in &live {
                    sink.set_volume(gain);
                }
            }
            Command::Flush(ack) => {
                for sink in &live {
                    sink.sleep_until_end();
                }
                let _ = ack.send(());
            }
        }
    }

    for sink in &live {
        sink.stop();
    }
}

fn start_clip(
    handle: &OutputStreamHandle,
    path: &Path,
    gain: f32,
    rng: &mut impl Rng,
) -> anyhow::Result<Sink> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("decode {}", path.display()))?;

    // Sinks are single-use: one per clip, never restarted.
    let sink = Sink::try_new(handle).context("create playback sink")?;
    sink.set_volume(gain);
    sink.set_speed(rng.gen_range(MIN_RATE..=MAX_RATE));
    sink.append(source);
    Ok(sink)
}
