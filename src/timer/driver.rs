//! Countdown engine task
//!
//! The engine runs as a single tokio task that owns the `CountdownCore`, the
//! live tick and the registered sink. Callers talk to it through a
//! `Countdown` handle; every transition and every sink call happens on the
//! engine task, in command order.

use std::time::Duration;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot, watch},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::{CountdownCore, CountdownSnapshot};
use crate::error::CountdownError;

/// What a sink receives for every emission
pub type CountdownResult = Result<CountdownSnapshot, CountdownError>;

/// The single delivery callback registered with the engine
pub type CountdownSink = Box<dyn FnMut(CountdownResult) + Send + 'static>;

/// Receives the remaining seconds of a running interval
pub type RemainingSink = Box<dyn FnOnce(f64) + Send + 'static>;

enum Command {
    Start(CountdownSink),
    Pause,
    Stop,
    Skip(CountdownSink),
    SaveTime(RemainingSink),
    Settle(oneshot::Sender<CountdownSnapshot>),
}

/// Handle to a running countdown engine.
///
/// Dropping the last handle tears the engine down: the live tick is cancelled
/// before the buffers and sink are released.
#[derive(Debug)]
pub struct Countdown {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<CountdownSnapshot>,
}

/// A handle that does not keep the engine alive, for use inside sinks
#[derive(Debug, Clone)]
pub struct WeakCountdown {
    commands: mpsc::WeakUnboundedSender<Command>,
    snapshots: watch::Receiver<CountdownSnapshot>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::Start(_) => "Start",
            Command::Pause => "Pause",
            Command::Stop => "Stop",
            Command::Skip(_) => "Skip",
            Command::SaveTime(_) => "SaveTime",
            Command::Settle(_) => "Settle",
        };
        f.write_str(name)
    }
}

impl Countdown {
    /// Spawn the engine on `runtime`, ticking every `period`
    pub fn spawn(
        runtime: &Handle,
        core: CountdownCore,
        period: Duration,
    ) -> Result<Self, CountdownError> {
        if period.is_zero() {
            return Err(CountdownError::ZeroPeriod);
        }

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(core.snapshot());

        let engine = Engine {
            ticker: None,
            core,
            period,
            sink: None,
            snapshots: snapshot_tx,
        };
        runtime.spawn(engine.run(command_rx));

        Ok(Self {
            commands,
            snapshots,
        })
    }

    /// Cancel any live tick, arm a new one and emit `Running` right away.
    /// `sink` replaces the registered sink.
    pub fn start<F>(&self, sink: F) -> Result<(), CountdownError>
    where
        F: FnMut(CountdownResult) + Send + 'static,
    {
        self.send(Command::Start(Box::new(sink)))
    }

    pub fn pause(&self) -> Result<(), CountdownError> {
        self.send(Command::Pause)
    }

    pub fn stop(&self) -> Result<(), CountdownError> {
        self.send(Command::Stop)
    }

    /// Zero the active interval, switch to the queued one and emit `Stopped`.
    /// `sink` replaces the registered sink.
    pub fn skip<F>(&self, sink: F) -> Result<(), CountdownError>
    where
        F: FnMut(CountdownResult) + Send + 'static,
    {
        self.send(Command::Skip(Box::new(sink)))
    }

    /// Report the remaining seconds of the active interval. Does nothing
    /// unless a tick is live.
    pub fn save_time<F>(&self, sink: F) -> Result<(), CountdownError>
    where
        F: FnOnce(f64) + Send + 'static,
    {
        self.send(Command::SaveTime(Box::new(sink)))
    }

    /// Wait until every command sent so far has been applied
    pub async fn settle(&self) -> Result<CountdownSnapshot, CountdownError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Settle(tx))?;
        rx.await.map_err(|_| CountdownError::Terminated)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> CountdownSnapshot {
        *self.snapshots.borrow()
    }

    /// Watch every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<CountdownSnapshot> {
        self.snapshots.clone()
    }

    pub fn downgrade(&self) -> WeakCountdown {
        WeakCountdown {
            commands: self.commands.downgrade(),
            snapshots: self.snapshots.clone(),
        }
    }

    fn send(&self, command: Command) -> Result<(), CountdownError> {
        self.commands
            .send(command)
            .map_err(|_| CountdownError::Terminated)
    }
}

impl WeakCountdown {
    /// Get a usable handle if the engine is still alive
    pub fn upgrade(&self) -> Option<Countdown> {
        self.commands.upgrade().map(|commands| Countdown {
            commands,
            snapshots: self.snapshots.clone(),
        })
    }
}

// `ticker` is declared first so it is released before anything else, even
// when the task is dropped by a runtime shutdown.
struct Engine {
    ticker: Option<time::Interval>,
    core: CountdownCore,
    period: Duration,
    sink: Option<CountdownSink>,
    snapshots: watch::Sender<CountdownSnapshot>,
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cancel_tick();
        debug!("Countdown engine stopped");
    }
}

impl Engine {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        debug!("Countdown engine started, tick every {:?}", self.period);

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },

                _ = next_tick(&mut self.ticker) => self.on_tick(),
            }
        }
    }

    fn apply(&mut self, command: Command) {
        debug!("Countdown command: {:?}", command);

        match command {
            Command::Start(sink) => {
                self.cancel_tick();
                self.sink = Some(sink);
                if let Some(snapshot) = self.core.start() {
                    self.arm_tick();
                    info!(
                        "Countdown running on {:?} slot, {:.1}s remaining",
                        snapshot.slot,
                        snapshot.interval.remaining_seconds()
                    );
                    self.emit(Ok(snapshot));
                }
            }
            Command::Pause => {
                self.cancel_tick();
                if let Some(snapshot) = self.core.pause() {
                    info!("Countdown paused at {:.1}s", snapshot.interval.elapsed_seconds());
                    self.emit(Ok(snapshot));
                }
            }
            Command::Stop => {
                self.cancel_tick();
                if let Some(snapshot) = self.core.stop() {
                    info!("Countdown stopped");
                    self.emit(Ok(snapshot));
                }
            }
            Command::Skip(sink) => {
                self.cancel_tick();
                self.sink = Some(sink);
                let snapshot = self.core.skip();
                info!("Countdown skipped to {:?} slot", snapshot.slot);
                self.emit(Ok(snapshot));
            }
            Command::SaveTime(sink) => {
                if self.ticker.is_some() {
                    sink(self.core.remaining_seconds());
                } else {
                    debug!("No live tick, remaining time not reported");
                }
            }
            Command::Settle(reply) => {
                let _ = reply.send(self.core.snapshot());
            }
        }
    }

    fn on_tick(&mut self) {
        let Some(result) = self.core.tick() else {
            // Not running; nothing may fire once the tick is disarmed
            self.cancel_tick();
            return;
        };

        match &result {
            Ok(snapshot) if !snapshot.state.is_running() => {
                self.cancel_tick();
                info!("Countdown finished after {:.1}s", snapshot.interval.elapsed_seconds());
            }
            Ok(_) => {}
            Err(e) => {
                self.cancel_tick();
                warn!("Countdown tick failed: {}", e);
            }
        }

        self.emit(result);
    }

    fn arm_tick(&mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.ticker = Some(ticker);
    }

    fn cancel_tick(&mut self) {
        self.ticker = None;
    }

    fn emit(&mut self, result: CountdownResult) {
        self.snapshots.send_replace(self.core.snapshot());
        if let Some(sink) = self.sink.as_mut() {
            sink(result);
        }
    }
}

async fn next_tick(ticker: &mut Option<time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
