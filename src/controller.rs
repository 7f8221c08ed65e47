//! Control loop
//!
//! One iteration:
//!
//! ```text
//! run active mode ─▶ wait interval ─▶ read one message ─┬─▶ select mode ─▶ parse
//!                                                       │
//!        write feedback + "\n\n" ◀─ generate feedback ◀─┘
//! ```
//!
//! Decode failures, oversized messages, unknown modes and read errors all fall
//! through to the feedback step, so the peer always receives the current
//! (possibly unchanged) state. A read error also pauses the loop for
//! `ERROR_BACKOFF`.

use crate::core::actuator::{Actuator, NullActuator};
use crate::error::{Error, Result};
use crate::runner::ModeRunner;
use crate::transport::Transport;
use crate::wire::{Document, MessageReader, DOCUMENT_CAPACITY, MESSAGE_DELIMITER};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Pause after a failed iteration before trying again
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Counters for the periodic status log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub messages: u64,
    pub rejected: u64,
    pub io_errors: u64,
}

/// Iterations between status log lines
const STATS_INTERVAL: u64 = 60;

/// Chassis controller: transport + framing + mode runner
pub struct ChassisController<T: Transport, A: Actuator = NullActuator> {
    transport: T,
    reader: MessageReader,
    runner: ModeRunner<A>,
    interval: Duration,
    out_buffer: Vec<u8>,
    stats: LoopStats,
}

impl<T: Transport> ChassisController<T, NullActuator> {
    pub fn new(transport: T, interval: Duration) -> Self {
        Self::with_runner(transport, ModeRunner::new(), interval)
    }
}

impl<T: Transport, A: Actuator> ChassisController<T, A> {
    pub fn with_runner(transport: T, runner: ModeRunner<A>, interval: Duration) -> Self {
        Self {
            transport,
            reader: MessageReader::new(),
            runner,
            interval,
            out_buffer: Vec::with_capacity(DOCUMENT_CAPACITY + MESSAGE_DELIMITER.len()),
            stats: LoopStats::default(),
        }
    }

    /// Run until `running` is cleared
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        log::info!(
            "Control loop started (interval {:?}, mode {})",
            self.interval,
            self.runner.active()
        );

        while running.load(Ordering::Relaxed) {
            if let Err(e) = self.tick() {
                log::error!("Control loop iteration failed: {}", e);
                self.stats.io_errors += 1;
                thread::sleep(ERROR_BACKOFF);
            }

            if self.stats.iterations % STATS_INTERVAL == 0 {
                log::debug!("Loop stats: {:?}", self.stats);
            }
        }

        log::info!("Control loop stopped after {} iterations", self.stats.iterations);
        Ok(())
    }

    /// One full iteration: control action, wait, message exchange
    pub fn tick(&mut self) -> Result<()> {
        self.runner.run();
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        self.exchange()
    }

    /// Read at most one command, apply it, then answer with feedback
    ///
    /// Only a failure to write the feedback is returned as an error. A read
    /// error is logged and backed off before the feedback goes out.
    pub fn exchange(&mut self) -> Result<()> {
        self.stats.iterations += 1;

        match self.reader.read_message(&mut self.transport) {
            Ok(Some(line)) => {
                self.stats.messages += 1;
                match Document::from_slice(line) {
                    Ok(doc) => {
                        log::debug!("Command received: mode={:?}", doc.mode());
                        self.runner.select_mode(doc.mode());
                        self.runner.parse(&doc);
                    }
                    Err(e) => {
                        self.stats.rejected += 1;
                        log::warn!("Discarding command: {}", e);
                    }
                }
            }
            Ok(None) => {}
            Err(e @ Error::MessageTooLarge { .. }) => {
                self.stats.rejected += 1;
                log::warn!("Discarding command: {}", e);
            }
            Err(e) => {
                self.stats.io_errors += 1;
                log::error!("Transport read failed: {}", e);
                thread::sleep(ERROR_BACKOFF);
            }
        }

        self.send_feedback()
    }

    fn send_feedback(&mut self) -> Result<()> {
        self.out_buffer.clear();
        self.runner
            .generate_feedback()
            .encode_into(&mut self.out_buffer)?;
        self.transport.write_all(&self.out_buffer)?;
        self.transport.flush()
    }

    pub fn runner(&self) -> &ModeRunner<A> {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut ModeRunner<A> {
        &mut self.runner
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }
}
