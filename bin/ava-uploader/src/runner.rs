//! ---
//! ava_section: "01-core-functionality"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Tick loops tying generators, framing and the uplink together."
//! ava_version: "v0.1.0"
//! ava_owner: "tbd"
//! ---
use std::time::Duration;

use anyhow::{Context, Result};
use ava_common::{epoch_millis, DeviceClock};
use ava_logging::{ava_debug, ava_warn, LogContext};
use ava_net::{ConnectionManager, Connector, LinkSnapshot};
use ava_sim::{BenchPattern, ChannelRotor, DrivingState, SimulationMode, TelemetryGenerator};
use ava_wire::{encode_bundle, Reading, TelemetryPacket, WireFrame};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Fixed bundle sent by the `test-bundle` command.
pub const TEST_BUNDLE_IDS: [u32; 6] = [0, 1, 2, 3, 192, 204];
pub const TEST_BUNDLE_VALUES: [i64; 6] = [1, 512, 510, 256, 1500, 0];

pub fn test_bundle() -> Reading {
    Reading::from_pairs(TEST_BUNDLE_IDS.into_iter().zip(TEST_BUNDLE_VALUES))
}

/// Observes the interrupt flag set by the signal task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// Resolves once shutdown is requested. Never resolves if the sender is gone.
    pub async fn requested(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames: u64,
    pub resends: u64,
    /// True when an interrupt ended the run.
    pub interrupted: bool,
}

pub struct Uploader<C: Connector> {
    manager: ConnectionManager<C>,
    shutdown: Shutdown,
}

impl<C: Connector> Uploader<C> {
    pub fn new(manager: ConnectionManager<C>, shutdown: Shutdown) -> Self {
        Self { manager, shutdown }
    }

    /// Mode A: one JSON bundle of the driving model per tick.
    pub async fn drive(
        &mut self,
        generator: &mut TelemetryGenerator,
        sensor_ids: [u32; 4],
        period: Duration,
    ) -> Result<RunSummary> {
        let mut state = DrivingState::default();
        self.run_loop(SimulationMode::Driving, period, |tick| {
            let next = generator.driving_tick(state, sensor_ids);
            state = next.state;
            tracing::trace!(
                tick,
                action = next.action.as_str(),
                values = ?next.state.values(),
                "driving tick"
            );
            let message = encode_bundle(&next.reading, epoch_millis())?;
            Ok(vec![message.to_frame()?])
        })
        .await
    }

    /// Mode B: one binary packet per tick, walking the channel table.
    pub async fn channels(
        &mut self,
        generator: &mut TelemetryGenerator,
        period: Duration,
    ) -> Result<RunSummary> {
        let clock = DeviceClock::start();
        let mut rotor = ChannelRotor::default();
        self.run_loop(SimulationMode::Channels, period, |_| {
            let next = generator.channel_tick(rotor);
            rotor = next.rotor;
            let packet =
                TelemetryPacket::new(clock.now_ms(), next.sample.id, next.sample.bytes())?;
            Ok(vec![packet.to_frame()])
        })
        .await
    }

    /// Mode C: the throttle, brake and RPM bench pattern, three packets per tick.
    pub async fn bench(&mut self, period: Duration) -> Result<RunSummary> {
        let clock = DeviceClock::start();
        let mut pattern = BenchPattern::default();
        self.run_loop(SimulationMode::Bench, period, |_| {
            pattern = pattern.step();
            let timestamp = clock.now_ms();
            pattern
                .samples()
                .iter()
                .map(|sample| {
                    TelemetryPacket::new(timestamp, sample.id, sample.bytes())
                        .map(|packet| packet.to_frame())
                        .map_err(Into::into)
                })
                .collect()
        })
        .await
    }

    /// Send one bundle. The reading is validated before any connection is made.
    pub async fn send_bundle(&mut self, reading: &Reading) -> Result<RunSummary> {
        let frame = encode_bundle(reading, epoch_millis())
            .context("bundle rejected")?
            .to_frame()?;

        let mut summary = RunSummary::default();
        tokio::select! {
            biased;
            _ = self.shutdown.requested() => summary.interrupted = true,
            sent = self.manager.send(&frame) => {
                let report = sent.context("bundle could not be delivered")?;
                summary.ticks = 1;
                summary.frames = 1;
                summary.resends = u64::from(report.reconnected);
                info!(ids = ?reading.ids, values = ?reading.values, "bundle sent");
            }
        }
        Ok(summary)
    }

    /// Close the link and return its final counters.
    pub async fn finish(mut self) -> LinkSnapshot {
        self.manager.close().await;
        self.manager.status().snapshot()
    }

    async fn run_loop<F>(
        &mut self,
        mode: SimulationMode,
        period: Duration,
        mut next_frames: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(u64) -> Result<Vec<WireFrame>>,
    {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut summary = RunSummary::default();
        info!(
            mode = mode.label(),
            endpoint = %self.manager.url(),
            period_ms = period.as_millis() as u64,
            "send loop started"
        );

        'ticks: loop {
            tokio::select! {
                biased;
                _ = self.shutdown.requested() => {
                    summary.interrupted = true;
                    break 'ticks;
                }
                _ = ticker.tick() => {}
            }

            let tick = summary.ticks;
            for frame in next_frames(tick)? {
                tokio::select! {
                    biased;
                    _ = self.shutdown.requested() => {
                        ava_warn!(
                            context = LogContext::new().with_variant(mode.label()).with_tick(tick),
                            "interrupted with a {} frame in flight",
                            frame.kind()
                        );
                        summary.interrupted = true;
                        break 'ticks;
                    }
                    sent = self.manager.send(&frame) => {
                        let report = sent.with_context(|| {
                            format!("{} send loop stopped at tick {tick}", mode.label())
                        })?;
                        summary.frames += 1;
                        if report.reconnected {
                            summary.resends += 1;
                        }
                    }
                }
            }
            summary.ticks += 1;
            ava_debug!(
                context = LogContext::new().with_variant(mode.label()).with_tick(tick),
                "tick complete"
            );
        }

        Ok(summary)
    }
}
