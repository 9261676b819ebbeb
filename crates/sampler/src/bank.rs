// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The set of monitored channels and the measurement cycle.
//!
//! A cycle takes `samples` passes over every channel, sleeping `delta`
//! between passes, then averages and scales each accumulator. Only one
//! cycle may run at a time: a second caller gets [`SampleError::Busy`]
//! immediately instead of queueing behind the first.

use crate::{Channel, ChannelReading, SampleError, Snapshot, ThermalInfo};
use mcp3008::{AnalogSource, CHANNEL_COUNT};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock, TryLockError};
use std::time::{Duration, SystemTime};

/// Default number of passes per cycle.
pub const DEFAULT_SAMPLES: u32 = 5;

/// Default pause between passes.
pub const DEFAULT_DELTA: Duration = Duration::from_millis(1);

/// Parameters of one measurement cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleParams {
    /// Passes over every channel per cycle (at least 1).
    pub samples: u32,
    /// Pause between consecutive passes.
    pub delta: Duration,
    /// Millivolts per full-scale normalized reading.
    pub factor: f64,
}

impl CycleParams {
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.samples == 0 {
            return Err(SampleError::InvalidParameter {
                name: "samples",
                detail: "at least one sample per cycle is required".into(),
            });
        }
        if !self.factor.is_finite() {
            return Err(SampleError::InvalidParameter {
                name: "factor",
                detail: format!("must be finite, got {}", self.factor),
            });
        }
        Ok(())
    }
}

impl Default for CycleParams {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            delta: DEFAULT_DELTA,
            factor: 1.0,
        }
    }
}

/// State owned by whoever holds the cycle lock.
struct Cycle {
    source: Box<dyn AnalogSource>,
    channels: BTreeMap<u8, Channel>,
    params: CycleParams,
    thermal_zone: Option<PathBuf>,
}

impl Cycle {
    fn run(&mut self) -> Result<(), SampleError> {
        let Cycle {
            source,
            channels,
            params,
            ..
        } = self;

        channels.values_mut().for_each(Channel::reset);

        for remaining in (0..params.samples).rev() {
            for ch in channels.values_mut() {
                ch.accumulate(source.as_mut())?;
            }
            if remaining > 0 && !params.delta.is_zero() {
                std::thread::sleep(params.delta);
            }
        }

        for ch in channels.values_mut() {
            ch.average(params.factor);
        }
        Ok(())
    }

    fn read_temperature(&self) -> Option<ThermalInfo> {
        let path = self.thermal_zone.as_deref()?;
        match ThermalInfo::read_from(path) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("die temperature unavailable: {e}");
                None
            }
        }
    }

    fn readings(&self) -> Vec<ChannelReading> {
        self.channels.values().map(Channel::reading).collect()
    }
}

/// Monitored channels plus the latest published [`Snapshot`].
pub struct ChannelBank {
    cycle: Mutex<Cycle>,
    latest: RwLock<Snapshot>,
}

impl ChannelBank {
    /// Creates an empty bank reading from `source`.
    pub fn new(source: Box<dyn AnalogSource>, params: CycleParams) -> Result<Self, SampleError> {
        params.validate()?;
        Ok(Self {
            cycle: Mutex::new(Cycle {
                source,
                channels: BTreeMap::new(),
                params,
                thermal_zone: None,
            }),
            latest: RwLock::new(Snapshot::default()),
        })
    }

    /// Reads the die temperature from `path` at the end of every cycle.
    pub fn with_thermal_zone(self, path: impl Into<PathBuf>) -> Self {
        self.lock_cycle().thermal_zone = Some(path.into());
        self
    }

    /// Replaces the cycle parameters after validating them.
    pub fn set_params(&self, params: CycleParams) -> Result<(), SampleError> {
        params.validate()?;
        self.lock_cycle().params = params;
        Ok(())
    }

    /// Current cycle parameters.
    pub fn params(&self) -> CycleParams {
        self.lock_cycle().params
    }

    /// Adds MCP3008 input `number` under `label`.
    pub fn add_channel(&self, number: u8, label: &str) -> Result<(), SampleError> {
        if number >= CHANNEL_COUNT {
            return Err(SampleError::InvalidChannel(number));
        }
        let mut cycle = self.lock_cycle();
        if cycle.channels.contains_key(&number) {
            return Err(SampleError::DuplicateChannel(number));
        }
        cycle.channels.insert(number, Channel::new(number, label));
        let readings = cycle.readings();
        drop(cycle);

        tracing::debug!("channel {number} ({label}) added");
        self.publish(|s| s.channels = readings);
        Ok(())
    }

    /// Removes input `number` from the bank.
    pub fn remove_channel(&self, number: u8) -> Result<(), SampleError> {
        let mut cycle = self.lock_cycle();
        if cycle.channels.remove(&number).is_none() {
            return Err(SampleError::UnknownChannel(number));
        }
        let readings = cycle.readings();
        drop(cycle);

        self.publish(|s| s.channels = readings);
        Ok(())
    }

    /// Configured channel numbers in ascending order.
    pub fn channel_numbers(&self) -> Vec<u8> {
        self.lock_cycle().channels.keys().copied().collect()
    }

    /// Number of configured channels.
    pub fn len(&self) -> usize {
        self.lock_cycle().channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs one measurement cycle and returns the resulting snapshot.
    ///
    /// Returns [`SampleError::Busy`] without side effects when another
    /// cycle holds the lock. On an ADC failure the cycle is still marked
    /// completed and channels keep their previous values.
    pub fn measure(&self) -> Result<Snapshot, SampleError> {
        let mut cycle = match self.cycle.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(SampleError::Busy),
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
        };

        let started = SystemTime::now();
        self.publish(|s| {
            s.valid = false;
            s.started = Some(started);
        });
        tracing::debug!("measurement cycle started, {} channels", cycle.channels.len());

        let result = cycle.run();
        let temperature = cycle.read_temperature();
        let readings = cycle.readings();
        let completed = SystemTime::now();
        drop(cycle);

        self.publish(|s| {
            s.channels = readings;
            s.temperature = temperature;
            s.completed = Some(completed);
            s.valid = true;
        });

        result?;
        let snapshot = self.last();
        tracing::debug!("measurement cycle complete: {}", snapshot.summary());
        Ok(snapshot)
    }

    /// The latest published snapshot.
    pub fn last(&self) -> Snapshot {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_cycle(&self) -> std::sync::MutexGuard<'_, Cycle> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: impl FnOnce(&mut Snapshot)) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut latest);
    }
}

impl std::fmt::Debug for ChannelBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBank")
            .field("channels", &self.channel_numbers())
            .field("params", &self.params())
            .finish()
    }
}
