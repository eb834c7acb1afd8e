//! Local sampling task
//!
//! Owns the gas engine and, optionally, a climate sensor and an outbound
//! transport. Sampling blocks (inter-sample delays, calibration) so each
//! cycle moves the peripherals onto the blocking pool and back.
//!
//! A cycle calibrates first if no baseline is set, reads every gas channel
//! from one fresh window, drains the motion signal and commits the fields
//! it owns to the store. Channels that cannot be read are committed as
//! unknown. The committed reading is forwarded over the transport when one
//! is attached.

use tokio::time::MissedTickBehavior;

use safehouse_connectors::{payload, Transport};
use safehouse_core::errors::{CalibrationError, GasError};
use safehouse_core::gas::{GasConcentrationEngine, GasConcentrations};
use safehouse_core::reading::{DhtStatus, FusedReading};
use safehouse_core::time::TimeSource;
use safehouse_core::traits::{Climate, ClimateSensor, Delay, Sampler};

use crate::context::NodeContext;
use crate::errors::{NodeError, NodeResult};

/// Boxed climate sensor movable onto the blocking pool
pub type BoxedClimateSensor = Box<dyn ClimateSensor + Send>;

struct Peripherals<S, D, C> {
    engine: GasConcentrationEngine<S, D, C>,
    climate: Option<BoxedClimateSensor>,
}

struct Measurement {
    calibration: Option<Result<f32, CalibrationError>>,
    gas: Result<GasConcentrations, GasError>,
    climate: Option<Result<Climate, DhtStatus>>,
}

impl<S, D, C> Peripherals<S, D, C>
where
    S: Sampler,
    D: Delay,
    C: TimeSource,
{
    fn measure(&mut self) -> Measurement {
        let calibration = (!self.engine.is_calibrated()).then(|| self.engine.begin());
        let gas = self.engine.read_all();
        let climate = self.climate.as_mut().map(|sensor| sensor.read_climate());
        Measurement { calibration, gas, climate }
    }
}

/// Producer for the locally attached sensors
pub struct LocalSampler<S, D, C> {
    peripherals: Option<Peripherals<S, D, C>>,
    transport: Option<Box<dyn Transport>>,
    calibration_reported: Option<bool>,
}

impl<S, D, C> LocalSampler<S, D, C>
where
    S: Sampler + Send + 'static,
    D: Delay + Send + 'static,
    C: TimeSource + Send + 'static,
{
    pub fn new(engine: GasConcentrationEngine<S, D, C>) -> Self {
        Self {
            peripherals: Some(Peripherals { engine, climate: None }),
            transport: None,
            calibration_reported: None,
        }
    }

    /// Also read temperature and humidity each cycle
    pub fn with_climate(mut self, sensor: BoxedClimateSensor) -> Self {
        if let Some(p) = self.peripherals.as_mut() {
            p.climate = Some(sensor);
        }
        self
    }

    /// Forward every committed reading as a wire frame
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Gas engine, unless lost to a panicked sampling job
    pub fn engine(&self) -> Option<&GasConcentrationEngine<S, D, C>> {
        self.peripherals.as_ref().map(|p| &p.engine)
    }

    /// Sample, commit and forward once
    pub async fn cycle(&mut self, ctx: &NodeContext) -> NodeResult<FusedReading> {
        let mut peripherals = self.peripherals.take().ok_or(NodeError::SamplerUnavailable)?;

        let (peripherals, measurement) = tokio::task::spawn_blocking(move || {
            let measurement = peripherals.measure();
            (peripherals, measurement)
        })
        .await?;
        self.peripherals = Some(peripherals);

        if let Some(result) = measurement.calibration {
            self.report_calibration(ctx, result).await;
        }

        let gas_ppm = match &measurement.gas {
            Ok(concentrations) => concentrations.to_ppm_array(),
            Err(e) => {
                log::warn!("Gas channels unknown this cycle: {}", e);
                [f32::NAN; 3]
            }
        };
        let motion = ctx.motion.take();

        let reading = ctx
            .store
            .with_lock(ctx.config.timing.lock_timeout(), |state| {
                state.reading.gas_ppm = gas_ppm;
                if let Some(climate) = measurement.climate {
                    state.reading.set_climate(climate);
                }
                state.reading.motion |= motion;
                state.reading
            })
            .await;

        let reading = match reading {
            Ok(reading) => reading,
            Err(e) => {
                if motion {
                    // Keep the detection for the next cycle
                    ctx.motion.post();
                }
                log::error!("Local reading not committed: {}", e);
                return Err(e.into());
            }
        };

        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.send(&reading.to_bytes()) {
                log::warn!("Reading not forwarded: {}", e);
            }
        }

        Ok(reading)
    }

    async fn report_calibration(&mut self, ctx: &NodeContext, result: Result<f32, CalibrationError>) {
        let ok = result.is_ok();
        if self.calibration_reported == Some(ok) {
            return;
        }

        let status = match result {
            Ok(baseline) => {
                log::info!("Gas sensor calibrated, Ro = {:.2} kOhm", baseline);
                payload::calibrated(baseline)
            }
            Err(_) => payload::calibration_failed(),
        };
        if ctx.publish(&ctx.topics.status, &status).await {
            self.calibration_reported = Some(ok);
        }
    }

    /// Sample forever at the configured sampling period
    pub async fn run(mut self, ctx: NodeContext) {
        let mut ticker = tokio::time::interval(ctx.config.timing.sampling_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.cycle(&ctx).await {
                if self.peripherals.is_none() {
                    log::error!("Local sampling stopped: {}", e);
                    return;
                }
            }
        }
    }
}
