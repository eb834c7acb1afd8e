//! Remote-receive callback
//!
//! Frames from the sensing node replace the stored reading wholesale
//! (last write wins) and every field is republished on each receipt.

use safehouse_connectors::payload;
use safehouse_core::reading::FusedReading;

use crate::context::NodeContext;
use crate::errors::NodeResult;

/// Decode, commit and republish one frame
///
/// Malformed frames are dropped with a warning. A lock timeout skips the
/// frame and nothing is published.
pub async fn on_remote_payload(ctx: &NodeContext, frame: &[u8]) -> NodeResult<FusedReading> {
    let reading = match FusedReading::from_bytes(frame) {
        Ok(reading) => reading,
        Err(e) => {
            log::warn!("Dropped remote frame ({} bytes): {}", frame.len(), e);
            return Err(e.into());
        }
    };

    let timeout = ctx.config.timing.receive_lock_timeout();
    if let Err(e) = ctx.store.with_lock(timeout, |state| state.reading = reading).await {
        log::error!("Remote frame not committed: {}", e);
        return Err(e.into());
    }

    log::debug!(
        "Remote frame: temp {} hum {} dht {:?} gas {:?} motion {}",
        reading.temperature, reading.humidity, reading.dht_status, reading.gas_ppm, reading.motion
    );

    ctx.publish_all(&payload::reading_messages(&reading, &ctx.topics)).await;
    Ok(reading)
}
