//! Power-up, reset and configuration sequence.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::board::{power, Board};
use crate::config::Config;
use crate::error::BringupError;
use crate::regmap::{INIT_IMAGE, REG_CONF_BASE, REG_ORIENTATION, REG_OUTPUT_BASE};
use crate::transport::RegisterBus;

/// Supply off time during the hardware reset.
pub const POWER_CYCLE: Duration = Duration::from_millis(1);
/// Time the shutdown line is held after power-up.
pub const SHUTDOWN_HOLD: Duration = Duration::from_millis(100);
/// Pause between two liveness probe attempts.
pub const PROBE_BACKOFF: Duration = Duration::from_millis(25);
/// Liveness probe attempts before giving up.
pub const PROBE_ATTEMPTS: usize = 10;
/// Settle time between the init image and the orientation write.
pub const CONFIG_SETTLE: Duration = Duration::from_millis(20);

async fn wait<D: DelayNs>(delay: &mut D, duration: Duration) {
    delay.delay_ms(duration.as_millis() as u32).await;
}

/// Brings the controller from any state to configured and interrupting.
///
/// Always starts with a full power cycle, so it doubles as the resume path.
/// On failure the power state is left as is; the caller decides whether to
/// cut it.
pub async fn startup<R, B, D>(
    bus: &mut R,
    board: &mut B,
    delay: &mut D,
    config: &Config,
) -> Result<(), BringupError>
where
    R: RegisterBus,
    B: Board,
    D: DelayNs,
{
    log::trace!("gt80x::startup power cycle");
    power(board, false);
    wait(delay, POWER_CYCLE).await;
    power(board, true);

    board.set_shutdown(true);
    wait(delay, SHUTDOWN_HOLD).await;
    board.set_shutdown(false);

    detect(bus, delay).await?;

    match bus.write(REG_CONF_BASE, &INIT_IMAGE).await {
        Ok(written) if written == INIT_IMAGE.len() => {}
        Ok(written) => {
            log::error!("Init image short write: {written}/{}", INIT_IMAGE.len());
            return Err(BringupError::InitFailed);
        }
        Err(err) => {
            log::error!("Error writing init image: {err}");
            return Err(BringupError::InitFailed);
        }
    }

    wait(delay, CONFIG_SETTLE).await;

    match bus.write_u8(REG_ORIENTATION, config.orientation.bits()).await {
        Ok(1) => {}
        Ok(_) => {
            log::error!("Orientation short write");
            return Err(BringupError::ConfigFailed);
        }
        Err(err) => {
            log::error!("Error writing orientation: {err}");
            return Err(BringupError::ConfigFailed);
        }
    }

    log::debug!("gt80x::startup done");
    Ok(())
}

/// Pings register 0 until the controller answers.
async fn detect<R: RegisterBus, D: DelayNs>(bus: &mut R, delay: &mut D) -> Result<(), BringupError> {
    let mut buf = [0u8; 1];
    for attempt in 1..=PROBE_ATTEMPTS {
        if let Ok(1) = bus.read(REG_OUTPUT_BASE, &mut buf).await {
            return Ok(());
        }
        if attempt == PROBE_ATTEMPTS {
            break;
        }
        log::info!("ping ? ({} left)", PROBE_ATTEMPTS - attempt);
        wait(delay, PROBE_BACKOFF).await;
    }

    log::error!("Controller not detected after {PROBE_ATTEMPTS} attempts");
    Err(BringupError::NotDetected)
}
