//! Debug Serial Host Simulator
//!
//! Runs the debug serial port on a host: a tokio task plays the UART's
//! transmit-ready interrupt, firing once per character time while armed, and
//! the transmitted bytes land on stdout.

use anyhow::Context;
use debug_serial::{BufferStats, ByteSink, DebugSerial, TxState, DEFAULT_CAPACITY};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod uart;

pub use config::{load_config, load_config_from, SimConfig, CONFIG_FILE};
pub use uart::TerminalUart;

/// Initialize logging on stderr, keeping stdout for the simulated wire
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Replay the firmware example on a simulated port writing to `out`
///
/// Returns the queue statistics once everything has been shifted out.
pub async fn run_demo<W>(config: &SimConfig, out: W) -> anyhow::Result<BufferStats>
where
    W: Write + Send + 'static,
{
    let port = Arc::new(DebugSerial::<_, DEFAULT_CAPACITY>::new(
        TerminalUart::new(out),
        config.serial.clock_hz,
    ));
    let settings = port
        .begin_config(&config.serial)
        .context("failed to configure debug serial")?;

    let period = (Duration::from_micros(settings.byte_time_us()) / config.speedup.max(1))
        .max(Duration::from_micros(1));
    debug!("Transmit-ready period {:?}", period);

    let (stop_tx, stop_rx) = watch::channel(false);
    let events = tokio::spawn(tx_ready_events(Arc::clone(&port), period, stop_rx));

    write_demo(port.as_ref());

    while port.state() == TxState::Draining {
        tokio::time::sleep(period).await;
    }
    let _ = stop_tx.send(true);
    events.await.context("transmit-ready task failed")?;

    let stats = port.stats();
    let json = serde_json::to_string(&stats)?;
    info!(stats = %json, "Transmission complete");
    Ok(stats)
}

/// Print the firmware's example output
pub fn write_demo<S: ByteSink, const C: usize>(port: &DebugSerial<S, C>) {
    port.print_line("Debug Serial Library Test");
    port.print_str("Integer: ");
    port.print_int_line(12345);
    port.print_str("Negative Integer: ");
    port.print_int_line(-6789);
    port.print_str("Float: ");
    port.print_float_line(3.14159, 3);
    port.print_str("No Decimals: ");
    port.print_float_line(42.718, 0);
}

/// Transmit-ready event source: one event per character time while armed
async fn tx_ready_events<S, const C: usize>(
    port: Arc<DebugSerial<S, C>>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) where
    S: ByteSink + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if port.state() == TxState::Draining {
                    port.on_tx_ready();
                }
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debug_serial::mock::{self, MockUart};
    use std::sync::Mutex;

    /// Output stream the test can read back after the port is gone
    #[derive(Clone, Default)]
    struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const EXPECTED: &str = "Debug Serial Library Test\r\n\
                            Integer: 12345\r\n\
                            Negative Integer: -6789\r\n\
                            Float: 3.141\r\n\
                            No Decimals: 42\r\n";

    #[tokio::test(start_paused = true)]
    async fn test_demo_output() {
        let output = SharedOutput::default();
        let stats = run_demo(&SimConfig::default(), output.clone())
            .await
            .unwrap();

        assert_eq!(String::from_utf8(output.0.lock().unwrap().clone()).unwrap(), EXPECTED);
        assert_eq!(stats.total_written, EXPECTED.len());
        assert_eq!(stats.total_dropped, 0);
        assert_eq!(stats.len, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_baud_fails() {
        let mut config = SimConfig::default();
        config.serial.baud = 0;

        let result = run_demo(&config, SharedOutput::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_uses_configured_clock() {
        let mut config = SimConfig::default();
        config.serial.clock_hz = 8_000_000;
        config.serial.baud = 4800;

        let output = SharedOutput::default();
        let stats = run_demo(&config, output.clone()).await.unwrap();

        assert_eq!(String::from_utf8(output.0.lock().unwrap().clone()).unwrap(), EXPECTED);
        assert_eq!(stats.total_dropped, 0);
    }

    #[test]
    fn test_demo_overflows_small_queue() {
        let port: DebugSerial<_, 32> =
            DebugSerial::new(MockUart::new(), 16_000_000);
        port.begin(9600).unwrap();

        write_demo(&port);

        assert!(port.is_full());
        assert_eq!(port.stats().total_dropped, EXPECTED.len() - 31);
        assert_eq!(mock::drain(&port), &EXPECTED.as_bytes()[..31]);
    }
}
