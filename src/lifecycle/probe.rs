//! Connectivity probe
//!
//! Periodically opens a TCP connection to a well-known address and publishes
//! the result through the shared connectivity flag the dispatcher reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Writer of the `__internet_connection` flag
pub struct ConnectivityProbe {
    addr: String,
    period: Duration,
    flag: Arc<AtomicBool>,
}

impl ConnectivityProbe {
    pub fn new(addr: impl Into<String>, period: Duration, flag: Arc<AtomicBool>) -> Self {
        Self {
            addr: addr.into(),
            period,
            flag,
        }
    }

    /// Try one connection
    pub async fn check(&self) -> bool {
        matches!(
            timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        )
    }

    /// Probe once and store the result. Returns the new value.
    pub async fn refresh(&self) -> bool {
        let online = self.check().await;
        let was_online = self.flag.swap(online, Ordering::SeqCst);
        if was_online != online {
            info!(online, addr = %self.addr, "connectivity changed");
        } else {
            debug!(online, "connectivity unchanged");
        }
        online
    }

    /// Probe forever. The first probe runs immediately.
    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let flag = Arc::new(AtomicBool::new(false));
        let probe = ConnectivityProbe::new(addr, Duration::from_secs(1), Arc::clone(&flag));

        assert!(tokio_test::block_on(probe.refresh()));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_probe_unreachable() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let flag = Arc::new(AtomicBool::new(true));
        let probe = ConnectivityProbe::new(addr, Duration::from_secs(1), Arc::clone(&flag));

        assert!(!tokio_test::block_on(probe.refresh()));
        assert!(!flag.load(Ordering::SeqCst));
    }
}
