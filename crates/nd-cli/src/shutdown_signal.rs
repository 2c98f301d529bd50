use tokio::sync::watch;
use tracing::{error, info};

/// Resolves once SIGINT or SIGTERM has been received.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Listen for SIGINT/SIGTERM on a dedicated thread.
    pub fn install() -> Self {
        let (tx, rx) = watch::channel(false);

        #[cfg(unix)]
        std::thread::spawn(move || {
            use signal_hook::consts::{SIGINT, SIGTERM};
            use signal_hook::iterator::Signals;

            let mut signals = match Signals::new([SIGINT, SIGTERM]) {
                Ok(s) => s,
                Err(e) => {
                    error!("Failed to register signal handlers: {e}");
                    return;
                }
            };

            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}, shutting down...");
                let _ = tx.send(true);
            }
        });

        #[cfg(not(unix))]
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, shutting down...");
                    let _ = tx.send(true);
                }
                Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
            }
        });

        Self { rx }
    }

    /// A signal driven by the caller instead of the OS.
    pub fn manual() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub async fn wait(&mut self) {
        // Sender dropped without a signal: never resolve
        if self.rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
