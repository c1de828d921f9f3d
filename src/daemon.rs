//! Scheduled filter passes.
//!
//! Reloads the killfile and runs the filter job at a fixed interval until
//! SIGINT or SIGTERM. Passes run one after another from a single loop, so
//! they never overlap.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::app::AppContext;
use crate::config::ConfigError;
use crate::filter::FilterService;
use crate::rules::RuleRepository;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Seconds between passes (default: 1800 = 30 minutes)
    pub interval_secs: u64,
    /// Whether to run a pass immediately on start
    pub run_on_start: bool,
    /// Only log what would be marked read
    pub simulation: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            run_on_start: true,
            simulation: false,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "30s", "15m", "6h", "1d" or raw seconds
    pub fn parse_interval(s: &str) -> Result<u64, ConfigError> {
        let s = s.trim().to_lowercase();
        let invalid = || ConfigError::InvalidInterval(s.clone());

        let (digits, unit) = match s.char_indices().last() {
            Some((idx, c)) if c.is_ascii_alphabetic() => (&s[..idx], c),
            _ => (s.as_str(), 's'),
        };
        let multiplier = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            _ => return Err(invalid()),
        };

        let secs = digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .ok_or_else(invalid)?;
        if secs == 0 {
            return Err(invalid());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

pub struct Daemon {
    ctx: AppContext,
    service: FilterService,
    config: DaemonConfig,
}

impl Daemon {
    pub fn new(ctx: AppContext, config: DaemonConfig) -> Self {
        let service = FilterService::new(ctx.client.clone(), RuleRepository::new());
        Self {
            ctx,
            service,
            config,
        }
    }

    pub async fn run(&mut self) -> crate::app::Result<()> {
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        info!(
            interval = %DaemonConfig::format_interval(self.config.interval_secs),
            simulation = self.config.simulation,
            killfile = %self.ctx.killfile,
            "sidekick daemon started"
        );

        if self.config.run_on_start {
            self.run_pass().await;
        }

        let mut timer = interval(Duration::from_secs(self.config.interval_secs));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // first tick completes immediately

        loop {
            tokio::select! {
                _ = timer.tick() => self.run_pass().await,
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!(error = %e, "failed to listen for shutdown signals");
                    }
                    break;
                }
            }
        }

        info!("daemon shutting down");
        Ok(())
    }

    /// Reload the killfile, then run one pass. Errors are logged.
    async fn run_pass(&mut self) {
        let start = Utc::now();

        self.service
            .reload_rules(&self.ctx.killfile, &self.ctx.http)
            .await;

        match self.service.run_filter_job(self.config.simulation).await {
            Ok(summary) => {
                let elapsed = Utc::now().signed_duration_since(start);
                info!(
                    killed = summary.entries_killed,
                    failed_feeds = summary.feeds_failed,
                    elapsed_secs = elapsed.num_milliseconds() as f64 / 1000.0,
                    "scheduled pass complete"
                );
            }
            Err(e) => error!(error = %e, "scheduled pass aborted"),
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
