use tracing::info;

use crate::app::context::killfile_http_client;
use crate::app::{AppContext, Result, SidekickError};
use crate::config::Config;
use crate::daemon::{Daemon, DaemonConfig};
use crate::filter::JobSummary;
use crate::rules::parse_killfile;

pub async fn run(ctx: &AppContext, simulate: bool) -> Result<JobSummary> {
    ctx.verify_credentials().await?;

    let service = ctx.filter_service().await;
    if service.rules().is_empty() {
        info!(killfile = %ctx.killfile, "no rules loaded, nothing to do");
        return Ok(JobSummary::default());
    }

    let summary = service.run_filter_job(simulate).await?;
    if simulate {
        println!(
            "{} entries would be marked as read ({} feeds checked)",
            summary.entries_killed, summary.feeds_checked
        );
    } else {
        println!(
            "Marked {} entries as read ({} feeds checked)",
            summary.entries_killed, summary.feeds_checked
        );
    }
    Ok(summary)
}

pub async fn daemon(
    ctx: AppContext,
    config: &Config,
    interval: Option<&str>,
    run_on_start: bool,
    simulation: bool,
) -> Result<()> {
    let interval = interval.unwrap_or(config.refresh_interval());
    let daemon_config = DaemonConfig {
        interval_secs: DaemonConfig::parse_interval(interval)?,
        run_on_start,
        simulation,
    };

    ctx.verify_credentials().await?;
    Daemon::new(ctx, daemon_config).run().await
}

/// Parses the killfile without contacting Miniflux.
pub async fn check(config: &Config) -> Result<()> {
    let source = config.killfile_source()?;
    let text = source.read(&killfile_http_client()?).await?;
    let (rules, rejected) = parse_killfile(&text);

    for rule in &rules {
        println!("{}", rule);
    }
    for r in &rejected {
        eprintln!("{}:{}: {}: {}", source, r.line_number, r.error, r.line);
    }

    println!("\n{} rules, {} rejected lines", rules.len(), rejected.len());

    if rejected.is_empty() {
        Ok(())
    } else {
        Err(SidekickError::InvalidKillfile(rejected.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_for(path: &std::path::Path) -> Config {
        Config {
            killfile_path: Some(path.to_path_buf()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_check_valid_killfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"ignore-article * "title # Moon""#).unwrap();

        assert!(check(&config_for(file.path())).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_reports_rejected_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"ignore-article * "title # Moon""#).unwrap();
        writeln!(file, "not a rule").unwrap();

        assert!(matches!(
            check(&config_for(file.path())).await,
            Err(SidekickError::InvalidKillfile(1))
        ));
    }

    #[tokio::test]
    async fn test_check_missing_killfile() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("nope"));

        assert!(matches!(check(&config).await, Err(SidekickError::Io(_))));
    }
}
