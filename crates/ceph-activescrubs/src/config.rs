use anyhow::{bail, Result};
use ceph_ops_core::{CephCli, DEFAULT_IDLE_THRESHOLD};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "ceph-activescrubs")]
#[command(about = "Live view of placement groups that are scrubbing right now", long_about = None)]
pub struct Args {
    /// Path to the ceph CLI
    #[arg(long, env = "CEPH_BIN", default_value = "ceph")]
    pub ceph: String,

    /// Cluster name passed through as --cluster
    #[arg(long, env = "CEPH_CLUSTER")]
    pub cluster: Option<String>,

    /// ceph.conf passed through as --conf
    #[arg(short = 'c', long, env = "CEPH_CONF")]
    pub conf: Option<String>,

    /// Client id passed through as --id
    #[arg(long, env = "CEPH_ID")]
    pub id: Option<String>,

    /// Seconds between refreshes
    #[arg(
        short = 'n',
        long,
        env = "ACTIVESCRUBS_INTERVAL",
        default_value_t = 4.0
    )]
    pub interval: f64,

    /// Seconds between keyboard checks while waiting
    #[arg(long, default_value_t = 0.2)]
    pub poll_step: f64,

    /// Stalled refreshes a scrub stays listed before it is hidden
    #[arg(long, env = "ACTIVESCRUBS_IDLE_THRESHOLD", default_value_t = DEFAULT_IDLE_THRESHOLD)]
    pub idle_threshold: u32,

    /// Print one snapshot to stdout and exit
    #[arg(long)]
    pub once: bool,

    /// Write logs here instead of discarding them
    #[arg(long, env = "ACTIVESCRUBS_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub source: CephCli,
    pub interval: Duration,
    pub poll_step: Duration,
    pub idle_threshold: u32,
    pub once: bool,
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn into_config(self) -> Result<MonitorConfig> {
        let interval = seconds("--interval", self.interval)?;
        let poll_step = seconds("--poll-step", self.poll_step)?.min(interval);

        let mut source = CephCli::new(self.ceph);
        if let Some(cluster) = self.cluster {
            source = source.cluster(cluster);
        }
        if let Some(conf) = self.conf {
            source = source.conf(conf);
        }
        if let Some(id) = self.id {
            source = source.client_id(id);
        }

        Ok(MonitorConfig {
            source,
            interval,
            poll_step,
            idle_threshold: self.idle_threshold,
            once: self.once,
            log_file: self.log_file,
        })
    }
}

fn seconds(flag: &str, value: f64) -> Result<Duration> {
    if value <= 0.0 {
        bail!("{flag} must be a positive number of seconds, got {value}");
    }
    match Duration::try_from_secs_f64(value) {
        Ok(duration) => Ok(duration),
        Err(err) => bail!("{flag} is not a usable number of seconds ({value}): {err}"),
    }
}
