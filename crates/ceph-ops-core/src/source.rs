use crate::error::DataSourceError;
use crate::model::{Category, ItemId, ItemRecord, Snapshot};
use serde::Deserialize;
use serde_json::Value;
use std::process::Command;
use tracing::{debug, warn};

/// Anything that can produce the current set of monitored items.
pub trait SnapshotSource {
    fn fetch(&mut self) -> Result<Snapshot, DataSourceError>;
}

/// Lists scrubbing placement groups through the `ceph` CLI.
#[derive(Debug, Clone)]
pub struct CephCli {
    program: String,
    global_args: Vec<String>,
}

impl Default for CephCli {
    fn default() -> Self {
        Self::new("ceph")
    }
}

impl CephCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            global_args: Vec::new(),
        }
    }

    pub fn cluster(mut self, name: impl Into<String>) -> Self {
        self.global_args.push("--cluster".to_string());
        self.global_args.push(name.into());
        self
    }

    pub fn conf(mut self, path: impl Into<String>) -> Self {
        self.global_args.push("--conf".to_string());
        self.global_args.push(path.into());
        self
    }

    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.global_args.push("--id".to_string());
        self.global_args.push(id.into());
        self
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = self.global_args.clone();
        args.extend(
            ["pg", "ls", "scrubbing", "--format", "json"]
                .iter()
                .map(|s| s.to_string()),
        );
        args
    }

    fn rendered(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args());
        parts.join(" ")
    }
}

impl SnapshotSource for CephCli {
    fn fetch(&mut self) -> Result<Snapshot, DataSourceError> {
        let command = self.rendered();
        debug!(%command, "fetching scrub snapshot");
        let output = Command::new(&self.program)
            .args(self.args())
            .output()
            .map_err(|source| DataSourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DataSourceError::Status {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let snapshot = parse_pg_listing(&stdout)?;
        debug!(items = snapshot.len(), "scrub snapshot fetched");
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PgListing {
    Bare(Vec<Value>),
    Envelope {
        #[serde(default)]
        pg_stats: Vec<Value>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct PgStat {
    #[serde(default)]
    pgid: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    objects_scrubbed: u64,
    #[serde(default)]
    stat_sum: StatSum,
    #[serde(default)]
    acting_primary: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct StatSum {
    #[serde(default)]
    num_objects: u64,
}

impl PgStat {
    /// Field-by-field read for records whose shape serde rejects.
    fn lenient(value: &Value) -> Self {
        Self {
            pgid: value
                .get("pgid")
                .and_then(Value::as_str)
                .map(str::to_string),
            state: value
                .get("state")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            objects_scrubbed: value
                .get("objects_scrubbed")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            stat_sum: StatSum {
                num_objects: value
                    .pointer("/stat_sum/num_objects")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
            },
            acting_primary: value.get("acting_primary").and_then(Value::as_i64),
        }
    }
}

/// Parses `pg ls` JSON into a snapshot of scrubbing PGs.
///
/// Blank output is the CLI's way of saying nothing matched and yields an
/// empty snapshot. Individual records with missing or mistyped fields are
/// defaulted; only records without a usable `pgid` are dropped.
pub fn parse_pg_listing(raw: &str) -> Result<Snapshot, DataSourceError> {
    if raw.trim().is_empty() {
        return Ok(Snapshot::empty());
    }

    let records = match serde_json::from_str::<PgListing>(raw)? {
        PgListing::Envelope { pg_stats } => pg_stats,
        PgListing::Bare(records) => records,
    };

    let mut items = Vec::with_capacity(records.len());
    for value in records {
        let stat = serde_json::from_value::<PgStat>(value.clone()).unwrap_or_else(|err| {
            warn!(%err, "defaulting malformed pg record");
            PgStat::lenient(&value)
        });
        let Some(pgid) = stat.pgid.filter(|id| !id.trim().is_empty()) else {
            warn!("skipping pg record without pgid");
            continue;
        };
        if !stat.state.is_empty() && !stat.state.contains("scrubbing") {
            continue;
        }
        items.push(ItemRecord {
            id: ItemId::new(pgid),
            progress_counter: stat.objects_scrubbed,
            total_units: stat.stat_sum.num_objects,
            category: Category::from_pg_state(&stat.state),
            primary_osd: stat.acting_primary,
            visual_state: Default::default(),
        });
    }

    Ok(items.into_iter().collect())
}
