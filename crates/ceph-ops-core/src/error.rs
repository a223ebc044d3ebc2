use thiserror::Error;

/// The external data source could not produce a snapshot.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", exit_label(.code))]
    Status {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("unparseable output: {0}")]
    Parse(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

impl From<serde_json::Error> for DataSourceError {
    fn from(err: serde_json::Error) -> Self {
        DataSourceError::Parse(err.to_string())
    }
}
