//! `.env` backed configuration for the canceler worker.
//!
//! The file is read once at startup. The worker connection and the batch
//! activity connection each get their own address / namespace / key so the
//! two can live in different namespaces.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{connection::ConnectionSettings, secret::ApiKey};

pub const CONFIG_FILE: &str = ".env";

pub const CANCELER_API_KEY: &str = "TEMPORAL_API_KEY_CANCELER";
pub const CANCELER_ADDRESS: &str = "TEMPORAL_CANCELER_ADDRESS";
pub const CANCELER_NAMESPACE: &str = "TEMPORAL_CANCELER_NAMESPACE";
pub const CANCELER_TASK_QUEUE: &str = "TEMPORAL_CANCELER_TASK_QUEUE";
pub const MAIN_API_KEY: &str = "TEMPORAL_API_KEY_MAIN";
pub const MAIN_ADDRESS: &str = "TEMPORAL_MAIN_ADDRESS";
pub const MAIN_NAMESPACE: &str = "TEMPORAL_MAIN_NAMESPACE";
pub const BATCH_OPERATION: &str = "TEMPORAL_BATCH_OPERATION";

pub const DEFAULT_ADDRESS: &str = "us-east-1.aws.api.temporal.io:7233";
pub const DEFAULT_CANCELER_NAMESPACE: &str = "canceler-test.a2dd6";
pub const DEFAULT_TASK_QUEUE: &str = "batch-queue";
pub const DEFAULT_BATCH_OPERATION: BatchOperationKind = BatchOperationKind::Terminate;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: expected KEY=value", .path.display())]
    Parse { path: PathBuf, line: usize },

    #[error("{0} not found in config file")]
    MissingKey(&'static str),

    #[error("invalid value {value:?} for {key}; expected one of: cancel, terminate")]
    InvalidValue { key: &'static str, value: String },
}

/// Action applied by the batch job to every matched execution.
///
/// Terminate is immediate; cancel asks each workflow to wind down
/// cooperatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperationKind {
    Cancel,
    Terminate,
}

impl BatchOperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchOperationKind::Cancel => "cancel",
            BatchOperationKind::Terminate => "terminate",
        }
    }
}

impl fmt::Display for BatchOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchOperationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cancel" => Ok(BatchOperationKind::Cancel),
            "terminate" => Ok(BatchOperationKind::Terminate),
            _ => Err(ConfigError::InvalidValue {
                key: BATCH_OPERATION,
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CancelerConfig {
    /// Connection the worker polls `task_queue` on.
    pub worker: ConnectionSettings,
    pub task_queue: String,
    /// Connection the batch operation is issued against. Its namespace is
    /// also the namespace the batch job runs in.
    pub target: ConnectionSettings,
    pub operation: BatchOperationKind,
}

impl CancelerConfig {
    /// Load `.env` from the current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_path(CONFIG_FILE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let pairs = parse_pairs(&contents).map_err(|line| ConfigError::Parse {
            path: path.to_path_buf(),
            line,
        })?;
        Self::from_pairs(pairs)
    }

    /// Build from already-parsed key/value pairs. Later duplicates win;
    /// unrecognized keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let lookup = Lookup(&values);

        let worker = ConnectionSettings {
            address: lookup.or_default(CANCELER_ADDRESS, DEFAULT_ADDRESS),
            namespace: lookup.or_default(CANCELER_NAMESPACE, DEFAULT_CANCELER_NAMESPACE),
            api_key: ApiKey::new(lookup.required(CANCELER_API_KEY)?),
        };
        let target = ConnectionSettings {
            address: lookup.or_default(MAIN_ADDRESS, DEFAULT_ADDRESS),
            namespace: lookup.required(MAIN_NAMESPACE)?,
            api_key: ApiKey::new(lookup.required(MAIN_API_KEY)?),
        };
        let operation = match lookup.optional(BATCH_OPERATION) {
            Some(raw) => raw.parse()?,
            None => DEFAULT_BATCH_OPERATION,
        };

        Ok(Self {
            worker,
            task_queue: lookup.or_default(CANCELER_TASK_QUEUE, DEFAULT_TASK_QUEUE),
            target,
            operation,
        })
    }
}

/// Parse `KEY=value` lines. Blank lines and lines starting with `#` or `!`
/// are skipped. Whitespace around the key and before the value is dropped;
/// the rest of the line is the value, verbatim. No quoting, no inline
/// comments, no `$` expansion. On error returns the 1-based line number.
pub fn parse_pairs(contents: &str) -> Result<Vec<(String, String)>, usize> {
    let mut pairs = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or(idx + 1)?;
        let key = key.trim_end();
        if key.is_empty() {
            return Err(idx + 1);
        }
        pairs.push((key.to_owned(), value.trim_start().to_owned()));
    }
    Ok(pairs)
}

struct Lookup<'a>(&'a HashMap<String, String>);

impl Lookup<'_> {
    /// Blank values count as absent.
    fn optional(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::MissingKey(key))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_owned())
    }
}
