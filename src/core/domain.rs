use std::{fmt, str::FromStr};

/// One allocated, touched buffer held by the working set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    data: Vec<u8>,
}

impl Block {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Memory blocks dropped by a single retention step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Release {
    pub blocks: usize,
    pub bytes: usize,
}

/// Instantaneous heap counters as reported by the allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemStats {
    pub heap_alloc_bytes: u64,
    pub heap_sys_bytes: u64,
    pub num_gc: u64,
}

/// The report line written to stdout: `heap_alloc=<int>KB heap_sys=<int>KB num_gc=<int>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsLine {
    pub heap_alloc_kb: u64,
    pub heap_sys_kb: u64,
    pub num_gc: u64,
}

impl From<MemStats> for StatsLine {
    fn from(stats: MemStats) -> Self {
        Self {
            heap_alloc_kb: stats.heap_alloc_bytes / 1024,
            heap_sys_kb: stats.heap_sys_bytes / 1024,
            num_gc: stats.num_gc,
        }
    }
}

impl fmt::Display for StatsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "heap_alloc={}KB heap_sys={}KB num_gc={}",
            self.heap_alloc_kb, self.heap_sys_kb, self.num_gc
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StatsLineError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
    #[error("unexpected trailing input: {rest:?}")]
    TrailingInput { rest: String },
}

impl FromStr for StatsLine {
    type Err = StatsLineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let heap_alloc_kb = parse_field(fields.next(), "heap_alloc", "KB")?;
        let heap_sys_kb = parse_field(fields.next(), "heap_sys", "KB")?;
        let num_gc = parse_field(fields.next(), "num_gc", "")?;

        let rest: Vec<&str> = fields.collect();
        if !rest.is_empty() {
            return Err(StatsLineError::TrailingInput {
                rest: rest.join(" "),
            });
        }

        Ok(Self {
            heap_alloc_kb,
            heap_sys_kb,
            num_gc,
        })
    }
}

fn parse_field(
    token: Option<&str>,
    field: &'static str,
    unit: &str,
) -> Result<u64, StatsLineError> {
    let value = token
        .and_then(|t| t.strip_prefix(field))
        .and_then(|t| t.strip_prefix('='))
        .ok_or(StatsLineError::MissingField { field })?;

    value
        .strip_suffix(unit)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| StatsLineError::InvalidValue {
            field,
            value: value.to_string(),
        })
}
