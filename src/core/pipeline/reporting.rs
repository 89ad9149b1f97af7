use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::core::{
    domain::StatsLine,
    traits::stats::{RuntimeStats, StatsError},
};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("failed to write report line: {0}")]
    Output(#[from] std::io::Error),
}

/// Writes one stats line per call, read fresh from the runtime each time.
#[derive(Debug)]
pub struct Reporter<W> {
    stats: Arc<dyn RuntimeStats>,
    out: W,
}

impl<W: AsyncWrite + Unpin> Reporter<W> {
    pub fn new(stats: Arc<dyn RuntimeStats>, out: W) -> Self {
        Self { stats, out }
    }

    pub async fn announce(&mut self, banner: &str) -> Result<(), ReportError> {
        self.write_line(banner).await
    }

    pub async fn report(&mut self) -> Result<StatsLine, ReportError> {
        let stats = self.stats.snapshot()?;
        tracing::debug!(?stats, "read runtime stats");

        let line = StatsLine::from(stats);
        self.write_line(&line.to_string()).await?;
        Ok(line)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), ReportError> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }
}
