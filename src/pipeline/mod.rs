pub mod publish;
pub mod tasks;

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no fresh spectrum within {waited:?} (still at generation {last_seen})")]
    Stale { last_seen: u64, waited: Duration },
    #[error("peer task panicked while holding the spectrum lock")]
    PeerDied,
    #[error("task spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}
