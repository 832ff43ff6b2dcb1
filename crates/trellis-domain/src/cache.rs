use crate::client::DomainClient;
use crate::{BoardId, ListId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use trellis_core::{TrellisError, TrellisResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub boards: usize,
    pub lists: usize,
}

/// Local name↔ID lookup cache refreshed from the remote service.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Prepares local storage. Calling it more than once is harmless.
    async fn bootstrap(&self) -> TrellisResult<()>;

    /// Refreshes the cache from the remote service.
    async fn sync(&self) -> TrellisResult<SyncReport>;

    fn resolve_board(&self, name: &str) -> TrellisResult<BoardId>;

    fn resolve_list(&self, board_id: &str, name: &str) -> TrellisResult<ListId>;

    fn last_synced(&self) -> Option<DateTime<Utc>>;
}

#[derive(Default)]
struct CacheIndex {
    bootstrapped: bool,
    boards: Vec<(BoardId, String)>,
    lists: Vec<(BoardId, ListId, String)>,
    synced_at: Option<DateTime<Utc>>,
}

/// Cache kept in process memory for the lifetime of the dashboard.
pub struct MemoryCache {
    client: Arc<dyn DomainClient>,
    index: RwLock<CacheIndex>,
}

impl MemoryCache {
    pub fn new(client: Arc<dyn DomainClient>) -> Self {
        Self {
            client,
            index: RwLock::new(CacheIndex::default()),
        }
    }
}

fn resolve_unique<'a, I>(kind: &str, name: &str, candidates: I) -> TrellisResult<String>
where
    I: Iterator<Item = (&'a String, &'a String)>,
{
    let matches: Vec<&String> = candidates
        .filter(|(_, candidate)| candidate.eq_ignore_ascii_case(name))
        .map(|(id, _)| id)
        .collect();
    match matches.as_slice() {
        [] => Err(TrellisError::NotFound(format!("{} '{}'", kind, name))),
        [id] => Ok((*id).clone()),
        many => Err(TrellisError::Ambiguous {
            name: name.to_string(),
            candidates: many.len(),
        }),
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn bootstrap(&self) -> TrellisResult<()> {
        let mut index = self.index.write();
        if !index.bootstrapped {
            tracing::debug!("Bootstrapping name cache");
            index.bootstrapped = true;
        }
        Ok(())
    }

    async fn sync(&self) -> TrellisResult<SyncReport> {
        let boards = self.client.list_boards().await?;
        let mut lists = Vec::new();
        for board in &boards {
            for list in self.client.list_lists(&board.id).await? {
                lists.push((board.id.clone(), list.id, list.name));
            }
        }

        let report = SyncReport {
            boards: boards.len(),
            lists: lists.len(),
        };
        let mut index = self.index.write();
        index.boards = boards.into_iter().map(|b| (b.id, b.name)).collect();
        index.lists = lists;
        index.synced_at = Some(Utc::now());
        tracing::debug!(
            "Name cache synced: {} boards, {} lists",
            report.boards,
            report.lists
        );
        Ok(report)
    }

    fn resolve_board(&self, name: &str) -> TrellisResult<BoardId> {
        let index = self.index.read();
        resolve_unique("board", name, index.boards.iter().map(|(id, n)| (id, n)))
    }

    fn resolve_list(&self, board_id: &str, name: &str) -> TrellisResult<ListId> {
        let index = self.index.read();
        resolve_unique(
            "list",
            name,
            index
                .lists
                .iter()
                .filter(|(board, _, _)| board == board_id)
                .map(|(_, id, n)| (id, n)),
        )
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.index.read().synced_at
    }
}
