use crate::core::TicketStore;
use crate::domain::model::{NewTicket, Ticket, TicketSummary, ValidatedResourceSet};
use crate::utils::error::{Result, TrackerError};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const TICKETS_FILE: &str = "tickets.json";
pub const LOCK_FILE: &str = "tickets.json.lock";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TicketFile {
    next_id: u64,
    tickets: Vec<Ticket>,
}

/// 持有期間獨佔資料目錄，跨行程有效
struct DirLock {
    file: File,
}

impl DirLock {
    fn acquire(base_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(base_path.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// 以單一 JSON 檔保存所有 ticket；每次操作都在目錄鎖內整檔讀寫，
/// 寫入先落到同目錄的暫存檔再 rename 取代
#[derive(Debug, Clone)]
pub struct JsonFileTicketStore {
    base_path: String,
}

impl JsonFileTicketStore {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        Path::new(&self.base_path).join(TICKETS_FILE)
    }

    fn load(path: &Path) -> Result<TicketFile> {
        match std::fs::read(path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TicketFile {
                next_id: 1,
                tickets: Vec::new(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn store(path: &Path, file: &TicketFile) -> Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, file)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| TrackerError::IoError(e.error))?;
        Ok(())
    }

    /// 在目錄鎖內讀取、套用 `op`，`write` 為 true 時寫回
    async fn transact<T, F>(&self, write: bool, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut TicketFile) -> Result<T> + Send + 'static,
    {
        let base_path = PathBuf::from(&self.base_path);
        let path = self.file_path();

        tokio::task::spawn_blocking(move || {
            let _lock = DirLock::acquire(&base_path)?;
            let mut file = Self::load(&path)?;
            let value = op(&mut file)?;
            if write {
                Self::store(&path, &file)?;
            }
            Ok(value)
        })
        .await
        .map_err(|e| TrackerError::IoError(std::io::Error::other(e)))?
    }
}

fn validate_new_ticket(ticket: &NewTicket) -> Result<()> {
    if ticket.topic.trim().is_empty() || ticket.resources.is_empty() {
        return Err(TrackerError::ValidationError {
            message: "A ticket requires a topic and at least one resource".to_string(),
        });
    }
    Ok(())
}

/// 把生成結果存成 ticket；沒有任何可用資源時不存，回傳 `None`
pub async fn save_validated<S: TicketStore>(
    store: &S,
    user_id: u64,
    topic: &str,
    validated: &ValidatedResourceSet,
) -> Result<Option<u64>> {
    if validated.is_empty() {
        tracing::warn!("⚠️ No reachable resources for '{}', ticket not saved", topic);
        return Ok(None);
    }

    let id = store
        .save_ticket(user_id, NewTicket::from_validated(topic, validated))
        .await?;
    Ok(Some(id))
}

impl TicketStore for JsonFileTicketStore {
    async fn save_ticket(&self, user_id: u64, ticket: NewTicket) -> Result<u64> {
        validate_new_ticket(&ticket)?;

        let id = self
            .transact(true, move |file| {
                let id = file.next_id.max(1);
                file.next_id = id + 1;
                file.tickets.push(Ticket {
                    id,
                    user_id,
                    topic: ticket.topic,
                    created_at: Utc::now(),
                    completed: false,
                    resources: ticket.resources,
                });
                Ok(id)
            })
            .await?;

        tracing::debug!("Saved ticket {} for user {}", id, user_id);
        Ok(id)
    }

    async fn list_tickets(&self, user_id: u64) -> Result<Vec<TicketSummary>> {
        self.transact(false, move |file| {
            let mut tickets: Vec<&Ticket> = file
                .tickets
                .iter()
                .filter(|ticket| ticket.user_id == user_id)
                .collect();
            // 新的在前
            tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            Ok(tickets.into_iter().map(TicketSummary::from).collect())
        })
        .await
    }

    async fn get_ticket(&self, user_id: u64, ticket_id: u64) -> Result<Ticket> {
        self.transact(false, move |file| {
            file.tickets
                .iter()
                .find(|ticket| ticket.id == ticket_id && ticket.user_id == user_id)
                .cloned()
                .ok_or(TrackerError::TicketNotFound { id: ticket_id })
        })
        .await
    }

    async fn toggle_completed(&self, user_id: u64, ticket_id: u64) -> Result<Ticket> {
        let updated = self
            .transact(true, move |file| {
                let ticket = file
                    .tickets
                    .iter_mut()
                    .find(|ticket| ticket.id == ticket_id && ticket.user_id == user_id)
                    .ok_or(TrackerError::TicketNotFound { id: ticket_id })?;
                ticket.completed = !ticket.completed;
                Ok(ticket.clone())
            })
            .await?;

        tracing::debug!("Ticket {} completed={}", ticket_id, updated.completed);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StoredResource;
    use tempfile::TempDir;

    fn new_ticket(topic: &str) -> NewTicket {
        NewTicket {
            topic: topic.to_string(),
            resources: vec![StoredResource {
                kind: "記事".to_string(),
                title: "Intro".to_string(),
                url: "https://ok.example".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_save_and_get_ticket() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());

        let id = store.save_ticket(1, new_ticket("Rust")).await.unwrap();
        let ticket = store.get_ticket(1, id).await.unwrap();

        assert_eq!(ticket.topic, "Rust");
        assert!(!ticket.completed);
        assert_eq!(ticket.resources.len(), 1);
        assert!(store.file_path().exists());
    }

    #[tokio::test]
    async fn test_ticket_requires_topic_and_resources() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());

        let no_resources = NewTicket {
            topic: "Rust".to_string(),
            resources: vec![],
        };
        assert!(matches!(
            store.save_ticket(1, no_resources).await,
            Err(TrackerError::ValidationError { .. })
        ));
        assert!(matches!(
            store.save_ticket(1, new_ticket(" ")).await,
            Err(TrackerError::ValidationError { .. })
        ));
        assert!(!store.file_path().exists());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_owner_scoped() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());

        let first = store.save_ticket(1, new_ticket("Rust")).await.unwrap();
        let second = store.save_ticket(1, new_ticket("SQL")).await.unwrap();
        store.save_ticket(2, new_ticket("Go")).await.unwrap();

        let tickets = store.list_tickets(1).await.unwrap();

        assert_eq!(
            tickets.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![second, first]
        );
        assert!(matches!(
            store.get_ticket(2, first).await,
            Err(TrackerError::TicketNotFound { id }) if id == first
        ));
    }

    #[tokio::test]
    async fn test_toggle_completed_flips_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());
        let id = store.save_ticket(1, new_ticket("Rust")).await.unwrap();

        assert!(store.toggle_completed(1, id).await.unwrap().completed);

        let reopened = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());
        assert!(reopened.get_ticket(1, id).await.unwrap().completed);
        assert!(!reopened.toggle_completed(1, id).await.unwrap().completed);
        assert!(matches!(
            reopened.toggle_completed(1, 99).await,
            Err(TrackerError::TicketNotFound { id: 99 })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_through_two_stores_keep_every_ticket() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_str().unwrap().to_string();
        let stores = [
            JsonFileTicketStore::new(path.clone()),
            JsonFileTicketStore::new(path),
        ];

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = stores[i % 2].clone();
                tokio::spawn(async move {
                    store
                        .save_ticket(1, new_ticket(&format!("topic {}", i)))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 20);
        assert_eq!(stores[0].list_tickets(1).await.unwrap().len(), 20);
        assert_eq!(stores[1].list_tickets(1).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileTicketStore::new(temp_dir.path().to_str().unwrap());
        std::fs::write(store.file_path(), b"not json").unwrap();

        assert!(matches!(
            store.list_tickets(1).await,
            Err(TrackerError::SerializationError(_))
        ));
    }
}
