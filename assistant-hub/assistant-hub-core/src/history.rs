//! Chat history records: one `<id>.json` file per saved conversation.
//!
//! Records of the "Lets Chat" pseudo-assistant live in the root `History/`
//! directory; every other assistant keeps its own `assistants/<title>/History/`.
//! Record content is stored and returned verbatim and is never parsed.

use crate::error::{IoContext, Result, StoreError};
use crate::names::validate_name;
use crate::workspace::{Workspace, ASSISTANTS_DIR, HISTORY_DIR};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Assistant title whose history is kept at the workspace root.
pub const LETS_CHAT: &str = "Lets Chat";

const EMPTY_RECORD: &str = "{}";

/// Directory holding the history records of `assistant_title`.
pub fn resolve_history_dir(root: &Path, assistant_title: &str) -> Result<PathBuf> {
    if assistant_title == LETS_CHAT {
        Ok(root.join(HISTORY_DIR))
    } else {
        Ok(root
            .join(ASSISTANTS_DIR)
            .join(validate_name(assistant_title)?)
            .join(HISTORY_DIR))
    }
}

impl Workspace {
    async fn history_file(&self, assistant_title: &str, id: &str) -> Result<PathBuf> {
        let path = resolve_history_dir(self.root(), assistant_title)?
            .join(format!("{}.json", validate_name(id)?));
        self.ensure_contained(&path).await?;
        Ok(path)
    }

    /// File names of the `.json` records in the root `History/` directory.
    pub async fn list_root_history(&self) -> Result<Vec<String>> {
        let dir = self.root().join(HISTORY_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&dir, err)),
        };
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.at(&dir)? {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(true);
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_dir && Path::new(&name).extension().is_some_and(|ext| ext == "json") {
                out.push(name);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Create an empty `{}` record and return its id.
    pub async fn create_history(&self, assistant_title: &str) -> Result<String> {
        let dir = resolve_history_dir(self.root(), assistant_title)?;
        self.ensure_contained(&dir).await?;
        fs::create_dir_all(&dir).await.at(&dir)?;
        let id = Uuid::new_v4().to_string();
        let path = dir.join(format!("{id}.json"));
        fs::write(&path, EMPTY_RECORD).await.at(&path)?;
        debug!(path = %path.display(), "created history record");
        Ok(id)
    }

    /// Replace the record content with `context`, byte for byte.
    pub async fn update_history(&self, assistant_title: &str, id: &str, context: &str) -> Result<()> {
        let path = self.history_file(assistant_title, id).await?;
        fs::write(&path, context).await.at(&path)?;
        debug!(path = %path.display(), bytes = context.len(), "updated history record");
        Ok(())
    }

    pub async fn delete_history(&self, assistant_title: &str, id: &str) -> Result<()> {
        let path = self.history_file(assistant_title, id).await?;
        fs::remove_file(&path).await.at(&path)?;
        debug!(path = %path.display(), "deleted history record");
        Ok(())
    }

    pub async fn read_history(&self, assistant_title: &str, id: &str) -> Result<String> {
        let path = self.history_file(assistant_title, id).await?;
        let bytes = fs::read(&path).await.at(&path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn workspace() -> (tempfile::TempDir, Workspace) {
        let tempdir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tempdir.path()).await.unwrap();
        (tempdir, ws)
    }

    #[test]
    fn sentinel_title_resolves_to_root() {
        let root = Path::new("/srv/hub");
        assert_eq!(
            resolve_history_dir(root, LETS_CHAT).unwrap(),
            PathBuf::from("/srv/hub/History")
        );
        assert_eq!(
            resolve_history_dir(root, "Coder").unwrap(),
            PathBuf::from("/srv/hub/assistants/Coder/History")
        );
        assert!(resolve_history_dir(root, "../x").is_err());
        assert!(resolve_history_dir(root, "lets chat").is_ok_and(|p| p.ends_with("lets chat/History")));
    }

    #[tokio::test]
    async fn new_record_is_empty_object() {
        let (_dir, ws) = workspace().await;
        let id = ws.create_history(LETS_CHAT).await.unwrap();
        assert!(ws.root().join(HISTORY_DIR).join(format!("{id}.json")).is_file());
        assert_eq!(ws.read_history(LETS_CHAT, &id).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn assistant_records_live_under_assistant() {
        let (_dir, ws) = workspace().await;
        let id = ws.create_history("Coder").await.unwrap();
        let expected = ws
            .root()
            .join(ASSISTANTS_DIR)
            .join("Coder")
            .join(HISTORY_DIR)
            .join(format!("{id}.json"));
        assert!(expected.is_file());
        assert!(ws.list_root_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_stores_content_verbatim() {
        let (_dir, ws) = workspace().await;
        let id = ws.create_history(LETS_CHAT).await.unwrap();
        ws.update_history(LETS_CHAT, &id, "hello").await.unwrap();
        assert_eq!(ws.read_history(LETS_CHAT, &id).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn root_listing_only_reports_json_files() {
        let (_dir, ws) = workspace().await;
        assert!(ws.list_root_history().await.unwrap().is_empty());

        let id = ws.create_history(LETS_CHAT).await.unwrap();
        let history = ws.root().join(HISTORY_DIR);
        std::fs::write(history.join("notes.txt"), "x").unwrap();
        std::fs::create_dir(history.join("archive.json")).unwrap();

        assert_eq!(ws.list_root_history().await.unwrap(), vec![format!("{id}.json")]);
    }

    #[tokio::test]
    async fn delete_removes_record_once() {
        let (_dir, ws) = workspace().await;
        let id = ws.create_history("Coder").await.unwrap();
        ws.delete_history("Coder", &id).await.unwrap();
        let err = ws.delete_history("Coder", &id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = ws.read_history("Coder", &id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn record_ids_are_validated() {
        let (_dir, ws) = workspace().await;
        let err = ws.read_history(LETS_CHAT, "../roleSetting").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
