//! Assistants: `assistants/<title>/` holding a role setting and a knowledge base.

use crate::error::{IoContext, Result, StoreError};
use crate::workspace::{Workspace, KNOWLEDGE_BASE_DIR, ROLE_SETTING_FILE};
use serde::Serialize;
use tokio::fs;
use tracing::debug;

pub const AVATAR: &str = "🤖";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AssistantSummary {
    pub title: String,
    pub avatar: String,
}

impl Workspace {
    /// Create the assistant directory with an empty knowledge base and write
    /// its role setting. Creating an existing assistant overwrites the role
    /// setting.
    pub async fn create_assistant(&self, title: &str, role_setting: &str) -> Result<()> {
        let dir = self.assistant_dir(title)?;
        self.ensure_contained(&dir).await?;
        let kb = dir.join(KNOWLEDGE_BASE_DIR);
        fs::create_dir_all(&kb).await.at(&kb)?;
        let file = dir.join(ROLE_SETTING_FILE);
        fs::write(&file, role_setting).await.at(&file)?;
        debug!(path = %dir.display(), "created assistant");
        Ok(())
    }

    /// Overwrite the role setting of an existing assistant.
    pub async fn update_role_setting(&self, title: &str, role_setting: &str) -> Result<()> {
        let file = self.assistant_dir(title)?.join(ROLE_SETTING_FILE);
        self.ensure_contained(&file).await?;
        fs::write(&file, role_setting).await.at(&file)?;
        debug!(path = %file.display(), "updated role setting");
        Ok(())
    }

    pub async fn role_setting(&self, title: &str) -> Result<String> {
        let file = self.assistant_dir(title)?.join(ROLE_SETTING_FILE);
        self.ensure_contained(&file).await?;
        let bytes = fs::read(&file).await.at(&file)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn rename_assistant(&self, current: &str, new: &str) -> Result<()> {
        let from = self.assistant_dir(current)?;
        let to = self.assistant_dir(new)?;
        self.ensure_contained(&from).await?;
        self.ensure_contained(&to).await?;
        if from != to && fs::try_exists(&to).await.at(&to)? {
            return Err(StoreError::AlreadyExists(to.display().to_string()));
        }
        fs::rename(&from, &to).await.at(&from)?;
        debug!(from = %from.display(), to = %to.display(), "renamed assistant");
        Ok(())
    }

    /// Remove the assistant and everything under it. Removing an assistant
    /// that does not exist succeeds.
    pub async fn delete_assistant(&self, title: &str) -> Result<()> {
        let dir = self.assistant_dir(title)?;
        self.ensure_contained(&dir).await?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(path = %dir.display(), "deleted assistant");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(&dir, err)),
        }
    }

    /// Every directory under `assistants/`, sorted by title.
    pub async fn list_assistants(&self) -> Result<Vec<AssistantSummary>> {
        let dir = self.assistants_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&dir, err)),
        };
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.at(&dir)? {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                out.push(AssistantSummary {
                    title: entry.file_name().to_string_lossy().into_owned(),
                    avatar: AVATAR.to_string(),
                });
            }
        }
        out.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(out)
    }
}
