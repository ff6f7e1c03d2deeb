//! The directory every logical resource is resolved under.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   assistants/<title>/{roleSetting.txt, KnowledgeBase/, History/}
//!   History/<id>.json
//!   <any other top-level directory>/
//! ```

use crate::error::{IoContext, Result, StoreError};
use crate::names::validate_name;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const ASSISTANTS_DIR: &str = "assistants";
pub const HISTORY_DIR: &str = "History";
pub const KNOWLEDGE_BASE_DIR: &str = "KnowledgeBase";
pub const ROLE_SETTING_FILE: &str = "roleSetting.txt";

#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open (creating if needed) the workspace rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).await.at(root)?;
        let root = fs::canonicalize(root).await.at(root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn assistants_dir(&self) -> PathBuf {
        self.root.join(ASSISTANTS_DIR)
    }

    pub(crate) fn assistant_dir(&self, title: &str) -> Result<PathBuf> {
        Ok(self.assistants_dir().join(validate_name(title)?))
    }

    /// Reject `path` unless its deepest existing ancestor resolves inside
    /// the root. Symlinks are followed.
    pub(crate) async fn ensure_contained(&self, path: &Path) -> Result<()> {
        let mut probe = path;
        loop {
            match fs::canonicalize(probe).await {
                Ok(real) if real.starts_with(&self.root) => return Ok(()),
                Ok(_) => break,
                Err(_) => match probe.parent() {
                    Some(parent) => probe = parent,
                    None => break,
                },
            }
        }
        Err(StoreError::Escape(path.display().to_string()))
    }
}
