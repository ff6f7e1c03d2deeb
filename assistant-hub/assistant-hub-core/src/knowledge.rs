//! Knowledge bases: uploaded files under an assistant, plus free-standing
//! top-level directories that group files outside the assistant model.

use crate::error::{IoContext, Result, StoreError};
use crate::names::{validate_file_name, validate_name, validate_relative};
use crate::workspace::{Workspace, ASSISTANTS_DIR, KNOWLEDGE_BASE_DIR};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Coarse file category inferred from the extension.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Unknown,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png" | "gif") => FileKind::Image,
            Some("mp4" | "mkv" | "avi") => FileKind::Video,
            Some("mp3" | "wav" | "aac") => FileKind::Audio,
            Some("pdf" | "doc" | "docx" | "txt") => FileKind::Document,
            _ => FileKind::Unknown,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FileEntry {
    pub name: String,
    pub kind: FileKind,
    /// Modification time; the filesystem keeps no portable creation time.
    pub modified: DateTime<Utc>,
}

impl FileEntry {
    /// `modified` as RFC 3339 in UTC with whole seconds, e.g. `2024-05-01T12:00:00Z`.
    pub fn modified_rfc3339(&self) -> String {
        self.modified.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Destination of a streamed upload. Bytes are written as they arrive, so
/// an interrupted upload leaves a truncated file behind.
pub struct UploadWriter {
    path: PathBuf,
    file: File,
    written: u64,
}

impl UploadWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await.at(&self.path)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush to disk and return the number of bytes stored.
    pub async fn finish(mut self) -> Result<u64> {
        self.file.flush().await.at(&self.path)?;
        debug!(path = %self.path.display(), bytes = self.written, "stored upload");
        Ok(self.written)
    }
}

fn reject_reserved(name: &str) -> Result<&str> {
    if name == ASSISTANTS_DIR {
        Err(StoreError::Reserved(name.to_string()))
    } else {
        Ok(name)
    }
}

impl Workspace {
    /// Make sure `assistants/<title>/KnowledgeBase` exists.
    pub async fn ensure_knowledge_base(&self, title: &str) -> Result<PathBuf> {
        let dir = self.assistant_dir(title)?.join(KNOWLEDGE_BASE_DIR);
        self.ensure_contained(&dir).await?;
        fs::create_dir_all(&dir).await.at(&dir)?;
        Ok(dir)
    }

    /// Open `KnowledgeBase/<file name>` of an assistant for writing,
    /// truncating any existing file. Only the final component of
    /// `file_name` is used.
    pub async fn create_upload(&self, title: &str, file_name: &str) -> Result<UploadWriter> {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidName(file_name.to_string()))?;
        let path = self
            .assistant_dir(title)?
            .join(KNOWLEDGE_BASE_DIR)
            .join(validate_file_name(base)?);
        self.ensure_contained(&path).await?;
        let file = File::create(&path).await.at(&path)?;
        Ok(UploadWriter {
            path,
            file,
            written: 0,
        })
    }

    pub async fn create_directory(&self, name: &str) -> Result<()> {
        let path = self.root().join(reject_reserved(validate_name(name)?)?);
        self.ensure_contained(&path).await?;
        fs::create_dir(&path).await.at(&path)?;
        debug!(path = %path.display(), "created directory");
        Ok(())
    }

    /// Top-level directories other than `assistants`, sorted by name.
    pub async fn list_directories(&self) -> Result<Vec<String>> {
        let root = self.root();
        let mut entries = fs::read_dir(root).await.at(root)?;
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.at(root)? {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_dir && name != ASSISTANTS_DIR {
                out.push(name);
            }
        }
        out.sort();
        Ok(out)
    }

    /// Remove a top-level directory tree. Missing directories are not an error.
    pub async fn delete_directory(&self, name: &str) -> Result<()> {
        let path = self.root().join(reject_reserved(validate_name(name)?)?);
        self.ensure_contained(&path).await?;
        match fs::remove_dir_all(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted directory");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(&path, err)),
        }
    }

    pub async fn rename_directory(&self, current: &str, new: &str) -> Result<()> {
        let from = self.root().join(reject_reserved(validate_name(current)?)?);
        let to = self.root().join(reject_reserved(validate_name(new)?)?);
        self.ensure_contained(&from).await?;
        self.ensure_contained(&to).await?;
        if from != to && fs::try_exists(&to).await.at(&to)? {
            return Err(StoreError::AlreadyExists(to.display().to_string()));
        }
        fs::rename(&from, &to).await.at(&from)?;
        debug!(from = %from.display(), to = %to.display(), "renamed directory");
        Ok(())
    }

    /// Files directly inside `<root>/<relative>`. Subdirectories and entries
    /// whose metadata cannot be read are skipped.
    pub async fn list_files(&self, relative: &str) -> Result<Vec<FileEntry>> {
        let dir = self.root().join(validate_relative(relative)?);
        self.ensure_contained(&dir).await?;
        let mut entries = fs::read_dir(&dir).await.at(&dir)?;
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.at(&dir)? {
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if meta.is_dir() {
                continue;
            }
            let Ok(modified) = meta.modified() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            out.push(FileEntry {
                kind: FileKind::from_name(&name),
                name,
                modified: DateTime::<Utc>::from(modified),
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
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
    fn kinds_follow_extension_table() {
        assert_eq!(FileKind::from_name("photo.jpg"), FileKind::Image);
        assert_eq!(FileKind::from_name("PHOTO.PNG"), FileKind::Image);
        assert_eq!(FileKind::from_name("clip.mkv"), FileKind::Video);
        assert_eq!(FileKind::from_name("song.aac"), FileKind::Audio);
        assert_eq!(FileKind::from_name("paper.docx"), FileKind::Document);
        assert_eq!(FileKind::from_name("archive.zip"), FileKind::Unknown);
        assert_eq!(FileKind::from_name("README"), FileKind::Unknown);
    }

    #[test]
    fn timestamps_render_as_utc_seconds() {
        let entry = FileEntry {
            name: "a.txt".into(),
            kind: FileKind::Document,
            modified: DateTime::from_timestamp(1_714_564_800, 123_000_000).unwrap(),
        };
        assert_eq!(entry.modified_rfc3339(), "2024-05-01T12:00:00Z");
    }

    #[tokio::test]
    async fn upload_streams_into_knowledge_base() {
        let (_dir, ws) = workspace().await;
        ws.ensure_knowledge_base("X").await.unwrap();
        let mut writer = ws.create_upload("X", "photo.jpg").await.unwrap();
        assert!(writer.path().ends_with("X/KnowledgeBase/photo.jpg"));
        writer.write_chunk(b"\xff\xd8").await.unwrap();
        writer.write_chunk(b"\xff\xe0").await.unwrap();
        assert_eq!(writer.finish().await.unwrap(), 4);

        let files = ws.list_files("assistants/X/KnowledgeBase").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "photo.jpg");
        assert_eq!(files[0].kind, FileKind::Image);
    }

    #[tokio::test]
    async fn upload_overwrites_and_strips_directories() {
        let (_dir, ws) = workspace().await;
        ws.ensure_knowledge_base("X").await.unwrap();
        for body in [&b"first version"[..], &b"v2"[..]] {
            let mut writer = ws.create_upload("X", "C:/Users/me/notes.txt").await.unwrap();
            writer.write_chunk(body).await.unwrap();
            writer.finish().await.unwrap();
        }
        let stored = ws
            .root()
            .join("assistants")
            .join("X")
            .join(KNOWLEDGE_BASE_DIR)
            .join("notes.txt");
        assert_eq!(std::fs::read(stored).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn upload_rejects_bad_file_names() {
        let (_dir, ws) = workspace().await;
        ws.ensure_knowledge_base("X").await.unwrap();
        assert!(ws.create_upload("X", "..").await.is_err());
        assert!(ws.create_upload("X", ".env").await.is_err());
        assert!(ws.create_upload("X", "tab\t.txt").await.is_err());
    }

    #[tokio::test]
    async fn upload_keeps_punctuated_file_names() {
        let (_dir, ws) = workspace().await;
        ws.ensure_knowledge_base("X").await.unwrap();
        for name in ["photo@2x.png", "invoice#12.pdf", "Q1 [final].docx", "50%.txt"] {
            let writer = ws.create_upload("X", name).await.unwrap();
            assert!(writer.path().ends_with(name));
            writer.finish().await.unwrap();
        }
        let files = ws.list_files("assistants/X/KnowledgeBase").await.unwrap();
        assert_eq!(files.len(), 4);
        let photo = files.iter().find(|f| f.name == "photo@2x.png").unwrap();
        assert_eq!(photo.kind, FileKind::Image);
    }

    #[tokio::test]
    async fn directory_lifecycle() {
        let (_dir, ws) = workspace().await;
        ws.create_assistant("someone", "").await.unwrap();
        ws.create_directory("Research").await.unwrap();
        assert_eq!(ws.list_directories().await.unwrap(), vec!["Research".to_string()]);

        let err = ws.create_directory("Research").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        ws.rename_directory("Research", "Papers").await.unwrap();
        assert_eq!(ws.list_directories().await.unwrap(), vec!["Papers".to_string()]);

        ws.delete_directory("Papers").await.unwrap();
        ws.delete_directory("Papers").await.unwrap();
        assert!(ws.list_directories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reserved_directory_cannot_be_touched() {
        let (_dir, ws) = workspace().await;
        ws.create_assistant("keep", "").await.unwrap();
        for result in [
            ws.delete_directory(ASSISTANTS_DIR).await,
            ws.rename_directory(ASSISTANTS_DIR, "other").await,
            ws.create_directory(ASSISTANTS_DIR).await,
        ] {
            assert!(matches!(result, Err(StoreError::Reserved(_))));
        }
        assert_eq!(ws.list_assistants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_files_skips_directories() {
        let (_dir, ws) = workspace().await;
        ws.create_directory("Docs").await.unwrap();
        let docs = ws.root().join("Docs");
        std::fs::write(docs.join("a.pdf"), "pdf").unwrap();
        std::fs::write(docs.join("b.wav"), "wav").unwrap();
        std::fs::create_dir(docs.join("nested")).unwrap();

        let files = ws.list_files("Docs").await.unwrap();
        let names: Vec<_> = files.iter().map(|f| (f.name.as_str(), f.kind)).collect();
        assert_eq!(names, vec![("a.pdf", FileKind::Document), ("b.wav", FileKind::Audio)]);
    }

    #[tokio::test]
    async fn list_files_of_missing_directory_is_not_found() {
        let (_dir, ws) = workspace().await;
        let err = ws.list_files("Nowhere").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = ws.list_files("../..").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }
}
