//! `.eln` archive packaging
//!
//! An author tree `export-*/author-<id>/` is zipped with entry names relative
//! to the export root, so the archive's single top-level directory is
//! `author-<id>/`. Entries are added in sorted path order with a fixed
//! timestamp and fixed permissions, so the same tree always yields the same
//! bytes.

use crate::core::crate_graph::CrateDocument;
use crate::domain::{AuthorId, ElnError, PackageError, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Graph document file name at the author root
pub const METADATA_FILE_NAME: &str = "ro-crate-metadata.json";

/// Extension of the final archive
pub const ELN_EXTENSION: &str = "eln";

/// Lays out author trees under an export root and packages them
#[derive(Debug, Clone)]
pub struct ArchivePackager {
    export_root: PathBuf,
}

impl ArchivePackager {
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
        }
    }

    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    /// `<export_root>/author-<id>`
    pub fn author_root(&self, author_id: &AuthorId) -> PathBuf {
        self.export_root.join(author_id.folder_name())
    }

    /// `<export_root>/author-<id>.eln`
    pub fn archive_path(&self, author_id: &AuthorId) -> PathBuf {
        self.export_root
            .join(format!("{}.{ELN_EXTENSION}", author_id.folder_name()))
    }

    /// `<export_root>/author-<id>.zip`, the archive before its rename
    pub fn staging_path(&self, author_id: &AuthorId) -> PathBuf {
        self.export_root
            .join(format!("{}.zip", author_id.folder_name()))
    }

    /// Remove an author's tree and staging zip after a failed pipeline
    ///
    /// Paths that were never created are ignored. A finished `.eln` is left
    /// alone.
    pub async fn discard(&self, author_id: &AuthorId) -> Result<()> {
        let author_root = self.author_root(author_id);
        match tokio::fs::remove_dir_all(&author_root).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        match tokio::fs::remove_file(self.staging_path(author_id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(author_id = %author_id, "Removed partial author output");
        Ok(())
    }

    /// Write the graph document, zip the author tree and rename it to `.eln`
    ///
    /// # Errors
    ///
    /// Fails when the author root does not exist or on any I/O or zip error.
    /// Packaging errors are fatal for the run.
    pub async fn package(&self, author_id: &AuthorId, document: &CrateDocument) -> Result<PathBuf> {
        let author_root = self.author_root(author_id);
        if !author_root.is_dir() {
            return Err(PackageError::MissingRoot(author_root.display().to_string()).into());
        }

        let metadata = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(author_root.join(METADATA_FILE_NAME), metadata).await?;

        let staging = self.staging_path(author_id);
        let archive = self.archive_path(author_id);

        let export_root = self.export_root.clone();
        let zip_target = staging.clone();
        tokio::task::spawn_blocking(move || zip_tree(&export_root, &author_root, &zip_target))
            .await
            .map_err(|e| ElnError::Export(format!("Archive task failed: {e}")))??;

        tokio::fs::rename(&staging, &archive).await?;

        tracing::debug!(
            author_id = %author_id,
            archive = %archive.display(),
            "Archive written"
        );
        Ok(archive)
    }
}

/// Zip `tree` into `target`, naming entries relative to `base`
fn zip_tree(base: &Path, tree: &Path, target: &Path) -> Result<()> {
    let file = File::create(target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let options: FileOptions<'_, ()> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    for entry in WalkDir::new(tree).sort_by_file_name() {
        let entry = entry.map_err(PackageError::from)?;
        let name = archive_name(base, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(PackageError::from)?;
        } else {
            zip.start_file(name, options).map_err(PackageError::from)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut zip)?;
        }
    }

    zip.finish().map_err(PackageError::from)?;
    Ok(())
}

/// Forward-slash path of `path` relative to `base`
fn archive_name(base: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base).map_err(|_| PackageError::Walk {
        path: path.display().to_string(),
        message: format!("not under {}", base.display()),
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crate_graph::{CrateGraphBuilder, GraphNode};
    use std::io::Read;
    use tempfile::TempDir;

    fn document(author: &AuthorId) -> CrateDocument {
        CrateGraphBuilder::new(author.clone(), "2024-01-01T00:00:00+0000")
            .finish()
            .document
    }

    fn names(path: &Path) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_package_layout() {
        let dir = TempDir::new().unwrap();
        let author = AuthorId::new("7").unwrap();
        let packager = ArchivePackager::new(dir.path());

        let root = packager.author_root(&author);
        std::fs::create_dir_all(root.join("100")).unwrap();
        std::fs::write(root.join("100").join("e1"), b"payload").unwrap();

        let archive = packager.package(&author, &document(&author)).await.unwrap();

        assert_eq!(archive, dir.path().join("author-7.eln"));
        assert!(!dir.path().join("author-7.zip").exists());
        assert_eq!(
            names(&archive),
            vec![
                "author-7/",
                "author-7/100/",
                "author-7/100/e1",
                "author-7/ro-crate-metadata.json"
            ]
        );
    }

    #[tokio::test]
    async fn test_metadata_in_archive_matches_document() {
        let dir = TempDir::new().unwrap();
        let author = AuthorId::new("7").unwrap();
        let packager = ArchivePackager::new(dir.path());
        std::fs::create_dir_all(packager.author_root(&author)).unwrap();

        let doc = document(&author);
        let archive = packager.package(&author, &doc).await.unwrap();

        let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
        let mut text = String::new();
        zip.by_name("author-7/ro-crate-metadata.json")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        let read_back: CrateDocument = serde_json::from_str(&text).unwrap();

        assert_eq!(read_back, doc);
        assert!(matches!(read_back.graph.last(), Some(GraphNode::Dataset(_))));
    }

    #[tokio::test]
    async fn test_repackaging_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let author = AuthorId::new("7").unwrap();
        let packager = ArchivePackager::new(dir.path());
        let root = packager.author_root(&author);
        std::fs::create_dir_all(root.join("1")).unwrap();
        std::fs::write(root.join("1").join("b"), b"b").unwrap();
        std::fs::write(root.join("1").join("a"), b"a").unwrap();

        let doc = document(&author);
        let first = std::fs::read(packager.package(&author, &doc).await.unwrap()).unwrap();
        let second = std::fs::read(packager.package(&author, &doc).await.unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_author_root() {
        let dir = TempDir::new().unwrap();
        let author = AuthorId::new("9").unwrap();
        let err = ArchivePackager::new(dir.path())
            .package(&author, &document(&author))
            .await
            .unwrap_err();

        assert!(matches!(err, ElnError::Package(PackageError::MissingRoot(_))));
    }

    #[tokio::test]
    async fn test_discard_removes_partial_output() {
        let dir = TempDir::new().unwrap();
        let author = AuthorId::new("7").unwrap();
        let other = AuthorId::new("8").unwrap();
        let packager = ArchivePackager::new(dir.path());

        std::fs::create_dir_all(packager.author_root(&author).join("100")).unwrap();
        std::fs::write(packager.staging_path(&author), b"partial").unwrap();
        std::fs::create_dir_all(packager.author_root(&other)).unwrap();
        let finished = packager.package(&other, &document(&other)).await.unwrap();

        packager.discard(&author).await.unwrap();

        assert!(!packager.author_root(&author).exists());
        assert!(!packager.staging_path(&author).exists());
        assert!(finished.exists());
        assert!(packager.author_root(&other).exists());

        // Nothing left to remove
        packager.discard(&author).await.unwrap();
    }

    #[test]
    fn test_archive_name_uses_forward_slashes() {
        let base = Path::new("/tmp/export");
        let path = base.join("author-1").join("2").join("f");
        assert_eq!(archive_name(base, &path).unwrap(), "author-1/2/f");
    }
}
