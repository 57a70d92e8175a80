//! Pre-packaging integrity check
//!
//! Before an author tree is zipped, every File node's sha256 is recomputed
//! from the file it names. A mismatch means the graph and the tree disagree,
//! and the archive would be wrong.

use super::checksum::sha256_hex;
use super::report::{VerificationFailure, VerificationReport};
use crate::core::crate_graph::CrateDocument;
use crate::domain::Result;
use std::path::Path;
use std::time::Instant;

/// Check the File nodes of `document` against the tree rooted at `author_root`
///
/// Node ids are resolved relative to the author root (`./1001/e-7` reads
/// `<author_root>/1001/e-7`).
///
/// # Examples
///
/// ```no_run
/// use eln_export::core::verification::verify_author_tree;
/// use eln_export::core::crate_graph::CrateDocument;
/// use std::path::Path;
///
/// # async fn example(document: CrateDocument) -> eln_export::domain::Result<()> {
/// let report = verify_author_tree(Path::new("export/author-7"), &document).await?;
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub async fn verify_author_tree(
    author_root: &Path,
    document: &CrateDocument,
) -> Result<VerificationReport> {
    let start = Instant::now();
    let mut report = VerificationReport::new();

    for node in document.files() {
        let Some(expected) = node.sha256.as_deref() else {
            report.record_skip();
            continue;
        };

        let path = author_root.join(node.relative_path());
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let actual = sha256_hex(&bytes);
                if actual == expected {
                    report.record_pass();
                } else {
                    report.record_failure(VerificationFailure {
                        node_id: node.id.clone(),
                        expected_sha256: expected.to_string(),
                        actual_sha256: Some(actual),
                        reason: "sha256 mismatch".to_string(),
                    });
                }
            }
            Err(e) => report.record_failure(VerificationFailure {
                node_id: node.id.clone(),
                expected_sha256: expected.to_string(),
                actual_sha256: None,
                reason: format!("cannot read {}: {e}", path.display()),
            }),
        }
    }

    report.set_duration(start.elapsed().as_millis() as u64);

    tracing::debug!(
        author_root = %author_root.display(),
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        duration_ms = report.duration_ms,
        "Integrity check completed"
    );

    Ok(report)
}
