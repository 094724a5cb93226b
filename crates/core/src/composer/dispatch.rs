//! Runs a composition as one discrete unit of work off the caller's thread.

use std::sync::Arc;

use tracing::error;

use super::compose::DocumentComposer;
use super::document::GeneratedDocument;
use super::error::ComposeError;
use crate::options::ReportRequest;
use crate::records::SourceCollections;

/// Composes on tokio's blocking pool and awaits the complete result.
///
/// Nothing is published before the run finishes. To cancel, drop the future
/// and discard the result; the run itself is not interrupted.
///
/// # Errors
///
/// Propagates composition errors; returns `ComposeError::Dispatch` if the
/// task panicked or was aborted.
pub async fn generate_detached(
    sources: Arc<SourceCollections>,
    institution: String,
    request: ReportRequest,
) -> Result<GeneratedDocument, ComposeError> {
    let report_type = request.report_type;

    tokio::task::spawn_blocking(move || {
        DocumentComposer::new(&sources, institution).compose(&request)
    })
    .await
    .map_err(|e| {
        error!(%report_type, error = %e, "Generation task failed");
        ComposeError::Dispatch(e.to_string())
    })?
}
