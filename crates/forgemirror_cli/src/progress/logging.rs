use forgemirror::MirrorProgress;

/// Logging reporter using tracing for structured output.
pub(crate) struct LoggingReporter;

impl LoggingReporter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn handle(&self, event: MirrorProgress) {
        match event {
            MirrorProgress::FetchingRepos { account } => {
                tracing::info!(account = %account, "Fetching repositories");
            }

            MirrorProgress::FetchedPage {
                page,
                count,
                total_so_far,
            } => {
                tracing::debug!(page, count, total_so_far, "Fetched page");
            }

            MirrorProgress::FetchComplete { total } => {
                tracing::info!(total, "Fetch complete");
            }

            MirrorProgress::Reconciling { candidates } => {
                tracing::info!(candidates, "Reconciling destination mirrors");
            }

            MirrorProgress::MirrorDeleted { owner, name } => {
                tracing::info!(repo = %format!("{}/{}", owner, name), "Deleted stale mirror");
            }

            MirrorProgress::DeleteError { owner, name, error } => {
                tracing::warn!(repo = %format!("{}/{}", owner, name), error = %error, "Failed to delete mirror");
            }

            MirrorProgress::ReconcileComplete { deleted, errors } => {
                tracing::info!(deleted, errors, "Reconciliation complete");
            }

            MirrorProgress::MigratingRepos { count, mirror } => {
                tracing::info!(count, mirror, "Migrating repositories");
            }

            MirrorProgress::Migrated { owner, name } => {
                tracing::info!(repo = %format!("{}/{}", owner, name), "Migrated");
            }

            MirrorProgress::AlreadyPresent { owner, name } => {
                tracing::debug!(repo = %format!("{}/{}", owner, name), "Already mirrored");
            }

            MirrorProgress::SkippedPrivate { owner, name } => {
                tracing::warn!(repo = %format!("{}/{}", owner, name), "Skipped private repository, no GitHub token");
            }

            MirrorProgress::MigrateError { owner, name, error } => {
                tracing::error!(repo = %format!("{}/{}", owner, name), error = %error, "Migration failed");
            }

            MirrorProgress::MigrationComplete {
                migrated,
                already_present,
                skipped,
                failed,
            } => {
                tracing::info!(migrated, already_present, skipped, failed, "Migration complete");
            }

            MirrorProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
