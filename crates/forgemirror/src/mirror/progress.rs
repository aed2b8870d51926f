//! Progress reporting for mirror runs.
//!
//! Events are consumed by the CLI's interactive and logging reporters; the
//! library itself never prints.

/// Progress events emitted during a mirror run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum MirrorProgress {
    /// Starting to fetch the source account's repositories.
    FetchingRepos {
        /// The account being listed.
        account: String,
    },

    /// Fetched a page of repositories.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of matching repos on this page.
        count: usize,
        /// Running total of repos fetched so far.
        total_so_far: usize,
    },

    /// Finished fetching all repositories.
    FetchComplete {
        /// Total number of repositories fetched.
        total: usize,
    },

    /// Force-sync: comparing destination mirrors against the source set.
    Reconciling {
        /// Number of destination mirrors considered.
        candidates: usize,
    },

    /// Force-sync: a stale destination mirror was deleted.
    MirrorDeleted {
        /// Destination owner.
        owner: String,
        /// Repository name.
        name: String,
    },

    /// Force-sync: a deletion failed.
    DeleteError {
        owner: String,
        name: String,
        error: String,
    },

    /// Force-sync finished.
    ReconcileComplete {
        /// Number of mirrors deleted.
        deleted: usize,
        /// Number of deletions that failed.
        errors: usize,
    },

    /// Starting the migration loop.
    MigratingRepos {
        /// Number of repositories to migrate.
        count: usize,
        /// True when repositories become pull mirrors, false for clones.
        mirror: bool,
    },

    /// A repository was migrated.
    Migrated {
        owner: String,
        name: String,
    },

    /// The destination already had this repository.
    AlreadyPresent {
        owner: String,
        name: String,
    },

    /// A private repository was skipped for lack of a source token.
    SkippedPrivate {
        owner: String,
        name: String,
    },

    /// A migration failed.
    MigrateError {
        owner: String,
        name: String,
        error: String,
    },

    /// The migration loop finished.
    MigrationComplete {
        migrated: usize,
        already_present: usize,
        skipped: usize,
        failed: usize,
    },

    /// Warning message (non-fatal).
    Warning {
        message: String,
    },
}

/// Callback for progress updates during a mirror run.
pub type ProgressCallback = Box<dyn Fn(MirrorProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: MirrorProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
