//! Interactive progress display for terminals.

use std::sync::Mutex;

use console::style;
use forgemirror::MirrorProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Styled terminal reporter with a progress bar over the migration loop.
pub(crate) struct InteractiveReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl InteractiveReporter {
    pub(crate) fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Print a line without tearing the progress bar, if one is active.
    fn println(&self, line: String) {
        let bar = self.bar.lock().expect("progress bar lock poisoned");
        match bar.as_ref() {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    pub(crate) fn handle(&self, event: MirrorProgress) {
        match event {
            MirrorProgress::FetchingRepos { account } => {
                println!("Fetching repositories for '{account}'...");
            }

            MirrorProgress::FetchedPage { .. } => {}

            MirrorProgress::FetchComplete { total } => {
                println!("Found {total} repositories.\n");
            }

            MirrorProgress::Reconciling { candidates } => {
                println!("Force sync: checking {candidates} destination mirrors...");
            }

            MirrorProgress::MirrorDeleted { owner, name } => {
                self.println(format!(
                    "  {} stale mirror {}/{}",
                    style("deleted").red(),
                    owner,
                    name
                ));
            }

            MirrorProgress::DeleteError { owner, name, error } => {
                self.println(format!(
                    "  {} deleting {}/{}: {}",
                    style("error").red().bold(),
                    owner,
                    name,
                    error
                ));
            }

            MirrorProgress::ReconcileComplete { deleted, errors } => {
                if deleted > 0 || errors > 0 {
                    println!("Force sync: {deleted} deleted, {errors} errors.\n");
                } else {
                    println!("Force sync: nothing to delete.\n");
                }
            }

            MirrorProgress::MigratingRepos { count, mirror } => {
                let verb = if mirror { "Mirroring" } else { "Cloning" };
                println!("{verb} {count} repositories...");

                let bar = ProgressBar::new(count as u64);
                bar.set_style(
                    ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")
                        .expect("valid progress template")
                        .progress_chars("=> "),
                );
                *self.bar.lock().expect("progress bar lock poisoned") = Some(bar);
            }

            MirrorProgress::Migrated { owner, name } => {
                self.println(format!("  {} {}/{}", style("migrated").green(), owner, name));
                self.tick(&name);
            }

            MirrorProgress::AlreadyPresent { owner, name } => {
                self.println(format!(
                    "  {} {}/{}",
                    style("already mirrored").dim(),
                    owner,
                    name
                ));
                self.tick(&name);
            }

            MirrorProgress::SkippedPrivate { owner, name } => {
                self.println(format!(
                    "  {} {}/{} (private, no GitHub token)",
                    style("skipped").yellow(),
                    owner,
                    name
                ));
                self.tick(&name);
            }

            MirrorProgress::MigrateError { owner, name, error } => {
                self.println(format!(
                    "  {} {}/{}: {}",
                    style("failed").red().bold(),
                    owner,
                    name,
                    error
                ));
                self.tick(&name);
            }

            MirrorProgress::MigrationComplete { .. } => {
                if let Some(bar) = self.bar.lock().expect("progress bar lock poisoned").take() {
                    bar.finish_and_clear();
                }
            }

            MirrorProgress::Warning { message } => {
                eprintln!("{} {}", style("Warning:").yellow().bold(), message);
            }

            _ => {}
        }
    }

    fn tick(&self, name: &str) {
        let bar = self.bar.lock().expect("progress bar lock poisoned");
        if let Some(bar) = bar.as_ref() {
            bar.set_message(name.to_string());
            bar.inc(1);
        }
    }
}
