//! The mirror run: list the source account, optionally prune stale
//! destination mirrors, then migrate every repository sequentially.

use std::collections::HashSet;

use thiserror::Error;

use super::progress::{emit, MirrorProgress, ProgressCallback};
use super::types::{MirrorOptions, RunSummary};
use crate::gitea::{self, GiteaClient, MigrateOutcome, MigrateRequest};
use crate::github::{GithubClient, GithubError};

/// Fatal errors for a mirror run.
///
/// Everything past the source listing is isolated per repository and
/// recorded in the [`RunSummary`] instead of aborting the run.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to list source repositories: {0}")]
    Source(#[from] GithubError),
}

/// Run a full mirror pass for `account` onto `dest_owner`.
///
/// Repositories are processed strictly one at a time, in the order the
/// source API returns them. A failure on one repository never aborts the
/// others.
pub async fn run(
    github: &GithubClient,
    gitea: &GiteaClient,
    account: &str,
    dest_owner: &str,
    options: &MirrorOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<RunSummary, MirrorError> {
    let repos = github.list_account_repos(account, on_progress).await?;

    let mut summary = RunSummary {
        fetched: repos.len(),
        ..RunSummary::default()
    };

    if repos.is_empty() {
        return Ok(summary);
    }

    if options.force_sync {
        let source_names: HashSet<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        reconcile(
            gitea,
            dest_owner,
            &source_names,
            github.is_authenticated(),
            &mut summary,
            on_progress,
        )
        .await;
    }

    let mirror = options.strategy.as_mirror_flag();
    emit(
        on_progress,
        MirrorProgress::MigratingRepos {
            count: repos.len(),
            mirror,
        },
    );

    for repo in &repos {
        let clone_addr = if repo.private {
            match github.token() {
                Some(token) => authenticated_clone_addr(&repo.html_url, token),
                None => {
                    summary.skipped_private += 1;
                    emit(
                        on_progress,
                        MirrorProgress::SkippedPrivate {
                            owner: repo.owner.login.clone(),
                            name: repo.name.clone(),
                        },
                    );
                    continue;
                }
            }
        } else {
            repo.html_url.clone()
        };

        let request = MigrateRequest {
            clone_addr,
            mirror,
            private: repo.private,
            repo_owner: dest_owner.to_string(),
            repo_name: repo.name.clone(),
        };

        match gitea.migrate_repo(&request).await {
            Ok(MigrateOutcome::Migrated) => {
                summary.migrated += 1;
                emit(
                    on_progress,
                    MirrorProgress::Migrated {
                        owner: dest_owner.to_string(),
                        name: repo.name.clone(),
                    },
                );
            }
            Ok(MigrateOutcome::AlreadyPresent) => {
                summary.already_present += 1;
                emit(
                    on_progress,
                    MirrorProgress::AlreadyPresent {
                        owner: dest_owner.to_string(),
                        name: repo.name.clone(),
                    },
                );
            }
            Err(e) => {
                let error = gitea::short_error_message(&e);
                summary.failed += 1;
                summary
                    .errors
                    .push(format!("{}/{}: {}", dest_owner, repo.name, error));
                emit(
                    on_progress,
                    MirrorProgress::MigrateError {
                        owner: dest_owner.to_string(),
                        name: repo.name.clone(),
                        error,
                    },
                );
            }
        }
    }

    emit(
        on_progress,
        MirrorProgress::MigrationComplete {
            migrated: summary.migrated,
            already_present: summary.already_present,
            skipped: summary.skipped_private,
            failed: summary.failed,
        },
    );

    Ok(summary)
}

/// Delete destination mirrors whose source repository no longer exists.
///
/// Without a source token the lister cannot have observed private source
/// repositories, so private destination mirrors are left alone rather than
/// risking a false deletion. A destination listing failure downgrades the
/// whole pass to a warning; the migration loop still runs.
async fn reconcile(
    gitea: &GiteaClient,
    dest_owner: &str,
    source_names: &HashSet<&str>,
    source_authenticated: bool,
    summary: &mut RunSummary,
    on_progress: Option<&ProgressCallback>,
) {
    let dest_repos = match gitea.list_my_repos().await {
        Ok(repos) => repos,
        Err(e) => {
            emit(
                on_progress,
                MirrorProgress::Warning {
                    message: format!(
                        "skipping force-sync, destination listing failed: {}",
                        gitea::short_error_message(&e)
                    ),
                },
            );
            return;
        }
    };

    let candidates: Vec<_> = dest_repos
        .iter()
        .filter(|repo| repo.mirror && (source_authenticated || !repo.private))
        .collect();

    emit(
        on_progress,
        MirrorProgress::Reconciling {
            candidates: candidates.len(),
        },
    );

    for repo in candidates {
        if source_names.contains(repo.name.as_str()) {
            continue;
        }

        let (owner, name) = repo.owner_and_name();
        let owner = if owner.is_empty() { dest_owner } else { owner };

        match gitea.delete_repo(owner, name).await {
            Ok(()) => {
                summary.mirrors_deleted += 1;
                emit(
                    on_progress,
                    MirrorProgress::MirrorDeleted {
                        owner: owner.to_string(),
                        name: name.to_string(),
                    },
                );
            }
            Err(e) => {
                let error = gitea::short_error_message(&e);
                summary.delete_errors += 1;
                summary
                    .errors
                    .push(format!("{}/{}: delete failed: {}", owner, name, error));
                emit(
                    on_progress,
                    MirrorProgress::DeleteError {
                        owner: owner.to_string(),
                        name: name.to_string(),
                        error,
                    },
                );
            }
        }
    }

    emit(
        on_progress,
        MirrorProgress::ReconcileComplete {
            deleted: summary.mirrors_deleted,
            errors: summary.delete_errors,
        },
    );
}

/// Embed a source token into an HTTPS clone address.
///
/// The destination pulls from this address itself, so for private source
/// repositories the credential has to travel inline:
/// `https://<token>@host/owner/repo`.
fn authenticated_clone_addr(html_url: &str, token: &str) -> String {
    match html_url.split_once("://") {
        Some((scheme, rest)) => {
            format!("{}://{}@{}", scheme, urlencoding::encode(token), rest)
        }
        None => html_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::http::{HttpMethod, MockTransport};
    use crate::mirror::MirrorStrategy;

    const GITHUB_HOST: &str = "https://api.github.test";
    const GITEA_HOST: &str = "https://forge.test";

    struct Harness {
        github_transport: MockTransport,
        gitea_transport: MockTransport,
        github: GithubClient,
        gitea: GiteaClient,
    }

    fn harness(github_token: Option<&str>) -> Harness {
        let github_transport = MockTransport::new();
        let gitea_transport = MockTransport::new();
        let github = GithubClient::new_with_transport(
            GITHUB_HOST,
            github_token,
            Arc::new(github_transport.clone()),
        );
        let gitea =
            GiteaClient::new_with_transport(GITEA_HOST, "dst-token", Arc::new(gitea_transport.clone()));
        Harness {
            github_transport,
            gitea_transport,
            github,
            gitea,
        }
    }

    fn source_repo(owner: &str, name: &str, private: bool) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "full_name": format!("{owner}/{name}"),
            "html_url": format!("https://github.com/{owner}/{name}"),
            "private": private,
            "owner": {"login": owner}
        })
    }

    fn dest_repo(name: &str, mirror: bool, private: bool) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "full_name": format!("mirrors/{name}"),
            "mirror": mirror,
            "private": private
        })
    }

    fn push_source_page(h: &Harness, authenticated: bool, repos: &[serde_json::Value]) {
        let url = if authenticated {
            format!("{GITHUB_HOST}/user/repos?per_page=100&page=1")
        } else {
            format!("{GITHUB_HOST}/users/alice/repos?per_page=100&page=1")
        };
        h.github_transport.push_response(
            HttpMethod::Get,
            url,
            200,
            serde_json::to_string(repos).unwrap(),
        );
    }

    fn push_dest_listing(h: &Harness, repos: &[serde_json::Value]) {
        h.gitea_transport.push_response(
            HttpMethod::Get,
            format!("{GITEA_HOST}/api/v1/user/repos?page=1&limit=50"),
            200,
            serde_json::to_string(repos).unwrap(),
        );
    }

    fn push_migrate_ok(h: &Harness, times: usize) {
        for _ in 0..times {
            h.gitea_transport.push_response(
                HttpMethod::Post,
                format!("{GITEA_HOST}/api/v1/repos/migrate"),
                201,
                "{}",
            );
        }
    }

    fn migrate_bodies(h: &Harness) -> Vec<MigrateRequest> {
        h.gitea_transport
            .requests()
            .into_iter()
            .filter(|r| r.method == HttpMethod::Post)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    async fn run_with(h: &Harness, options: &MirrorOptions) -> RunSummary {
        run(&h.github, &h.gitea, "alice", "mirrors", options, None)
            .await
            .expect("run should succeed")
    }

    #[tokio::test]
    async fn empty_account_completes_without_migrate_calls() {
        let h = harness(None);
        push_source_page(&h, false, &[]);

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.migrated, 0);
        assert!(h.gitea_transport.requests().is_empty());
    }

    #[tokio::test]
    async fn public_repos_are_migrated_in_listing_order() {
        let h = harness(None);
        push_source_page(
            &h,
            false,
            &[source_repo("alice", "one", false), source_repo("alice", "two", false)],
        );
        push_migrate_ok(&h, 2);

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.migrated, 2);
        assert_eq!(summary.failed, 0);

        let bodies = migrate_bodies(&h);
        let names: Vec<&str> = bodies.iter().map(|b| b.repo_name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(bodies[0].clone_addr, "https://github.com/alice/one");
        assert_eq!(bodies[0].repo_owner, "mirrors");
        assert!(bodies[0].mirror);
        assert!(!bodies[0].private);
    }

    #[tokio::test]
    async fn clone_strategy_clears_mirror_flag_in_every_payload() {
        let h = harness(None);
        push_source_page(
            &h,
            false,
            &[source_repo("alice", "one", false), source_repo("alice", "two", false)],
        );
        push_migrate_ok(&h, 2);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Clone,
            force_sync: false,
        };
        run_with(&h, &options).await;

        let bodies = migrate_bodies(&h);
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().all(|b| !b.mirror));
    }

    #[tokio::test]
    async fn private_repo_without_token_is_skipped_and_run_continues() {
        let h = harness(None);
        push_source_page(
            &h,
            false,
            &[source_repo("alice", "secret", true), source_repo("alice", "open", false)],
        );
        push_migrate_ok(&h, 1);

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.skipped_private, 1);
        assert_eq!(summary.migrated, 1);

        let bodies = migrate_bodies(&h);
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].repo_name, "open");
    }

    #[tokio::test]
    async fn private_repo_with_token_gets_inline_credential() {
        let h = harness(Some("s3cr(t"));
        push_source_page(&h, true, &[source_repo("alice", "secret", true)]);
        push_migrate_ok(&h, 1);

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.migrated, 1);
        let bodies = migrate_bodies(&h);
        assert_eq!(
            bodies[0].clone_addr,
            "https://s3cr%28t@github.com/alice/secret"
        );
        assert!(bodies[0].private);
    }

    #[tokio::test]
    async fn migrate_failure_is_recorded_and_loop_continues() {
        let h = harness(None);
        push_source_page(
            &h,
            false,
            &[source_repo("alice", "bad", false), source_repo("alice", "good", false)],
        );
        h.gitea_transport.push_response(
            HttpMethod::Post,
            format!("{GITEA_HOST}/api/v1/repos/migrate"),
            500,
            r#"{"message":"some other failure"}"#,
        );
        push_migrate_ok(&h, 1);

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.migrated, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("mirrors/bad"));
    }

    #[tokio::test]
    async fn already_present_is_a_benign_skip() {
        let h = harness(None);
        push_source_page(&h, false, &[source_repo("alice", "dup", false)]);
        h.gitea_transport.push_response(
            HttpMethod::Post,
            format!("{GITEA_HOST}/api/v1/repos/migrate"),
            409,
            r#"{"message":"The repository with the same name already exists."}"#,
        );

        let summary = run_with(&h, &MirrorOptions::default()).await;

        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.failed, 0);
        assert!(!summary.has_errors());
    }

    #[tokio::test]
    async fn force_sync_deletes_only_stale_public_mirrors() {
        let h = harness(None);
        push_source_page(
            &h,
            false,
            &[source_repo("alice", "a", false), source_repo("alice", "b", false)],
        );
        push_dest_listing(
            &h,
            &[dest_repo("a", true, false), dest_repo("c", true, false)],
        );
        h.gitea_transport.push_response(
            HttpMethod::Delete,
            format!("{GITEA_HOST}/api/v1/repos/mirrors/c"),
            204,
            "",
        );
        push_migrate_ok(&h, 2);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run_with(&h, &options).await;

        assert_eq!(summary.mirrors_deleted, 1);

        let deletes: Vec<_> = h
            .gitea_transport
            .requests()
            .into_iter()
            .filter(|r| r.method == HttpMethod::Delete)
            .collect();
        assert_eq!(deletes.len(), 1);
        assert!(deletes[0].url.ends_with("/repos/mirrors/c"));
    }

    #[tokio::test]
    async fn force_sync_spares_private_mirrors_without_source_token() {
        let h = harness(None);
        push_source_page(&h, false, &[source_repo("alice", "a", false)]);
        // "ghost" is stale but private: without a source token it must stay.
        push_dest_listing(
            &h,
            &[dest_repo("a", true, false), dest_repo("ghost", true, true)],
        );
        push_migrate_ok(&h, 1);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run_with(&h, &options).await;

        assert_eq!(summary.mirrors_deleted, 0);
        assert!(h
            .gitea_transport
            .requests()
            .iter()
            .all(|r| r.method != HttpMethod::Delete));
    }

    #[tokio::test]
    async fn force_sync_with_token_prunes_stale_private_mirrors() {
        let h = harness(Some("tok"));
        push_source_page(&h, true, &[source_repo("alice", "a", false)]);
        push_dest_listing(&h, &[dest_repo("ghost", true, true)]);
        h.gitea_transport.push_response(
            HttpMethod::Delete,
            format!("{GITEA_HOST}/api/v1/repos/mirrors/ghost"),
            204,
            "",
        );
        push_migrate_ok(&h, 1);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run_with(&h, &options).await;

        assert_eq!(summary.mirrors_deleted, 1);
    }

    #[tokio::test]
    async fn force_sync_ignores_non_mirror_repositories() {
        let h = harness(None);
        push_source_page(&h, false, &[source_repo("alice", "a", false)]);
        // A regular repo the user pushed by hand: never reconciled away.
        push_dest_listing(&h, &[dest_repo("handmade", false, false)]);
        push_migrate_ok(&h, 1);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run_with(&h, &options).await;

        assert_eq!(summary.mirrors_deleted, 0);
        assert!(h
            .gitea_transport
            .requests()
            .iter()
            .all(|r| r.method != HttpMethod::Delete));
    }

    #[tokio::test]
    async fn force_sync_delete_failure_is_counted_and_run_continues() {
        let h = harness(None);
        push_source_page(&h, false, &[source_repo("alice", "a", false)]);
        push_dest_listing(&h, &[dest_repo("stale", true, false)]);
        h.gitea_transport.push_response(
            HttpMethod::Delete,
            format!("{GITEA_HOST}/api/v1/repos/mirrors/stale"),
            403,
            "forbidden",
        );
        push_migrate_ok(&h, 1);

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run_with(&h, &options).await;

        assert_eq!(summary.delete_errors, 1);
        assert_eq!(summary.mirrors_deleted, 0);
        assert_eq!(summary.migrated, 1);
        assert!(summary.has_errors());
    }

    #[tokio::test]
    async fn destination_listing_failure_skips_reconciliation_and_warns() {
        let h = harness(None);
        push_source_page(&h, false, &[source_repo("alice", "a", false)]);
        h.gitea_transport.push_response(
            HttpMethod::Get,
            format!("{GITEA_HOST}/api/v1/user/repos?page=1&limit=50"),
            503,
            "down",
        );
        push_migrate_ok(&h, 1);

        let warnings = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = std::sync::Arc::clone(&warnings);
        let callback: ProgressCallback = Box::new(move |event| {
            if let MirrorProgress::Warning { message } = event {
                seen.lock().unwrap().push(message);
            }
        });

        let options = MirrorOptions {
            strategy: MirrorStrategy::Mirror,
            force_sync: true,
        };
        let summary = run(&h.github, &h.gitea, "alice", "mirrors", &options, Some(&callback))
            .await
            .expect("run should succeed");

        assert_eq!(summary.mirrors_deleted, 0);
        assert_eq!(summary.migrated, 1);
        let warnings = warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("force-sync"));
    }

    #[tokio::test]
    async fn source_listing_failure_is_fatal() {
        let h = harness(None);
        h.github_transport.push_response(
            HttpMethod::Get,
            format!("{GITHUB_HOST}/users/alice/repos?per_page=100&page=1"),
            500,
            "boom",
        );

        let err = run(
            &h.github,
            &h.gitea,
            "alice",
            "mirrors",
            &MirrorOptions::default(),
            None,
        )
        .await
        .expect_err("listing failure should abort the run");

        assert!(matches!(err, MirrorError::Source(_)));
        assert!(h.gitea_transport.requests().is_empty());
    }

    #[test]
    fn authenticated_clone_addr_embeds_encoded_token() {
        assert_eq!(
            authenticated_clone_addr("https://github.com/alice/demo", "tok"),
            "https://tok@github.com/alice/demo"
        );
        assert_eq!(
            authenticated_clone_addr("https://github.com/alice/demo", "t@k/1"),
            "https://t%40k%2F1@github.com/alice/demo"
        );
    }

    #[test]
    fn authenticated_clone_addr_leaves_schemeless_urls_alone() {
        assert_eq!(
            authenticated_clone_addr("github.com/alice/demo", "tok"),
            "github.com/alice/demo"
        );
    }
}
