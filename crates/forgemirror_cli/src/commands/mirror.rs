use console::{style, Term};
use forgemirror::{mirror, GiteaClient, GithubClient, MirrorOptions, RunSummary};

use crate::config::{Config, RunSettings};
use crate::progress::Reporter;
use crate::RunArgs;

pub(crate) async fn handle_run(
    args: RunArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();
    let interactive = is_tty && !args.non_interactive;

    // Settings are validated before any network call; an invalid strategy
    // or missing required setting aborts here.
    let settings = RunSettings::resolve(&args, config, interactive)?;

    let github = GithubClient::new(settings.github_token.as_deref())?;
    let gitea = GiteaClient::new(&settings.gitea_host, &settings.gitea_token)?;

    if is_tty {
        println!(
            "Mirroring '{}' to {} (strategy: {}{})\n",
            settings.account,
            settings.gitea_host,
            settings.strategy,
            if settings.force_sync {
                ", force sync"
            } else {
                ""
            }
        );
    } else {
        tracing::info!(
            account = %settings.account,
            host = %settings.gitea_host,
            strategy = %settings.strategy,
            force_sync = settings.force_sync,
            "Starting mirror run"
        );
    }

    let callback = Reporter::for_terminal(is_tty).into_callback();
    let options = MirrorOptions {
        strategy: settings.strategy,
        force_sync: settings.force_sync,
    };

    let summary = mirror::run(
        &github,
        &gitea,
        &settings.account,
        &settings.gitea_owner,
        &options,
        Some(&callback),
    )
    .await?;

    print_summary(&summary, &settings.account, is_tty);
    Ok(())
}

fn print_summary(summary: &RunSummary, account: &str, is_tty: bool) {
    if summary.fetched == 0 {
        if is_tty {
            println!("No repositories found for '{account}'.");
        } else {
            tracing::info!(account = %account, "No repositories found");
        }
        return;
    }

    if is_tty {
        println!();
        println!("{}", style("Summary").bold());
        println!("  fetched:          {}", summary.fetched);
        println!("  migrated:         {}", summary.migrated);
        println!("  already mirrored: {}", summary.already_present);
        if summary.skipped_private > 0 {
            println!("  skipped private:  {}", summary.skipped_private);
        }
        if summary.mirrors_deleted > 0 || summary.delete_errors > 0 {
            println!("  mirrors deleted:  {}", summary.mirrors_deleted);
        }
        if summary.has_errors() {
            println!(
                "  {}           {}",
                style("errors:").red().bold(),
                summary.failed + summary.delete_errors
            );
            for error in &summary.errors {
                eprintln!("    - {error}");
            }
        }
    } else {
        tracing::info!(
            fetched = summary.fetched,
            migrated = summary.migrated,
            already_present = summary.already_present,
            skipped_private = summary.skipped_private,
            mirrors_deleted = summary.mirrors_deleted,
            failed = summary.failed,
            delete_errors = summary.delete_errors,
            "Run complete"
        );
        for error in &summary.errors {
            tracing::error!(error = %error, "Repository error");
        }
    }
}
