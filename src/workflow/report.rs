use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::changeset::Changeset;
use crate::domain::email::Email;
use crate::domain::prompt;
use crate::domain::repo::RepoId;
use crate::domain::transcript::{Transcript, TranscriptBuilder};
use crate::domain::window::TimeWindow;
use crate::error::{AppError, AppResult};
use crate::services::HistoryService;

/// Pipeline stages, in execution order. Any failure short-circuits the run
/// and is reported with the stage it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Collecting,
    Building,
    Generating,
    Sending,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "Fetching",
            Stage::Collecting => "Collecting",
            Stage::Building => "Building",
            Stage::Generating => "Generating",
            Stage::Sending => "Sending",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    pub error: AppError,
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub matched_changesets: usize,
    pub delivery: String,
}

/// One full pass: fetch the window's merged changesets, walk their diffs,
/// summarize, and mail the result. Exactly one attempt per event; no state
/// survives the run.
pub async fn run(ctx: &AppContext, repo: &RepoId) -> Result<ReportOutcome, StageError> {
    let fail = |stage: Stage| move |error: AppError| StageError { stage, error };

    info!(%repo, stage = %Stage::Fetching, "listing closed pull requests");
    let closed = ctx
        .history
        .closed_changesets(repo)
        .await
        .map_err(fail(Stage::Fetching))?;
    let selected = select_merged(closed, &ctx.config.window);
    info!(matched = selected.len(), "selected merged pull requests in window");

    debug!(stage = %Stage::Collecting, "walking commits and file diffs");
    let transcript = collect_transcript(ctx.history.as_ref(), repo, &selected)
        .await
        .map_err(fail(Stage::Collecting))?;

    debug!(stage = %Stage::Building, transcript_bytes = transcript.as_str().len(), "building prompt");
    let generation_prompt = prompt::build(&transcript);

    info!(stage = %Stage::Generating, "requesting report text");
    let report = ctx
        .generator
        .complete(&generation_prompt)
        .await
        .map_err(fail(Stage::Generating))?;

    let email = Email {
        from: ctx.config.sender.clone(),
        to: ctx.config.recipient.clone(),
        subject: ctx.config.subject.clone(),
        body: report,
    };
    info!(stage = %Stage::Sending, to = %email.to, "sending report email");
    let delivery = ctx.mailer.send(&email).await.map_err(fail(Stage::Sending))?;
    info!(%delivery, "report delivered");

    Ok(ReportOutcome {
        matched_changesets: selected.len(),
        delivery,
    })
}

/// Keeps exactly the changesets merged inside the window, in fetch order.
/// Closed-without-merge entries carry no merge timestamp and are dropped.
pub fn select_merged(changesets: Vec<Changeset>, window: &TimeWindow) -> Vec<Changeset> {
    changesets
        .into_iter()
        .filter(|changeset| {
            changeset
                .merged_at
                .is_some_and(|merged_at| window.contains(merged_at))
        })
        .collect()
}

/// Walks changesets, commits, and files strictly in fetch order, one query
/// at a time. Any sub-query failure discards the partial transcript.
async fn collect_transcript(
    history: &dyn HistoryService,
    repo: &RepoId,
    selected: &[Changeset],
) -> AppResult<Transcript> {
    let mut builder = TranscriptBuilder::new();
    for changeset in selected {
        builder.open_changeset(changeset.number);
        let commits = history.changeset_commits(repo, changeset.number).await?;
        for commit in commits {
            builder.open_commit(&commit.sha);
            let files = history.commit_files(repo, &commit.sha).await?;
            for file in &files {
                builder.push_file(file);
            }
        }
    }
    Ok(builder.finish())
}
