use tracing::error;

use crate::context::AppContext;
use crate::domain::repo::RepoId;
use crate::error::AppResult;
use crate::workflow::report::{self, ReportOutcome};

#[derive(Debug, Clone)]
pub struct ReportCommandArgs {
    pub owner: String,
    pub repo: String,
}

/// One manual pipeline pass for the configured window.
pub async fn run(ctx: &AppContext, args: ReportCommandArgs) -> AppResult<ReportOutcome> {
    let repo = RepoId::new(args.owner, args.repo);
    report::run(ctx, &repo).await.map_err(|failure| {
        error!(%repo, stage = %failure.stage, error = %failure.error, "report pipeline failed");
        failure.error
    })
}
