//! Main workflow orchestration logic
//!
//! Runs the three stages of an image-tagger step in order: tag resolution,
//! version record persistence and report generation. The binary only parses
//! arguments, builds the context and publishes the returned outputs.

use crate::config::Settings;
use crate::context::BuildContext;
use crate::domain::TagsResult;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::persister::{PersistReport, VersionPersister};
use crate::report::{self, ActionOutputs};
use crate::resolver::TagResolver;
use crate::store::FileStore;
use crate::ui::LogGroup;

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Resolved tags and version
    pub tags: TagsResult,

    /// Markdown report for the job summary
    pub report: String,

    /// What was persisted; `None` on a dry run
    pub persisted: Option<PersistReport>,
}

impl PipelineOutput {
    /// Step outputs for later workflow steps
    pub fn outputs(&self) -> ActionOutputs {
        ActionOutputs::new(&self.tags, self.report.clone())
    }
}

/// Main image-tagger workflow
///
/// 1. Resolve image tags and version from the build context
/// 2. Write the version record, committing and pushing released versions
/// 3. Render the markdown report
///
/// The first error aborts the run; later stages do not execute.
///
/// # Arguments
///
/// * `ctx` - Build event context
/// * `settings` - Validated resolver and persister configuration
/// * `store` - File access for the version file and record
/// * `runner` - Runs the git commands of the persistence stage
/// * `dry_run` - Skip persistence entirely
pub fn run_pipeline<S: FileStore, R: CommandRunner>(
    ctx: &BuildContext,
    settings: &Settings,
    store: S,
    runner: R,
    dry_run: bool,
) -> Result<PipelineOutput> {
    let tags = {
        let _group = LogGroup::start("Getting Image tags");
        TagResolver::new(&store).resolve(ctx, &settings.resolver)?
    };
    tracing::info!("Resolved tag {} ({})", tags.tag, tags.all_images());

    let record_path = settings.persister.version_record_path.display().to_string();
    let persisted = {
        let _group = LogGroup::start(&format!("Update {}", record_path));
        if dry_run {
            tracing::info!("Dry run: {} left untouched", record_path);
            None
        } else {
            let persister = VersionPersister::new(&store, runner);
            Some(persister.persist_tags(&tags, ctx, &settings.persister)?)
        }
    };

    let report = {
        let _group = LogGroup::start("Generating Markdown Report");
        let markdown = report::render_markdown(&tags);
        tracing::debug!("{}", markdown);
        markdown
    };

    Ok(PipelineOutput {
        tags,
        report,
        persisted,
    })
}
