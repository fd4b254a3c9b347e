//! `openlineage emit`: Emit a single run event.

use std::path::Path;

use openlineage_client::{Client, LineageContext, RunContext};
use openlineage_core::EventType;
use uuid::Uuid;

pub async fn run(
    config_path: Option<&Path>,
    job: String,
    event_type: EventType,
    run_id: Option<Uuid>,
    parent: Option<(String, Uuid)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = super::build_client(config_path)?;
    let (ctx, run) = resolve_run(&client, job, run_id, parent);

    run.emit(&ctx, &run.event(event_type)).await?;
    eprintln!("{event_type} {} ({})", run.job_name(), run.run_id());
    Ok(())
}

/// Open the run to emit for, linking it under `parent` when given.
fn resolve_run(
    client: &Client,
    job: String,
    run_id: Option<Uuid>,
    parent: Option<(String, Uuid)>,
) -> (LineageContext, RunContext) {
    let ctx = LineageContext::background();
    let ctx = match parent {
        Some((parent_job, parent_id)) => client.existing_run_context(&ctx, parent_job, parent_id).0,
        None => ctx,
    };

    match run_id {
        Some(run_id) => client.existing_run_context(&ctx, job, run_id),
        None => client.new_run_context(&ctx, job),
    }
}
