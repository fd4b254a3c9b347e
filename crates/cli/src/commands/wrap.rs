//! `openlineage wrap`: Run a command as a lineage job.
//!
//! Emits START, runs the command, records an error if it fails, then
//! finishes the run. The command's exit code is passed through.

use std::path::Path;

use openlineage_client::{Client, LineageContext};
use tracing::{info, warn};
use uuid::Uuid;

/// Exit code used when the command could not be started at all.
const SPAWN_FAILED: i32 = 127;

pub async fn run(
    config_path: Option<&Path>,
    job: String,
    run_id: Option<Uuid>,
    command: Vec<String>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let client = super::build_client(config_path)?;
    Ok(run_wrapped(&client, job, run_id, &command).await?)
}

async fn run_wrapped(
    client: &Client,
    job: String,
    run_id: Option<Uuid>,
    command: &[String],
) -> Result<i32, String> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| "no command given".to_string())?;

    let ctx = LineageContext::background();
    let (ctx, run) = match run_id {
        Some(run_id) => client.existing_run_context(&ctx, job, run_id),
        None => client.new_run_context(&ctx, job),
    };

    if let Err(e) = run.start(&ctx).await {
        warn!(error = %e, "Failed to emit START event");
    }

    info!(job = run.job_name(), run_id = %run.run_id(), program = %program, "Running wrapped command");

    let code = match tokio::process::Command::new(program).args(args).status().await {
        Ok(status) if status.success() => 0,
        Ok(status) => {
            run.record_error(&format!("`{}` exited with {status}", command.join(" ")))
                .await;
            status.code().unwrap_or(1)
        }
        Err(e) => {
            run.record_error(&format!("failed to start `{program}`: {e}"))
                .await;
            SPAWN_FAILED
        }
    };

    run.finish().await;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openlineage_transport::ConsoleTransport;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn console_client() -> (Client, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let transport = ConsoleTransport::with_writer(false, Box::new(buffer.clone()));
        (Client::with_transport(Arc::new(transport), "shell"), buffer)
    }

    fn event_types(buffer: &SharedBuffer) -> Vec<String> {
        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        out.lines()
            .map(|line| {
                let event: serde_json::Value = serde_json::from_str(line).unwrap();
                event["eventType"].as_str().unwrap().to_owned()
            })
            .collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_command_completes() {
        let (client, buffer) = console_client();
        let code = run_wrapped(&client, "noop".into(), None, &["true".into()])
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(event_types(&buffer), vec!["START", "COMPLETE"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_fails_run() {
        let (client, buffer) = console_client();
        let code = run_wrapped(
            &client,
            "broken".into(),
            None,
            &["sh".into(), "-c".into(), "exit 3".into()],
        )
        .await
        .unwrap();

        assert_eq!(code, 3);
        assert_eq!(event_types(&buffer), vec!["START", "OTHER", "FAIL"]);
    }

    #[tokio::test]
    async fn missing_program_fails_run() {
        let (client, buffer) = console_client();
        let code = run_wrapped(
            &client,
            "ghost".into(),
            None,
            &["definitely-not-a-real-program-4821".into()],
        )
        .await
        .unwrap();

        assert_eq!(code, SPAWN_FAILED);
        assert_eq!(event_types(&buffer), vec!["START", "OTHER", "FAIL"]);
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let (client, buffer) = console_client();
        assert!(run_wrapped(&client, "none".into(), None, &[]).await.is_err());
        assert!(event_types(&buffer).is_empty());
    }
}
