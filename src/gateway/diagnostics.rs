//! Local diagnostic commands behind `!status` and `!speedtest`.

use meow_core::error::MeowError;
use tokio::process::Command;
use tracing::debug;

/// Run `argv` and return its standard output.
///
/// Fails when the program cannot be spawned or exits non-zero. No timeout
/// is applied; a hung command only blocks its own task.
pub async fn run_diagnostic(argv: &[String]) -> Result<String, MeowError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| MeowError::Diagnostics("no diagnostic command configured".into()))?;

    debug!("running diagnostic: {}", argv.join(" "));
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| MeowError::Diagnostics(format!("failed to run {program}: {e}")))?;

    if !output.status.success() {
        return Err(MeowError::Diagnostics(format!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
