use {
    crate::{error::ReleaseError, types::CommandOutput, Result},
    log::{debug, warn},
    std::{path::Path, process::Command},
};

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `program` in `dir` and waits for it. A non-zero exit status becomes
/// `ReleaseError::ExternalCommand` carrying the captured stderr (or stdout when
/// stderr is empty).
pub fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<CommandOutput> {
    let command = display_command(program, args);
    debug!("running `{command}` in {}", dir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| ReleaseError::ExternalCommand {
            command: command.clone(),
            reason: format!("failed to spawn: {e}"),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        let detail = if stderr.is_empty() { &stdout } else { &stderr };
        let reason = match output.status.code() {
            Some(code) => format!("exit status {code}: {detail}"),
            None => format!("terminated by signal: {detail}"),
        };
        return Err(ReleaseError::ExternalCommand { command, reason });
    }

    Ok(CommandOutput { stdout, stderr })
}

/// [`run_command`] with up to `attempts` tries. Only for commands that are safe
/// to repeat.
pub fn run_idempotent(
    program: &str,
    args: &[&str],
    dir: &Path,
    attempts: u32,
) -> Result<CommandOutput> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match run_command(program, args, dir) {
            Ok(output) => return Ok(output),
            Err(err) if attempt < attempts => {
                warn!("attempt {attempt}/{attempts} failed: {err}, retrying");
                attempt = attempt.saturating_add(1);
            }
            Err(err) => return Err(err),
        }
    }
}
