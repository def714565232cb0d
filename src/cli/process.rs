use std::{path::Path, process::Stdio};

use anyhow::{Context, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::{info, warn};

/// Stops every running process started from the `daemon` executable. Returns how many were
/// stopped.
pub fn kill_daemons(daemon: &Path) -> usize {
    let system = System::new_all();
    let current_id = get_current_pid().ok();
    let mut killed = 0;
    for (pid, process) in system.processes().iter() {
        if Some(*pid) == current_id {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| daemon == *v)
            .is_some()
        {
            info!("Stopping daemon {pid}");
            // SIGTERM lets the daemon shut down through its cancellation token. Platforms without
            // signals get a forced kill.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            killed += 1;
        }
    }
    killed
}

/// Shuts down previously started daemons and starts a new one detached from this process.
pub fn restart_daemon(daemon: &Path, app_dir: &Path) -> Result<()> {
    if !daemon.exists() {
        warn!("Daemon executable {daemon:?} is missing");
    }
    kill_daemons(daemon);

    let mut command = std::process::Command::new(daemon);
    command.arg("--force").arg("--dir").arg(app_dir);
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    #[allow(clippy::zombie_processes)]
    let child = command
        .spawn()
        .with_context(|| format!("Failed to start {daemon:?}"))?;
    info!("Spawned daemon {}", child.id());
    Ok(())
}
