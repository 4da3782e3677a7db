//! Child process lifecycle: launch and graceful termination

use crate::error::SupervisorError;
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a terminating child is checked for exit
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A launched child process
///
/// Dropping a process that was not passed to [`terminate`] kills the child
/// and reaps it.
#[derive(Debug)]
pub struct QuickstartProcess {
    program: String,
    child: Option<Child>,
}

impl QuickstartProcess {
    /// OS process id, `None` once the child has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Exit status if the child has already exited
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, SupervisorError> {
        match self.child.as_mut() {
            Some(child) => child
                .try_wait()
                .map_err(|e| SupervisorError::io(format!("check status of {}", self.program), e)),
            None => Ok(None),
        }
    }
}

impl Drop for QuickstartProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("killing unterminated {} (pid {})", self.program, child.id());
            if let Err(err) = child.kill() {
                debug!("kill {} failed: {err}", self.program);
            }
            let _ = child.wait();
        }
    }
}

/// Spawns `exe` with `args`, stdin closed and stdout/stderr inherited
///
/// # Errors
///
/// Returns `Spawn` if the process cannot be started.
pub fn launch<I, S>(exe: &Path, args: I) -> Result<QuickstartProcess, SupervisorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = exe.display().to_string();
    let child = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| SupervisorError::Spawn {
            program: program.clone(),
            source,
        })?;

    info!("launched {program} (pid {})", child.id());
    Ok(QuickstartProcess {
        program,
        child: Some(child),
    })
}

/// Stops `process` and returns its exit status
///
/// On unix the child first receives SIGTERM and gets `grace` to exit before it
/// is killed; elsewhere it is killed straight away. A child that has already
/// exited is simply reaped.
///
/// # Errors
///
/// Returns `IoError` if the child cannot be signalled or waited for.
pub fn terminate(
    mut process: QuickstartProcess,
    grace: Duration,
) -> Result<ExitStatus, SupervisorError> {
    let Some(mut child) = process.child.take() else {
        return Err(SupervisorError::io(
            format!("terminate {}", process.program),
            std::io::Error::other("process already reaped"),
        ));
    };
    let program = process.program.clone();

    if let Some(status) = child
        .try_wait()
        .map_err(|e| SupervisorError::io(format!("check status of {program}"), e))?
    {
        debug!("{program} already exited with {status}");
        return Ok(status);
    }

    #[cfg(unix)]
    {
        send_sigterm(&child, &program)?;
        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| SupervisorError::io(format!("wait for {program}"), e))?
            {
                info!("{program} stopped with {status}");
                return Ok(status);
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
        warn!(
            "{program} still running {}s after SIGTERM, killing",
            grace.as_secs_f64()
        );
    }
    #[cfg(not(unix))]
    let _ = grace;

    // The child may exit between the last check and the kill
    if let Err(err) = child.kill() {
        debug!("kill {program} failed: {err}");
    }
    let status = child
        .wait()
        .map_err(|e| SupervisorError::io(format!("wait for {program}"), e))?;
    info!("{program} killed ({status})");
    Ok(status)
}

#[cfg(unix)]
fn send_sigterm(child: &Child, program: &str) -> Result<(), SupervisorError> {
    let pid = libc::pid_t::try_from(child.id()).map_err(|_| {
        SupervisorError::io(
            format!("signal {program}"),
            std::io::Error::other("pid out of range"),
        )
    })?;

    // SAFETY: kill(2) has no memory-safety preconditions; the pid belongs to
    // a child we have not reaped yet, so it cannot have been reused.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        return Err(SupervisorError::io(
            format!("send SIGTERM to {program}"),
            std::io::Error::last_os_error(),
        ));
    }
    debug!("sent SIGTERM to {program} (pid {pid})");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_launch_missing_program() {
        let err = launch(Path::new("/nonexistent/ziti"), ["version"]).unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn { ref program, .. } if program == "/nonexistent/ziti"));
    }

    #[test]
    fn test_terminate_stops_child_within_grace() {
        let process = launch(Path::new("sleep"), ["30"]).unwrap();
        assert!(process.id().is_some());

        let started = Instant::now();
        let status = terminate(process, Duration::from_secs(5)).unwrap();

        assert_eq!(status.signal(), Some(libc::SIGTERM));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_terminate_escalates_to_kill() {
        let process = launch(Path::new("sh"), ["-c", "trap '' TERM; exec sleep 30"]).unwrap();
        // Let the shell install the trap before signalling
        thread::sleep(Duration::from_millis(300));

        let started = Instant::now();
        let status = terminate(process, Duration::from_millis(300)).unwrap();

        assert_eq!(status.signal(), Some(libc::SIGKILL));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_terminate_already_exited_child() {
        let mut process = launch(Path::new("true"), std::iter::empty::<&str>()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while process.try_wait().unwrap().is_none() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }

        let status = terminate(process, Duration::from_secs(1)).unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_drop_kills_child() {
        let process = launch(Path::new("sleep"), ["30"]).unwrap();
        let pid = process.id().unwrap() as libc::pid_t;
        drop(process);

        // SAFETY: signal 0 only checks for existence
        let rc = unsafe { libc::kill(pid, 0) };
        assert_eq!(rc, -1, "child should be gone after drop");
    }
}
