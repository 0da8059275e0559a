use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::ToolFailure;
use crate::tool::Invocation;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Launches external tools and waits for them to complete.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolFailure>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolFailure> {
        (**self).run(invocation)
    }
}

/// Runs tools as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn wait(&self, child: &mut Child, program: &str) -> Result<ExitStatus, ToolFailure> {
        let launch_error = |source: std::io::Error| ToolFailure::Launch {
            program: program.to_string(),
            source,
        };

        // A deadline beyond what `Instant` can represent is no deadline.
        let Some((timeout, deadline)) = self
            .timeout
            .and_then(|timeout| Some((timeout, Instant::now().checked_add(timeout)?)))
        else {
            return child.wait().map_err(launch_error);
        };

        loop {
            if let Some(status) = child.try_wait().map_err(launch_error)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                if let Err(error) = child.kill() {
                    log::warn!("Failed to kill {program}: {error}");
                }
                child.wait().map_err(launch_error)?;
                return Err(ToolFailure::TimedOut {
                    program: program.to_string(),
                    timeout,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ToolFailure> {
        let program = invocation.program_name();
        log::info!("Running {invocation}");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolFailure::Launch {
                program: program.clone(),
                source,
            })?;

        // Pipes are drained on helper threads while waiting.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, &program)?;
        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !stdout.is_empty() {
            log::debug!("{program} output:\n{stdout}");
        }

        if status.success() {
            Ok(())
        } else {
            Err(ToolFailure::ExitStatus {
                program,
                code: status.code(),
                stderr,
            })
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            // Whatever was read before an error is still useful for diagnostics.
            if let Err(error) = pipe.read_to_end(&mut buffer) {
                log::debug!("Failed to read tool output: {error}");
            }
            buffer
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    let buffer = handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}
