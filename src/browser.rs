use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Opens URLs for the user.
pub(crate) trait Launcher {
    fn open(&self, url: &str) -> Result<()>;
}

/// The system web browser.
pub(crate) struct SystemBrowser;
impl Launcher for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        Browser::discover()?.open(url)
    }
}

/// Represents a program able to open URLs.
enum Browser {
    /// Taken from `$BROWSER`, possibly with arguments.
    Configured { program: String, args: Vec<String> },
    /// A URL opener found on `PATH`.
    Binary { path: PathBuf },
}
impl Browser {
    fn discover() -> Result<Self> {
        if let Ok(configured) = std::env::var("BROWSER") {
            let mut parts = configured.split_whitespace().map(str::to_string);
            if let Some(program) = parts.next() {
                return Ok(Self::Configured {
                    program,
                    args: parts.collect(),
                });
            }
        }
        // Linux, macOS, WSL.
        for exe in ["xdg-open", "open", "wslview"] {
            if let Ok(path) = which::which(exe) {
                return Ok(Self::Binary { path });
            }
        }
        tracing::info!("No URL opener found in PATH");
        exn::bail!(ErrorKind::Browser);
    }

    fn open(&self, url: &str) -> Result<()> {
        let mut command = match self {
            Self::Configured { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            },
            Self::Binary { path } => Command::new(path),
        };
        tracing::debug!(?command, url, "Launching browser");
        command
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .or_raise(|| ErrorKind::Browser)?;
        Ok(())
    }
}
