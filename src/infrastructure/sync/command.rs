//! Local process execution
//!
//! Connectors that drive an external CLI (`lxc`) go through `CommandRunner`
//! so the exact invocations can be asserted in tests.

use std::process::{Command, Stdio};

/// Captured result of one finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs a program to completion and captures its output
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs programs with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        log::debug!("Running `{}`", render_command(program, args));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(output.into())
    }
}

/// Human-readable command line, used in logs and error messages
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a string for safe use in a POSIX shell command line
pub fn shell_quote(s: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "/._-+=:@,".contains(c);
    if !s.is_empty() && s.chars().all(plain) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_leaves_plain_paths() {
        assert_eq!(shell_quote("/root/squashfs-root/bin"), "/root/squashfs-root/bin");
    }

    #[test]
    fn shell_quote_with_spaces() {
        assert_eq!(shell_quote("my dir"), "'my dir'");
    }

    #[test]
    fn shell_quote_with_quotes() {
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn shell_quote_empty() {
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn render_command_joins_args() {
        let args = vec!["file".to_string(), "delete".to_string(), "vm1/a".to_string()];
        assert_eq!(render_command("lxc", &args), "lxc file delete vm1/a");
    }

    #[test]
    fn system_runner_captures_exit_code() {
        let ok = SystemRunner.run("true", &[]).unwrap();
        assert!(ok.is_success());

        let failed = SystemRunner.run("false", &[]).unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.code, Some(1));
    }

    #[test]
    fn system_runner_missing_program_is_io_error() {
        assert!(SystemRunner.run("surely-not-a-real-program", &[]).is_err());
    }
}
