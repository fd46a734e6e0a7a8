//! Type-safe host command contracts.
//!
//! Every external program this tool runs (`dnf`, `firewall-cmd`,
//! `foreman-installer`, `reposync`, ...) is described by a struct or enum
//! implementing [`CommandArgs`]. The runner turns it into an argument
//! vector and executes it directly, never through a shell, so an
//! organization name like `ACME; rm -rf /` is just an argument.
//!
//! The same value renders the "run this yourself" text printed when the
//! operator declines the final confirmation, so the fallback instructions
//! can never drift from what would have been executed.

use std::fmt;

/// Trait for typed command arguments.
///
/// # Contract
///
/// - `program()`: executable name resolved through `PATH`.
/// - `to_cli_args()`: arguments exactly as the program expects them.
/// - `needs_root()`: whether the runner must elevate with `sudo` when the
///   tool itself is not running as root.
pub trait CommandArgs {
    fn program(&self) -> &'static str;

    fn to_cli_args(&self) -> Vec<String>;

    fn needs_root(&self) -> bool {
        true
    }
}

/// A fully resolved argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Build the argument vector for `args`, prefixing `sudo` when `elevate`
    /// is set and the command needs root.
    pub fn build<T: CommandArgs + ?Sized>(args: &T, elevate: bool) -> Self {
        let mut cli_args = args.to_cli_args();
        if elevate && args.needs_root() {
            cli_args.insert(0, args.program().to_string());
            Self {
                program: "sudo".to_string(),
                args: cli_args,
            }
        } else {
            Self {
                program: args.program().to_string(),
                args: cli_args,
            }
        }
    }

    /// Copy-pasteable rendering with POSIX escaping
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_escape)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Escape a single shell word for POSIX sh.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@,+%".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}
