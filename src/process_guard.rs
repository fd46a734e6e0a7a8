//! Child process lifecycle
//!
//! `dnf` transactions and `foreman-installer` runs take a long time. If the
//! operator interrupts the tool, or the SSH session drops, the running child
//! must not carry on half-configured without anyone watching it.
//!
//! - Every spawned child is tracked while it runs.
//! - SIGINT, SIGTERM and SIGHUP stop the tracked children (SIGTERM, then
//!   SIGKILL after a grace period) and exit with `128 + signal`.
//! - Children get `PR_SET_PDEATHSIG` so they also stop if this process dies
//!   without running its handlers. The kernel clears that setting when a
//!   setuid binary such as `sudo` is executed; the tracker covers that case.
//!
//! Children stay in the foreground process group so `sudo` can still ask
//! for a password on the terminal.

use nix::libc;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::collections::BTreeSet;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Grace period between SIGTERM and SIGKILL on interrupt
pub const STOP_GRACE: Duration = Duration::from_secs(3);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// PIDs of children currently running on our behalf
#[derive(Debug, Default)]
pub struct ChildTracker {
    running: BTreeSet<i32>,
    /// Set by the first `stop_all`; later calls are no-ops
    stopping: bool,
}

impl ChildTracker {
    /// Process-wide tracker shared by the executor and the signal watcher
    pub fn global() -> &'static Mutex<ChildTracker> {
        static TRACKER: OnceLock<Mutex<ChildTracker>> = OnceLock::new();
        TRACKER.get_or_init(|| Mutex::new(ChildTracker::default()))
    }

    pub fn track(&mut self, pid: u32) {
        if let Ok(pid) = i32::try_from(pid) {
            self.running.insert(pid);
            log::debug!("Tracking child {}", pid);
        }
    }

    pub fn untrack(&mut self, pid: u32) {
        if let Ok(pid) = i32::try_from(pid) {
            self.running.remove(&pid);
            log::debug!("Child {} finished", pid);
        }
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Ask every tracked child to stop, then force whatever is still
    /// running once `grace` has passed.
    pub fn stop_all(&mut self, grace: Duration) {
        if std::mem::replace(&mut self.stopping, true) {
            return;
        }
        let mut remaining: Vec<i32> = std::mem::take(&mut self.running).into_iter().collect();
        if remaining.is_empty() {
            return;
        }

        log::info!("Stopping child process(es) {:?}", remaining);
        signal_each(&remaining, Signal::SIGTERM);

        let deadline = Instant::now() + grace;
        loop {
            remaining.retain(|&pid| is_running(pid));
            if remaining.is_empty() {
                log::info!("Child processes stopped");
                return;
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        log::warn!("Child process(es) {:?} ignored SIGTERM, killing", remaining);
        signal_each(&remaining, Signal::SIGKILL);
    }
}

fn signal_each(pids: &[i32], signal: Signal) {
    for &pid in pids {
        if let Err(e) = kill(Pid::from_raw(pid), signal) {
            log::warn!("Could not send {} to {}: {}", signal, pid, e);
        }
    }
}

/// Exists and is not a zombie
fn is_running(pid: i32) -> bool {
    if kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    // /proc/<pid>/stat: "<pid> (<comm>) <state> ..."
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => stat
            .rsplit_once(") ")
            .and_then(|(_, rest)| rest.chars().next())
            .is_none_or(|state| state != 'Z' && state != 'X'),
        Err(_) => true,
    }
}

/// Tracks a child for as long as this value lives
pub struct TrackedChild {
    pid: u32,
}

impl TrackedChild {
    pub fn new(pid: u32) -> Self {
        if let Ok(mut tracker) = ChildTracker::global().lock() {
            tracker.track(pid);
        }
        Self { pid }
    }
}

impl Drop for TrackedChild {
    fn drop(&mut self) {
        if let Ok(mut tracker) = ChildTracker::global().lock() {
            tracker.untrack(self.pid);
        }
    }
}

/// Start the thread that turns SIGINT/SIGTERM/SIGHUP into a clean stop.
/// Call once at startup.
pub fn install_signal_watcher() -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    thread::Builder::new()
        .name("signal-watcher".into())
        .spawn(move || {
            let Some(sig) = signals.forever().next() else {
                return;
            };
            let name = Signal::try_from(sig).map_or("signal", Signal::as_str);
            log::warn!("Received {}, stopping child processes", name);
            eprintln!();
            eprintln!("Interrupted ({}). Any running command has been stopped.", name);

            if let Ok(mut tracker) = ChildTracker::global().lock() {
                tracker.stop_all(STOP_GRACE);
            }
            std::process::exit(128 + sig);
        })?;
    Ok(())
}

/// Extension trait for `std::process::Command`
pub trait CommandLifecycle {
    /// Ask the kernel to SIGTERM the child when this process dies
    fn dies_with_parent(&mut self) -> &mut Self;
}

impl CommandLifecycle for std::process::Command {
    fn dies_with_parent(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: prctl is async-signal-safe and touches no shared state
        unsafe {
            self.pre_exec(|| match libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) {
                -1 => Err(std::io::Error::last_os_error()),
                _ => Ok(()),
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_track_and_untrack() {
        let mut tracker = ChildTracker::default();
        tracker.track(4242);
        tracker.track(4243);
        tracker.track(4242);
        assert_eq!(tracker.len(), 2);
        tracker.untrack(4242);
        assert_eq!(tracker.len(), 1);
        assert!(!tracker.is_empty());
    }

    #[test]
    fn test_stop_all_terminates_sleeping_child() {
        let mut child = Command::new("sleep").arg("60").spawn().unwrap();
        let pid = child.id();

        let mut tracker = ChildTracker::default();
        tracker.track(pid);
        assert!(is_running(pid as i32));

        tracker.stop_all(Duration::from_secs(2));
        assert!(!child.wait().unwrap().success());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_stop_all_only_once() {
        let mut tracker = ChildTracker::default();
        tracker.track(999_999);
        tracker.stop_all(Duration::from_millis(10));
        assert!(tracker.stopping);

        tracker.track(999_998);
        tracker.stop_all(Duration::from_millis(10));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_missing_pid_is_not_running() {
        assert!(!is_running(999_999));
    }

    #[test]
    fn test_tracked_child_untracks_on_drop() {
        let tracked = |pid| ChildTracker::global().lock().unwrap().running.contains(&pid);
        {
            let _child = TrackedChild::new(999_997);
            assert!(tracked(999_997));
        }
        assert!(!tracked(999_997));
    }

    #[test]
    fn test_dies_with_parent_still_spawns() {
        let status = Command::new("true").dies_with_parent().status().unwrap();
        assert!(status.success());
    }
}
