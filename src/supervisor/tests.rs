use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

use super::{Launch, Supervisor};
use crate::runner::{LanguageKind, RunRequest};

/// Runs a shell script instead of the real pipeline.
struct ShellLauncher {
    script: &'static str,
    launches: Arc<AtomicUsize>,
}

impl Launch for ShellLauncher {
    fn command(&self, _request: &RunRequest, _foreground: bool) -> Command {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let mut cmd = Command::new("sh");
        cmd.args(["-c", self.script]).stdin(Stdio::null());
        cmd
    }
}

fn supervisor(script: &'static str) -> (Supervisor<ShellLauncher>, Arc<AtomicUsize>) {
    let launches = Arc::new(AtomicUsize::new(0));
    let launcher = ShellLauncher {
        script,
        launches: Arc::clone(&launches),
    };
    (Supervisor::with_terminal(launcher, false), launches)
}

fn request(name: &str) -> RunRequest {
    RunRequest {
        path: PathBuf::from(format!("/cp/{name}")),
        kind: LanguageKind::Cpp,
        inputs: Vec::new(),
    }
}

fn group_exists(pgid: i32) -> bool {
    killpg(Pid::from_raw(pgid), None) != Err(Errno::ESRCH)
}

#[tokio::test]
async fn test_preemption_kills_previous_group_first() {
    let (mut sup, launches) = supervisor("exec sleep 30");

    sup.start(&request("a.cpp")).await.unwrap();
    let first = sup.active().unwrap().pgid();
    assert!(group_exists(first));

    sup.start(&request("b.cpp")).await.unwrap();
    let second = sup.active().unwrap().pgid();

    assert_ne!(first, second);
    assert!(!group_exists(first));
    assert!(group_exists(second));
    assert_eq!(sup.active().unwrap().path(), PathBuf::from("/cp/b.cpp"));
    assert_eq!(launches.load(Ordering::SeqCst), 2);

    assert!(sup.stop().await);
}

#[tokio::test]
async fn test_at_most_one_active_run() {
    let (mut sup, launches) = supervisor("exec sleep 30");
    let mut groups = Vec::new();

    for name in ["a.cpp", "b.cpp", "c.cpp"] {
        sup.start(&request(name)).await.unwrap();
        groups.push(sup.active().unwrap().pgid());
    }

    assert_eq!(launches.load(Ordering::SeqCst), 3);
    let alive: Vec<_> = groups.iter().filter(|g| group_exists(**g)).collect();
    assert_eq!(alive, vec![&groups[2]]);

    sup.stop().await;
}

#[tokio::test]
async fn test_wait_active_reports_exit() {
    let (mut sup, _) = supervisor("exit 3");
    sup.start(&request("a.cpp")).await.unwrap();

    let status = sup.wait_active().await.unwrap();
    assert_eq!(status.code(), Some(3));

    let finished = sup.finish(Ok(status));
    assert_eq!(finished, Some(PathBuf::from("/cp/a.cpp")));
    assert!(!sup.is_running());
}

#[tokio::test]
async fn test_finish_leaves_exited_group_alone() {
    let (mut sup, _) = supervisor("sleep 30 & exit 0");
    sup.start(&request("a.cpp")).await.unwrap();
    let pgid = sup.active().unwrap().pgid();

    let status = sup.wait_active().await;
    assert!(sup.finish(status).is_some());

    // The background sleep still holds the group; nothing signalled it
    assert!(group_exists(pgid));
    killpg(Pid::from_raw(pgid), Signal::SIGKILL).unwrap();
}

#[tokio::test]
async fn test_idle_wait_never_resolves() {
    let (mut sup, _) = supervisor("exit 0");
    let waited = tokio::time::timeout(Duration::from_millis(50), sup.wait_active()).await;
    assert!(waited.is_err());
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let (mut sup, _) = supervisor("exec sleep 30");
    sup.start(&request("a.cpp")).await.unwrap();
    let pgid = sup.active().unwrap().pgid();

    assert!(sup.stop().await);
    assert!(!sup.stop().await);
    assert!(!sup.is_running());
    assert!(!group_exists(pgid));
}
