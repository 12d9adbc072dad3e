use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind};
use tempfile::TempDir;

use super::{Action, Controller, EventFilter, TimedSet, WatchError, WatchLoop, WatchTargets};
use crate::config::{Config, test_config_at};
use crate::runner::RunRequest;
use crate::supervisor::{Launch, Supervisor};
use crate::utils::path::normalize_path;

fn make_config(content: &str) -> (TempDir, Config) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());
    let config = test_config_at(&root, content);
    (temp, config)
}

fn close_write() -> EventKind {
    EventKind::Access(AccessKind::Close(AccessMode::Write))
}

fn make_event<P: AsRef<Path>>(paths: &[P], kind: EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        attrs: Default::default(),
    }
}

// ============================================================================
// TimedSet
// ============================================================================

#[test]
fn test_burst_collapses_to_one() {
    let mut set = TimedSet::new(Duration::from_millis(1000));
    let start = Instant::now();
    let key = PathBuf::from("/cp/a.cpp");

    let accepted = (0..10)
        .filter(|i| set.should_process_at(&key, start + Duration::from_millis(i * 50)))
        .count();
    assert_eq!(accepted, 1);
}

#[test]
fn test_event_after_window_is_new() {
    let mut set = TimedSet::new(Duration::from_millis(1000));
    let start = Instant::now();
    let key = PathBuf::from("/cp/a.cpp");

    assert!(set.should_process_at(&key, start));
    assert!(!set.should_process_at(&key, start + Duration::from_millis(999)));
    assert!(set.should_process_at(&key, start + Duration::from_millis(1001)));
}

#[test]
fn test_exact_expiry_counts_as_new() {
    let mut set = TimedSet::new(Duration::from_millis(1000));
    let start = Instant::now();
    let key = "a.cpp".to_string();

    assert!(set.should_process_at(&key, start));
    assert!(set.should_process_at(&key, start + Duration::from_millis(1000)));
}

#[test]
fn test_window_is_not_extended_by_suppressed_events() {
    let mut set = TimedSet::new(Duration::from_millis(1000));
    let start = Instant::now();
    let key = "a.cpp".to_string();

    assert!(set.should_process_at(&key, start));
    assert!(!set.should_process_at(&key, start + Duration::from_millis(900)));
    // One window per burst, measured from the first sighting
    assert!(set.should_process_at(&key, start + Duration::from_millis(1100)));
}

#[test]
fn test_paths_are_independent() {
    let mut set = TimedSet::new(Duration::from_secs(1));
    assert!(set.should_process(&"a.cpp"));
    assert!(set.should_process(&"b.cpp"));
    assert!(!set.should_process(&"a.cpp"));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_sweep_drops_expired() {
    let mut set = TimedSet::new(Duration::from_millis(100));
    let start = Instant::now();

    set.should_process_at(&"a.cpp", start);
    set.should_process_at(&"b.cpp", start + Duration::from_millis(80));
    set.sweep_at(start + Duration::from_millis(150));

    assert_eq!(set.len(), 1);
    set.sweep_at(start + Duration::from_millis(200));
    assert!(set.is_empty());
}

#[test]
fn test_contains_tracks_window() {
    let mut set = TimedSet::new(Duration::from_secs(60));
    assert!(!set.contains(&"a.cpp"));
    set.should_process(&"a.cpp");
    assert!(set.contains(&"a.cpp"));
}

// ============================================================================
// WatchTargets
// ============================================================================

#[test]
fn test_targets_root_and_prefixed_subdirs() {
    let (_temp, config) = make_config("");
    let root = config.get_root();
    fs::create_dir(root.join("AoC2024")).unwrap();
    fs::create_dir(root.join("AoC2023")).unwrap();
    fs::create_dir(root.join("templates")).unwrap();
    fs::write(root.join("AoC.cpp"), "x").unwrap();

    let targets = WatchTargets::collect(&config.watch).unwrap();
    assert_eq!(
        targets.dirs(),
        [
            root.to_path_buf(),
            root.join("AoC2023"),
            root.join("AoC2024")
        ]
    );
    assert!(targets.covers(&root.join("AoC2024").join("day1.cpp")));
    assert!(!targets.covers(&root.join("templates").join("a.cpp")));
}

#[test]
fn test_missing_root_is_fatal() {
    let (_temp, config) = make_config("[watch]\nroot = \"missing\"");
    let err = WatchTargets::collect(&config.watch).unwrap_err();
    assert!(matches!(err, WatchError::MissingRoot(_)));
}

// ============================================================================
// EventFilter
// ============================================================================

fn make_filter(config: &Config) -> EventFilter {
    let targets = WatchTargets::collect(&config.watch).unwrap();
    EventFilter::new(config, &targets)
}

#[test]
fn test_only_close_write_counts() {
    assert!(EventFilter::is_close_write(&close_write()));
    assert!(!EventFilter::is_close_write(&EventKind::Create(
        CreateKind::File
    )));
    assert!(!EventFilter::is_close_write(&EventKind::Modify(
        ModifyKind::Any
    )));
}

#[test]
fn test_candidates_skip_temp_and_build_dirs() {
    let (_temp, config) = make_config("");
    let filter = make_filter(&config);
    let root = config.get_root();

    let a = root.join("a.cpp");
    let swap = root.join(".a.cpp.swp");
    let backup = root.join("a.cpp~");
    let built = config.lang.out_dir.join("a");
    let cached = config.precompile.cache_dir.join("bits").join("stdc++.h");

    let event = make_event(&[&a, &swap, &backup, &built, &cached], close_write());
    let found: Vec<_> = filter.candidates(&event).collect();
    assert_eq!(found, vec![a.as_path()]);

    let modify = make_event(&[&a], EventKind::Modify(ModifyKind::Any));
    assert_eq!(filter.candidates(&modify).count(), 0);
}

#[test]
fn test_zero_byte_file_is_ignored() {
    let (_temp, config) = make_config("");
    let filter = make_filter(&config);
    let path = config.root_join("a.cpp");

    fs::write(&path, "").unwrap();
    assert_eq!(filter.classify(&path), None);

    fs::write(&path, "int main() {}\n").unwrap();
    assert_eq!(filter.classify(&path), Some(Action::Run(path.clone())));
}

#[test]
fn test_config_change_requests_restart() {
    let (_temp, config) = make_config("");
    let filter = make_filter(&config);

    fs::write(&config.config_path, "[watch]\n").unwrap();
    assert_eq!(
        filter.classify(&config.config_path),
        Some(Action::Restart(config.config_path.clone()))
    );
}

#[test]
fn test_unknown_extension_is_ignored() {
    let (_temp, config) = make_config("");
    let filter = make_filter(&config);
    let path = config.root_join("notes.md");

    fs::write(&path, "# notes").unwrap();
    assert_eq!(filter.classify(&path), None);
}

#[test]
fn test_is_temp_file() {
    use super::filter::is_temp_file;
    assert!(is_temp_file(Path::new("/cp/.a.cpp.swp")));
    assert!(is_temp_file(Path::new("/cp/a.cpp.swo")));
    assert!(is_temp_file(Path::new("/cp/a.cpp~")));
    assert!(is_temp_file(Path::new("/cp/a.tmp")));
    assert!(is_temp_file(Path::new("/cp/.hidden.cpp")));
    assert!(!is_temp_file(Path::new("/cp/a.cpp")));
}

// ============================================================================
// WatchLoop
// ============================================================================

struct CountingLauncher(Arc<AtomicUsize>);

impl Launch for CountingLauncher {
    fn command(&self, _request: &RunRequest, _foreground: bool) -> Command {
        self.0.fetch_add(1, Ordering::SeqCst);
        let mut cmd = Command::new("sleep");
        cmd.arg("30").stdin(Stdio::null());
        cmd
    }
}

#[derive(Clone, Default)]
struct RecordingController {
    restarts: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
}

impl Controller for RecordingController {
    fn request_restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }

    fn request_shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

fn make_loop(
    config: Config,
) -> (
    WatchLoop<CountingLauncher, RecordingController>,
    Arc<AtomicUsize>,
    RecordingController,
) {
    let launches = Arc::new(AtomicUsize::new(0));
    let controller = RecordingController::default();
    let supervisor = Supervisor::with_terminal(CountingLauncher(Arc::clone(&launches)), false);
    let watch = WatchLoop::new(Arc::new(config), supervisor, controller.clone()).unwrap();
    (watch, launches, controller)
}

#[tokio::test]
async fn test_burst_of_saves_starts_one_run() {
    let (_temp, config) = make_config("");
    let path = config.root_join("a.cpp");
    fs::write(&path, "int main() {}\n").unwrap();

    let (mut watch, launches, _) = make_loop(config);
    for _ in 0..5 {
        watch
            .handle_event(&make_event(&[&path], close_write()))
            .await;
    }

    assert_eq!(launches.load(Ordering::SeqCst), 1);
    assert!(watch.supervisor().is_running());
}

#[tokio::test]
async fn test_zero_byte_save_starts_nothing() {
    let (_temp, config) = make_config("");
    let path = config.root_join("a.cpp");
    fs::write(&path, "").unwrap();

    let (mut watch, launches, _) = make_loop(config);
    watch
        .handle_event(&make_event(&[&path], close_write()))
        .await;

    assert_eq!(launches.load(Ordering::SeqCst), 0);
    assert!(!watch.supervisor().is_running());
}

#[tokio::test]
async fn test_different_files_preempt() {
    let (_temp, config) = make_config("");
    let a = config.root_join("a.cpp");
    let b = config.root_join("b.py");
    fs::write(&a, "int main() {}\n").unwrap();
    fs::write(&b, "print(1)\n").unwrap();

    let (mut watch, launches, _) = make_loop(config);
    watch.handle_event(&make_event(&[&a], close_write())).await;
    watch.handle_event(&make_event(&[&b], close_write())).await;

    assert_eq!(launches.load(Ordering::SeqCst), 2);
    let active = watch.supervisor().active().unwrap();
    assert_eq!(active.path(), b.as_path());
}

#[tokio::test]
async fn test_config_save_requests_restart() {
    let (_temp, config) = make_config("");
    let config_path = config.config_path.clone();
    fs::write(&config_path, "[watch]\ndebounce_ms = 500\n").unwrap();

    let (mut watch, launches, controller) = make_loop(config);
    watch
        .handle_event(&make_event(&[&config_path], close_write()))
        .await;

    assert_eq!(controller.restarts.load(Ordering::SeqCst), 1);
    assert_eq!(launches.load(Ordering::SeqCst), 0);
}
