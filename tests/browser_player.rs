//! Player integration tests: verifies preload, playback, and the empty page in
//! a real browser.
//!
//! These tests run the skyloop router on a local port over a temp image tree
//! of real JPEGs, then drive the page with headless Chrome.
//!
//! Run with: `cargo test --test browser_player -- --ignored`

use filetime::{FileTime, set_file_mtime};
use headless_chrome::{Browser, LaunchOptions, Tab};
use skyloop::config::SiteConfig;
use skyloop::server::{self, AppState};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

// ===========================================================================
// Test server: the real router on an ephemeral port
// ===========================================================================

struct TestServer {
    port: u16,
    _site: TempDir,
    _stop: tokio::sync::oneshot::Sender<()>,
}

impl TestServer {
    fn start(site: TempDir) -> Self {
        let state = AppState::from_config(&SiteConfig::default(), site.path());
        let app = server::router(Arc::new(state));
        let (port_tx, port_rx) = std::sync::mpsc::channel::<u16>();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                port_tx.send(listener.local_addr().unwrap().port()).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = stop_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        let port = port_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        Self {
            port,
            _site: site,
            _stop: stop_tx,
        }
    }

    fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }
}

// ===========================================================================
// Fixtures
// ===========================================================================

/// Write a small solid-color JPEG and pin its mtime.
fn write_jpeg(root: &Path, rel: &str, shade: u8, mtime: i64) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbImage::from_pixel(64, 36, image::Rgb([shade, shade, shade]));
    img.save(&path).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

/// A file named like a JPEG that no browser can decode.
fn write_broken(root: &Path, rel: &str, mtime: i64) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not a jpeg").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn open(server: &TestServer) -> Arc<Tab> {
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.url())
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, false)
        .unwrap()
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Wait for the preload to finish. Panics after 10 s.
fn wait_for_playing(tab: &Tab) {
    for _ in 0..200 {
        if eval_string(tab, "document.body.dataset.phase") == "playing" {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("player never left the loading phase");
}

fn counter(tab: &Tab) -> String {
    eval_string(tab, "document.getElementById('counter').textContent")
}

// ===========================================================================
// Playback
// ===========================================================================

#[test]
#[ignore]
fn player_reaches_playing_and_cycles() {
    let site = TempDir::new().unwrap();
    write_jpeg(site.path(), "images/night/001.jpg", 40, 1000);
    write_jpeg(site.path(), "images/night/002.jpg", 120, 2000);
    write_jpeg(site.path(), "images/night/003.jpg", 200, 3000);
    let server = TestServer::start(site);
    let tab = open(&server);

    wait_for_playing(&tab);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..60 {
        seen.insert(counter(&tab));
        thread::sleep(Duration::from_millis(20));
    }
    assert!(
        seen.len() >= 2,
        "counter should advance during playback, saw: {seen:?}"
    );
    assert!(seen.iter().all(|c| c.ends_with("/ 3 · 12 fps")));
}

#[test]
#[ignore]
fn viewer_src_follows_counter() {
    let site = TempDir::new().unwrap();
    write_jpeg(site.path(), "images/a.jpg", 40, 1000);
    write_jpeg(site.path(), "images/b.jpg", 200, 2000);
    let server = TestServer::start(site);
    let tab = open(&server);
    wait_for_playing(&tab);

    let pair = eval_string(
        &tab,
        "document.getElementById('counter').textContent + '|' + \
         new URL(document.getElementById('viewer').src).pathname",
    );
    let (count, path) = pair.split_once('|').unwrap();
    let expected = if count.starts_with("1 /") {
        "/images/a.jpg"
    } else {
        "/images/b.jpg"
    };
    assert_eq!(path, expected);
}

#[test]
#[ignore]
fn undecodable_frame_holds_playback() {
    let site = TempDir::new().unwrap();
    write_jpeg(site.path(), "images/a.jpg", 40, 1000);
    write_broken(site.path(), "images/b.jpg", 2000);
    write_jpeg(site.path(), "images/c.jpg", 200, 3000);
    let server = TestServer::start(site);
    let tab = open(&server);
    wait_for_playing(&tab);

    // Frame 2 never decodes, so the loop stays on frame 1
    thread::sleep(Duration::from_millis(500));
    assert_eq!(counter(&tab), "1 / 3 · 12 fps");
}

// ===========================================================================
// Empty tree
// ===========================================================================

#[test]
#[ignore]
fn empty_tree_shows_placeholder() {
    let site = TempDir::new().unwrap();
    let server = TestServer::start(site);
    let tab = open(&server);

    let text = eval_string(&tab, "document.querySelector('.empty-title').textContent");
    assert_eq!(text, "No images found");
    let has_viewer = tab
        .evaluate("!!document.getElementById('viewer')", false)
        .unwrap()
        .value
        .unwrap()
        .as_bool()
        .unwrap();
    assert!(!has_viewer);

    thread::sleep(Duration::from_millis(300));
    assert_eq!(eval_string(&tab, "document.body.dataset.phase"), "loading");
}
