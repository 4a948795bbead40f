//! Minimal render server — serves sessions until interrupted.
//!
//! Run with:
//!   cargo run --example render-server
//!
//! In another terminal:
//!   cargo run --features cli -- request /tmp/renderbridge-example/bridge.sock \
//!     --json '{"title":"Home","description":"An example page"}'

use std::fs;
use std::sync::atomic::AtomicBool;

use renderbridge::render::OutlineRenderer;
use renderbridge::transport::IpcAddress;
use renderbridge::Bridge;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sock_dir = std::env::temp_dir().join("renderbridge-example");
    fs::create_dir_all(&sock_dir)?;
    let addr = IpcAddress::from(sock_dir.join("bridge.sock"));

    let bridge = Bridge::bind(&addr, OutlineRenderer)?;
    eprintln!("Listening on {addr}");

    // Serve until killed; each session runs to client disconnect.
    let running = AtomicBool::new(true);
    bridge.serve(&running)?;

    let _ = fs::remove_dir_all(&sock_dir);
    Ok(())
}
