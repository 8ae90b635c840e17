//! Example: plain wait, timeout, cancel and done callback
//!
//! Run with: cargo run --example four_behaviors

use ouroboros_future::{submit, FutureHandle, TaskResult};
use std::thread;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== ouroboros-future Example ===\n");

    // Plain wait
    let plain = submit(|| {
        thread::sleep(Duration::from_secs(4));
        TaskResult::success("40")
    });
    println!("{}", plain.get());
    println!("------------");

    // Timeout
    let slow = submit(|| {
        thread::sleep(Duration::from_secs(2));
        TaskResult::success(30 + 23)
    });
    println!("{}", slow.get_with_timeout(Duration::from_secs(1)));
    println!("------------");

    // Cancel before the computation starts
    let cancelled = FutureHandle::new(|| {
        thread::sleep(Duration::from_secs(20));
        TaskResult::success("50")
    });
    println!("Cancel operation: {}", cancelled.cancel());
    println!("{}", cancelled.get());
    println!("------------");

    // Done callback
    let observed = submit(|| {
        thread::sleep(Duration::from_secs(2));
        TaskResult::success("50")
    });
    observed.add_done_callback(|| println!("Executing callback function"));
    println!("{}", observed.get());
    println!("------------");
}
