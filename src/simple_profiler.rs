//! Simple profiling macros using thread-local storage
//!
//! Lightweight timing of solver and evaluator calls without changing function signatures.
//! Enable with environment variable: GREAT_ESCAPE_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

thread_local! {
    static SOLVE_TIME: RefCell<u64> = RefCell::new(0);
    static SOLVE_COUNT: RefCell<usize> = RefCell::new(0);

    static EVALUATE_TIME: RefCell<u64> = RefCell::new(0);
    static EVALUATE_COUNT: RefCell<usize> = RefCell::new(0);
}

static GLOBAL_SOLVE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SOLVE_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_EVALUATE_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_EVALUATE_COUNT: AtomicUsize = AtomicUsize::new(0);

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("GREAT_ESCAPE_PROFILE").is_ok()
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        match self.category {
            "solve" => {
                SOLVE_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                SOLVE_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "evaluate" => {
                EVALUATE_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                EVALUATE_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            _ => {}
        }
    }
}

pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    SOLVE_TIME.with(|t| {
        GLOBAL_SOLVE_TIME.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
    SOLVE_COUNT.with(|c| {
        GLOBAL_SOLVE_COUNT.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
    EVALUATE_TIME.with(|t| {
        GLOBAL_EVALUATE_TIME.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
    EVALUATE_COUNT.with(|c| {
        GLOBAL_EVALUATE_COUNT.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

fn print_category(name: &str, time_ns: u64, count: usize, total_ns: u64) {
    let ms = time_ns as f64 / 1_000_000.0;
    let pct = if total_ns > 0 { 100.0 * time_ns as f64 / total_ns as f64 } else { 0.0 };
    let avg_us = if count > 0 { time_ns as f64 / (count * 1000) as f64 } else { 0.0 };

    eprintln!("{}:", name);
    eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
    eprintln!("  Calls:    {}", count);
    eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    print_category(
        "Shortest-Path Solver",
        GLOBAL_SOLVE_TIME.load(Ordering::Relaxed),
        GLOBAL_SOLVE_COUNT.load(Ordering::Relaxed),
        total_ns,
    );
    // Evaluator time includes the solver runs it triggers
    print_category(
        "Wall Evaluation",
        GLOBAL_EVALUATE_TIME.load(Ordering::Relaxed),
        GLOBAL_EVALUATE_COUNT.load(Ordering::Relaxed),
        total_ns,
    );

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
