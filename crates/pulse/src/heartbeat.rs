// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Heartbeat line formatting: density indicator + countdown (spec §4.D).

use qntx_worker::SystemMetrics;

const DENSITY_CAP: usize = 60;
const JOBS_PER_GLYPH: usize = 5;

/// One `#` per five active jobs, capped so the line never runs away.
pub fn density_indicator(active: usize) -> String {
    let glyphs = (active / JOBS_PER_GLYPH).min(DENSITY_CAP);
    "#".repeat(glyphs)
}

/// "in 12m" / "in 3s" for a future timestamp, "overdue" once it has passed.
pub fn countdown(now_ms: u64, next_run_at: Option<u64>) -> String {
    let Some(next_run_at) = next_run_at else { return "none scheduled".to_string() };
    if next_run_at <= now_ms {
        return "overdue".to_string();
    }
    format!("in {}", format_duration_ms(next_run_at - now_ms))
}

fn format_duration_ms(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Full heartbeat line, emitted only when active work changed since the
/// last tick.
pub fn heartbeat_line(active: usize, next_due_in: &str, metrics: &SystemMetrics) -> String {
    let density = density_indicator(active);
    let memory = match (metrics.memory_used_bytes, metrics.memory_total_bytes) {
        (Some(used), Some(total)) => {
            format!("{}/{}MB", used / (1024 * 1024), total / (1024 * 1024))
        }
        (Some(used), None) => format!("{}MB/n/a", used / (1024 * 1024)),
        (None, Some(total)) => format!("n/a/{}MB", total / (1024 * 1024)),
        (None, None) => "n/a".to_string(),
    };
    format!(
        "pulse: {active} active [{density}] next {next_due_in} | workers {}/{} mem {memory}",
        metrics.active_workers, metrics.total_workers
    )
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
