#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    /// Time since the previous phase ended (or since the monitor started).
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: System,
    peak_memory_mb: u64,
    last_phase_at: Instant,
    slowest_phase: Option<(String, Duration)>,
}

/// Samples CPU and memory of the planner process between engine phases and
/// remembers which phase took longest.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    state: Mutex<MonitorState>,
    pid: Option<Pid>,
    start_time: Instant,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Resource monitoring unavailable: {}", e);
                None
            }
        };

        let now = Instant::now();
        Self {
            state: Mutex::new(MonitorState {
                system: System::new(),
                peak_memory_mb: 0,
                last_phase_at: now,
                slowest_phase: None,
            }),
            pid,
            start_time: now,
            enabled,
        }
    }

    /// Ends the current phase and samples the process. `None` when disabled
    /// or when the process cannot be inspected.
    pub fn snapshot(&self, phase: &str) -> Option<ResourceSnapshot> {
        if !self.enabled {
            return None;
        }

        let pid = self.pid?;
        let mut state = self.state.lock().ok()?;
        state.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );

        let process = state.system.process(pid)?;
        let cpu_usage = process.cpu_usage();
        let memory_mb = process.memory() / 1024 / 1024;

        let now = Instant::now();
        let phase_time = now.duration_since(state.last_phase_at);
        state.last_phase_at = now;
        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

        let slower = state
            .slowest_phase
            .as_ref()
            .map_or(true, |(_, slowest)| phase_time > *slowest);
        if slower {
            state.slowest_phase = Some((phase.to_string(), phase_time));
        }

        Some(ResourceSnapshot {
            cpu_usage,
            memory_mb,
            peak_memory_mb: state.peak_memory_mb,
            phase_time,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.snapshot(phase) {
            tracing::info!(
                "📊 {} took {:?} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                phase,
                stats.phase_time,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb
            );
        }
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let Ok(state) = self.state.lock() else {
            return;
        };

        tracing::info!(
            "📊 Total time: {:?}, peak memory: {}MB",
            self.start_time.elapsed(),
            state.peak_memory_mb
        );
        if let Some((phase, took)) = &state.slowest_phase {
            tracing::info!("📊 Slowest phase: {} ({:?})", phase, took);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// Without the cli feature there is no sysinfo; monitoring is a no-op.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
