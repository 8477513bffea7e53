// ABOUTME: Host CPU and memory sampling for the dashboard header
// Sampled on the refresh interval alongside session discovery

use sysinfo::System;

/// CPU and memory usage shown in the header, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostStats {
    pub cpu_percent: f32,
    pub used_memory: u64,
    pub total_memory: u64,
}

impl HostStats {
    pub fn memory_percent(&self) -> f32 {
        if self.total_memory == 0 {
            return 0.0;
        }
        self.used_memory as f32 / self.total_memory as f32 * 100.0
    }

    /// Header text, e.g. `CPU 12.5% | MEM 3.1/15.6 GiB (20%)`.
    pub fn summary(&self) -> String {
        format!(
            "CPU {:.1}% | MEM {:.1}/{:.1} GiB ({:.0}%)",
            self.cpu_percent,
            gib(self.used_memory),
            gib(self.total_memory),
            self.memory_percent()
        )
    }
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

pub struct StatsSampler {
    system: System,
}

impl StatsSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        // CPU usage is a delta between two refreshes; prime the first one
        system.refresh_cpu();
        Self { system }
    }

    pub fn sample(&mut self) -> HostStats {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        HostStats {
            cpu_percent: self.system.global_cpu_info().cpu_usage(),
            used_memory: self.system.used_memory(),
            total_memory: self.system.total_memory(),
        }
    }
}

impl Default for StatsSampler {
    fn default() -> Self {
        Self::new()
    }
}
