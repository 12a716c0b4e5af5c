//! Machine status for the web dashboard: CPU, RAM and battery.

use std::time::Duration;

use serde::Serialize;
use sysinfo::System;

const BATTERY_CAPACITY_FILES: &[&str] = &[
    "/sys/class/power_supply/BAT0/capacity",
    "/sys/class/power_supply/BAT1/capacity",
];

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub cpu: f32,
    pub ram: f32,
    pub bat: u8,
}

/// Sample the machine. CPU usage needs two refreshes a short interval
/// apart, so this call takes ~200 ms.
pub async fn read() -> SystemStatus {
    tokio::task::spawn_blocking(|| {
        let mut sys = System::new();
        sys.refresh_cpu();
        std::thread::sleep(Duration::from_millis(200));
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu = sys.global_cpu_info().cpu_usage();
        let ram = if sys.total_memory() == 0 {
            0.0
        } else {
            (sys.used_memory() as f32 / sys.total_memory() as f32) * 100.0
        };

        SystemStatus {
            cpu,
            ram,
            bat: battery_percent(),
        }
    })
    .await
    .unwrap_or(SystemStatus {
        cpu: 0.0,
        ram: 0.0,
        bat: 100,
    })
}

/// Desktop machines have no battery file; report a full charge like the
/// rest of the status defaults.
fn battery_percent() -> u8 {
    for file in BATTERY_CAPACITY_FILES {
        if let Ok(content) = std::fs::read_to_string(file) {
            if let Some(value) = parse_capacity(&content) {
                return value;
            }
        }
    }
    100
}

fn parse_capacity(content: &str) -> Option<u8> {
    content.trim().parse::<u8>().ok().map(|v| v.min(100))
}
