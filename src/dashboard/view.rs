// Status cards: built empty first, then filled from a snapshot

use serde::Serialize;

use crate::format::{humanize_bytes, to_percent_string, to_percent_string_default};
use crate::models::SystemSnapshot;

const SYSTEM_INFO_ROWS: [&str; 7] = [
    "Host Name",
    "Operating System",
    "Boot Time",
    "Up Time",
    "Manufacturer",
    "Model",
    "Serial",
];
const MEMORY_ROWS: [&str; 3] = ["Memory Total", "Memory Available", "Memory Used"];
const CPU_ROWS: [&str; 3] = ["Cpu Utilization", "Load Average", "Per Cpu Utilization"];

const BOOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub label: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub rows: Vec<Row>,
    pub visible: bool,
}

impl Card {
    fn pending(title: &str, labels: &[&str]) -> Self {
        Self {
            title: title.into(),
            rows: labels
                .iter()
                .map(|l| Row {
                    label: (*l).into(),
                    value: None,
                })
                .collect(),
            visible: false,
        }
    }

    /// Sets row values in order and shows the card.
    fn filled(mut self, values: impl IntoIterator<Item = String>) -> Self {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.value = Some(value);
        }
        self.visible = true;
        self
    }

    /// Value of the row with `label`, if filled.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .and_then(|r| r.value.as_deref())
    }
}

/// Donut chart data: percentages per segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutChart {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

impl DonutChart {
    fn used_available(used_fraction: f64, used_color: &str, available_color: &str) -> Self {
        let used = (used_fraction * 100.0).clamp(0.0, 100.0);
        Self {
            labels: vec!["% Used".into(), "% Available".into()],
            data: vec![used, 100.0 - used],
            colors: vec![used_color.into(), available_color.into()],
        }
    }
}

/// Phase one: every card with its labels and no values, all hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSkeleton {
    pub system_info: Card,
    pub memory: Card,
    pub cpu: Card,
    pub disks: Card,
}

impl Default for StatusSkeleton {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase two: cards filled from a [`SystemSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub system_info: Card,
    pub memory: Card,
    pub memory_chart: DonutChart,
    pub cpu: Card,
    pub cpu_chart: DonutChart,
    pub disks: Card,
}

fn load_average_text(values: [f64; 3]) -> String {
    values
        .iter()
        .map(|v| {
            if *v < 0.0 {
                "n/a".to_string()
            } else {
                format!("{:.2}", v)
            }
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

fn bytes(value: u64, digits: i32) -> String {
    humanize_bytes(i64::try_from(value).unwrap_or(i64::MAX), digits)
}

impl StatusSkeleton {
    pub fn new() -> Self {
        Self {
            system_info: Card::pending("System Info", &SYSTEM_INFO_ROWS),
            memory: Card::pending("Memory Usage", &MEMORY_ROWS),
            cpu: Card::pending("Cpu Usage", &CPU_ROWS),
            // rows depend on how many file stores are mounted
            disks: Card::pending("Disk Usage", &[]),
        }
    }

    pub fn fill(self, snapshot: &SystemSnapshot) -> StatusView {
        let boot_time = snapshot
            .boot_local_time
            .map(|t| t.format(BOOT_TIME_FORMAT).to_string())
            .unwrap_or_else(|| "unknown".into());
        let system_info = self.system_info.filled([
            snapshot.host_name.clone(),
            snapshot.os_description.clone(),
            boot_time,
            snapshot.uptime_human.clone(),
            snapshot.manufacturer.clone(),
            snapshot.model.clone(),
            snapshot.serial.clone(),
        ]);

        let memory = self.memory.filled([
            bytes(snapshot.memory_total_bytes, 2),
            bytes(snapshot.memory_available_bytes, 2),
            bytes(snapshot.memory_used_bytes(), 2),
        ]);
        let memory_chart =
            DonutChart::used_available(snapshot.memory_used_fraction(), "coral", "green");

        let per_core = snapshot
            .per_core_load_fractions
            .iter()
            .map(|f| to_percent_string_default(*f))
            .collect::<Vec<_>>()
            .join(", ");
        let cpu = self.cpu.filled([
            to_percent_string(snapshot.cpu_load_fraction, 2),
            load_average_text(snapshot.load_averages()),
            per_core,
        ]);
        let cpu_chart =
            DonutChart::used_available(snapshot.cpu_load_fraction, "yellow", "lightgray");

        let mut disks = self.disks;
        disks.rows = snapshot
            .disk_summaries
            .iter()
            .map(|d| Row {
                label: d.label.clone(),
                value: Some(format!(
                    "{} free of {}",
                    bytes(d.free_bytes, 1),
                    bytes(d.total_bytes, 1)
                )),
            })
            .collect();
        disks.visible = true;

        StatusView {
            system_info,
            memory,
            memory_chart,
            cpu,
            cpu_chart,
            disks,
        }
    }
}
