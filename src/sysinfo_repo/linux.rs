// Linux-specific helpers: /proc/stat ticks, /etc/os-release, DMI.

use crate::provider::{CpuTicks, ProviderError};

const PROC_STAT: &str = "/proc/stat";

/// DMI reports this when a field is blank or unreadable (serial needs root).
pub(super) const UNKNOWN: &str = "unknown";

/// Aggregate and per-core tick counters from /proc/stat.
pub(super) fn read_proc_stat_ticks() -> Result<(CpuTicks, Vec<CpuTicks>), ProviderError> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string(PROC_STAT).map_err(|source| ProviderError::Io {
            source_name: PROC_STAT,
            source,
        })?;
        parse_proc_stat(&content)
    }
    #[cfg(not(target_os = "linux"))]
    Err(ProviderError::Unsupported("cpu tick counters"))
}

/// Parse the `cpu` and `cpuN` lines of /proc/stat.
///
/// Line format: `cpu user nice system idle iowait irq softirq steal guest guest_nice`.
/// Guest time is already counted in user/nice and is ignored.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_stat(content: &str) -> Result<(CpuTicks, Vec<CpuTicks>), ProviderError> {
    let mut aggregate = None;
    let mut per_core = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        if label == "cpu" {
            aggregate = Some(parse_cpu_fields(fields)?);
        } else if label.starts_with("cpu") && label[3..].parse::<u32>().is_ok() {
            per_core.push(parse_cpu_fields(fields)?);
        }
    }
    let aggregate = aggregate.ok_or_else(|| ProviderError::Parse {
        source_name: PROC_STAT,
        reason: "no aggregate cpu line".into(),
    })?;
    Ok((aggregate, per_core))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cpu_fields<'a>(fields: impl Iterator<Item = &'a str>) -> Result<CpuTicks, ProviderError> {
    let values = fields
        .take(8)
        .map(|f| f.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ProviderError::Parse {
            source_name: PROC_STAT,
            reason: e.to_string(),
        })?;
    // user nice system idle are always present; the rest depend on kernel version
    if values.len() < 4 {
        return Err(ProviderError::Parse {
            source_name: PROC_STAT,
            reason: format!("cpu line has {} fields, expected at least 4", values.len()),
        });
    }
    let field = |i: usize| values.get(i).copied().unwrap_or(0);
    Ok(CpuTicks {
        user: field(0),
        nice: field(1),
        system: field(2),
        idle: field(3),
        iowait: field(4),
        irq: field(5),
        softirq: field(6),
        steal: field(7),
    })
}

/// Read first "model name" from /proc/cpuinfo (Linux). Prefer over sysinfo when it returns "cpu0" etc.
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty() && *s != "cpu0")?;
                return Some(name.to_string());
            }
        }
    }
    None
}

/// PRETTY_NAME from /etc/os-release, e.g. "Ubuntu 24.04 LTS".
pub(super) fn read_os_pretty_name_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        let v = content
            .lines()
            .find_map(|line| line.strip_prefix("PRETTY_NAME="))?
            .trim_matches('"');
        if !v.is_empty() {
            return Some(v.to_string());
        }
    }
    None
}

/// Read a DMI attribute such as `sys_vendor` or `product_serial`.
pub(super) fn read_dmi_linux(attribute: &str) -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let v = std::fs::read_to_string(format!("/sys/class/dmi/id/{}", attribute)).ok()?;
        let v = v.trim();
        if v.is_empty() {
            return None;
        }
        Some(v.to_string())
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = attribute;
        None
    }
}
