// Hardware provider backed by sysinfo plus Linux /proc and DMI reads

mod linux;

use sysinfo::{Disks, System};
use tracing::instrument;

use crate::provider::{CpuTicks, FileStore, HardwareProvider, ProviderError, StaticFacts};

/// Reads host facts fresh on every call; holds no tick or refresh state, so
/// concurrent sampling requests never observe each other's counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoRepo;

impl SysinfoRepo {
    pub fn new() -> Self {
        Self
    }
}

fn ensure_supported() -> Result<(), ProviderError> {
    if sysinfo::IS_SUPPORTED_SYSTEM {
        Ok(())
    } else {
        Err(ProviderError::Unsupported("system information"))
    }
}

fn os_description() -> String {
    let name = linux::read_os_pretty_name_linux()
        .or_else(System::long_os_version)
        .unwrap_or_else(|| std::env::consts::OS.into());
    match System::kernel_version() {
        Some(kernel) if !kernel.is_empty() => format!("{} build {}", name, kernel),
        _ => name,
    }
}

impl HardwareProvider for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_static_facts"))]
    fn read_static_facts(&self) -> Result<StaticFacts, ProviderError> {
        ensure_supported()?;
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();

        let cpu_model = linux::read_cpu_model_linux()
            .or_else(|| {
                sys.cpus()
                    .first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "Unknown".into());
        let dmi = |attribute: &str| {
            linux::read_dmi_linux(attribute).unwrap_or_else(|| linux::UNKNOWN.into())
        };

        Ok(StaticFacts {
            host_name: System::host_name().unwrap_or_default(),
            os_description: os_description(),
            boot_epoch_seconds: i64::try_from(System::boot_time()).unwrap_or(0),
            uptime_seconds: System::uptime(),
            manufacturer: dmi("sys_vendor"),
            model: dmi("product_name"),
            serial: dmi("product_serial"),
            cpu_model,
            memory_total_bytes: sys.total_memory(),
            memory_available_bytes: sys.available_memory(),
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_aggregate_ticks"))]
    fn read_aggregate_ticks(&self) -> Result<CpuTicks, ProviderError> {
        linux::read_proc_stat_ticks().map(|(aggregate, _)| aggregate)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_per_core_ticks"))]
    fn read_per_core_ticks(&self) -> Result<Vec<CpuTicks>, ProviderError> {
        linux::read_proc_stat_ticks().map(|(_, per_core)| per_core)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_load_averages"))]
    fn read_load_averages(&self, n: usize) -> Result<Vec<f64>, ProviderError> {
        ensure_supported()?;
        // sysinfo reports zeros on Windows rather than failing
        if cfg!(target_os = "windows") {
            return Ok(vec![crate::models::LOAD_AVERAGE_UNSUPPORTED; n]);
        }
        let load = System::load_average();
        Ok([load.one, load.five, load.fifteen]
            .into_iter()
            .take(n)
            .collect())
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_mounted_file_stores"))]
    fn read_mounted_file_stores(&self) -> Result<Vec<FileStore>, ProviderError> {
        ensure_supported()?;
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|d| FileStore {
                label: d.name().to_string_lossy().into_owned(),
                mount_point: d.mount_point().to_string_lossy().into_owned(),
                total_bytes: d.total_space(),
                free_bytes: d.available_space(),
            })
            .collect())
    }
}
