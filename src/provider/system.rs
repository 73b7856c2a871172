//! Host metrics read through `sysinfo`, NVML (`nvml` feature) and the Linux
//! power-supply class.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Local;
use sysinfo::{Disks, System};
use tracing::{debug, instrument, trace};

use super::{MetricsProvider, ProviderError, RawReadings, Sampling};

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

struct CpuState {
    system: System,
    /// Usage is only meaningful after two refreshes
    primed: bool,
}

/// Reads the local host.
pub struct SystemProvider {
    state: Arc<Mutex<CpuState>>,
    gpu: GpuReader,
    power_supply_root: PathBuf,
}

impl Default for SystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CpuState {
                system: System::new_all(),
                primed: false,
            })),
            gpu: GpuReader::detect(),
            power_supply_root: PathBuf::from(POWER_SUPPLY_ROOT),
        }
    }

    /// Look for batteries below `root` instead of `/sys/class/power_supply`.
    pub fn with_power_supply_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.power_supply_root = root.into();
        self
    }
}

#[async_trait]
impl MetricsProvider for SystemProvider {
    #[instrument(skip_all)]
    async fn sample(&self) -> Result<Sampling, ProviderError> {
        let state = self.state.clone();
        let gpu = self.gpu.clone();
        let root = self.power_supply_root.clone();

        // sysinfo refreshes block, and the first CPU read sleeps
        let sampling = tokio::task::spawn_blocking(move || {
            let timestamp = Local::now();
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);

            RawReadings {
                cpu: read_cpu(&mut state),
                ram: read_ram(&mut state.system),
                disk: read_disk(),
                gpu: gpu.read(),
                battery: read_battery(&root),
            }
            .into_sampling(timestamp)
        })
        .await
        .map_err(|e| ProviderError::Task(e.to_string()))??;

        for failure in &sampling.partial {
            debug!("{failure}");
        }
        trace!("sampled {:?}", sampling.sample);

        Ok(sampling)
    }
}

fn read_cpu(state: &mut CpuState) -> Result<f32, String> {
    state.system.refresh_cpu_usage();
    if !state.primed {
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        state.system.refresh_cpu_usage();
        state.primed = true;
    }

    if state.system.cpus().is_empty() {
        return Err("no CPUs reported".to_string());
    }
    Ok(state.system.global_cpu_usage())
}

fn read_ram(system: &mut System) -> Result<f32, String> {
    system.refresh_memory();

    let total = system.total_memory();
    if total == 0 {
        return Err("total memory reported as 0".to_string());
    }
    Ok(system.used_memory() as f32 / total as f32 * 100.0)
}

/// Usage of the volume mounted at `/`, or the first volume when there is none.
fn read_disk() -> Result<f32, String> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first())
        .ok_or_else(|| "no disks reported".to_string())?;

    let total = disk.total_space();
    if total == 0 {
        return Err(format!(
            "{} reports a size of 0",
            disk.mount_point().display()
        ));
    }
    let used = total.saturating_sub(disk.available_space());
    Ok(used as f32 / total as f32 * 100.0)
}

/// Capacity of the first supply whose `type` is `Battery`.
fn read_battery(root: &Path) -> Result<Option<f32>, String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("{}: {e}", root.display())),
    };

    let mut supplies: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    supplies.sort();

    for supply in supplies {
        let Ok(kind) = fs::read_to_string(supply.join("type")) else {
            continue;
        };
        if kind.trim() != "Battery" {
            continue;
        }

        let capacity = fs::read_to_string(supply.join("capacity"))
            .map_err(|e| format!("{}: {e}", supply.display()))?;
        let capacity = capacity.trim();
        return capacity
            .parse::<f32>()
            .map(Some)
            .map_err(|e| format!("invalid capacity {capacity:?}: {e}"));
    }

    Ok(None)
}

#[derive(Clone, Default)]
struct GpuReader {
    #[cfg(feature = "nvml")]
    nvml: Option<Arc<nvml_wrapper::Nvml>>,
}

impl GpuReader {
    #[cfg(feature = "nvml")]
    fn detect() -> Self {
        match nvml_wrapper::Nvml::init() {
            Ok(nvml) => Self {
                nvml: Some(Arc::new(nvml)),
            },
            Err(e) => {
                debug!("NVML unavailable, GPU usage will read as 0: {e}");
                Self { nvml: None }
            }
        }
    }

    #[cfg(not(feature = "nvml"))]
    fn detect() -> Self {
        Self::default()
    }

    /// Utilization of the first device.
    #[cfg(feature = "nvml")]
    fn read(&self) -> Result<Option<f32>, String> {
        let Some(nvml) = &self.nvml else {
            return Ok(None);
        };
        if nvml.device_count().map_err(|e| e.to_string())? == 0 {
            return Ok(None);
        }

        let device = nvml.device_by_index(0).map_err(|e| e.to_string())?;
        let utilization = device.utilization_rates().map_err(|e| e.to_string())?;
        Ok(Some(utilization.gpu as f32))
    }

    #[cfg(not(feature = "nvml"))]
    fn read(&self) -> Result<Option<f32>, String> {
        Ok(None)
    }
}
