// SPDX-License-Identifier: MIT

//! Capability probe: invoke the cracker's device-enumeration subcommand and
//! classify the result, falling back to a filesystem/PATH heuristic when the
//! enumeration output names no recognizable device type.

use hf_adapters::CrackerProcess;
use hf_core::Capability;
use std::path::Path;

/// Well-known GPU device nodes checked by the fallback probe when the
/// cracker's own enumeration is inconclusive.
const GPU_DEVICE_PATHS: &[&str] = &["/dev/nvidia0", "/dev/kfd", "/dev/dri/renderD128"];
/// Vendor management utilities whose presence on `PATH` implies a GPU.
const GPU_MANAGEMENT_BINARIES: &[&str] = &["nvidia-smi", "rocm-smi"];

/// Pull every `Type:`-labeled device string out of enumeration output, one
/// per matching line.
pub fn parse_device_types(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let idx = line.find("Type:")?;
            let value = line[idx + "Type:".len()..].trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}

/// GPU wins over CPU if both appear; `None` when neither is recognized,
/// signaling the caller to fall back to the heuristic probe.
pub fn classify_device_types(types: &[String]) -> Option<Capability> {
    if types.iter().any(|t| t.to_ascii_lowercase().contains("gpu")) {
        Some(Capability::Gpu)
    } else if types.iter().any(|t| t.to_ascii_lowercase().contains("cpu")) {
        Some(Capability::Cpu)
    } else {
        None
    }
}

fn binary_on_path(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(name).exists()))
        .unwrap_or(false)
}

/// Heuristic fallback: GPU device files or vendor management utilities on
/// `PATH` imply a GPU host; otherwise assume CPU.
pub fn fallback_probe() -> Capability {
    let has_gpu_evidence =
        GPU_DEVICE_PATHS.iter().any(|p| Path::new(p).exists()) || GPU_MANAGEMENT_BINARIES.iter().any(|b| binary_on_path(b));
    if has_gpu_evidence {
        Capability::Gpu
    } else {
        Capability::Cpu
    }
}

/// Run the full probe: enumerate devices through `cracker`, classify the
/// output, and fall back to the heuristic when classification is
/// inconclusive.
pub async fn probe(cracker: &dyn CrackerProcess) -> Capability {
    let output = match cracker.enumerate_devices().await {
        Ok(output) => output,
        Err(_) => return fallback_probe(),
    };
    let types = parse_device_types(&output);
    classify_device_types(&types).unwrap_or_else(fallback_probe)
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
