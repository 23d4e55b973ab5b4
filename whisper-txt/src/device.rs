use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::DevicePreference;

/// The compute target the model is loaded onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Device {
    Cpu,
    Gpu { index: u32 },
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu { index } => match accelerator() {
                Some(backend) => write!(f, "{backend}:{index}"),
                None => write!(f, "gpu:{index}"),
            },
        }
    }
}

/// The accelerator backend compiled into whisper.cpp, if any.
pub fn accelerator() -> Option<&'static str> {
    if cfg!(feature = "cuda") {
        Some("cuda")
    } else if cfg!(feature = "metal") {
        Some("metal")
    } else if cfg!(feature = "vulkan") {
        Some("vulkan")
    } else {
        None
    }
}

/// Pick the device to load the model onto.
pub fn select_device(preference: DevicePreference, gpu_device: u32) -> Device {
    let device = resolve(preference, accelerator().is_some(), gpu_device);
    info!(%device, "using device");
    device
}

fn resolve(preference: DevicePreference, accelerator_available: bool, gpu_device: u32) -> Device {
    match preference {
        DevicePreference::Auto if accelerator_available => Device::Gpu { index: gpu_device },
        _ => Device::Cpu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_prefers_accelerator() {
        assert_eq!(
            resolve(DevicePreference::Auto, true, 1),
            Device::Gpu { index: 1 }
        );
    }

    #[test]
    fn test_auto_falls_back_to_cpu() {
        assert_eq!(resolve(DevicePreference::Auto, false, 0), Device::Cpu);
    }

    #[test]
    fn test_cpu_preference_ignores_accelerator() {
        assert_eq!(resolve(DevicePreference::Cpu, true, 0), Device::Cpu);
        assert_eq!(select_device(DevicePreference::Cpu, 3), Device::Cpu);
    }

    #[test]
    fn test_select_device_matches_compiled_backend() {
        let device = select_device(DevicePreference::Auto, 0);
        assert_eq!(matches!(device, Device::Gpu { .. }), accelerator().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert!(Device::Gpu { index: 2 }.to_string().ends_with(":2"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Device::Gpu { index: 0 }).unwrap();
        assert_eq!(json, r#"{"kind":"gpu","index":0}"#);
        let json = serde_json::to_string(&Device::Cpu).unwrap();
        assert_eq!(json, r#"{"kind":"cpu"}"#);
    }
}
