use thiserror::Error;

pub fn get_network_interface_name(network_interface: &pcap::Device) -> String {
    #[cfg(target_os = "windows")]
    let name = if let Some(desc) = &network_interface.desc {
        desc.clone()
    } else {
        network_interface.name.clone()
    };

    #[cfg(not(target_os = "windows"))]
    let name = network_interface.name.clone();

    name
}

/// Get `Device` by its name or description.
///
/// Interfaces without addresses (mirror ports, bridge members) are valid targets.
pub fn get_network_interface(device_name: &str) -> Result<pcap::Device, InterfaceError> {
    let devices = pcap::Device::list().map_err(InterfaceError::PcapError)?;

    find_by_name(devices, device_name)
        .ok_or(InterfaceError::UnknownInterface(device_name.to_string()))
}

fn find_by_name(devices: Vec<pcap::Device>, device_name: &str) -> Option<pcap::Device> {
    devices.into_iter().find(|device| {
        device.name == device_name || device.desc.as_deref() == Some(device_name)
    })
}

/// Platform default capture device.
pub fn get_default_network_interface() -> Result<pcap::Device, InterfaceError> {
    pcap::Device::lookup()
        .map_err(InterfaceError::PcapError)?
        .ok_or(InterfaceError::NoDefaultInterface)
}

pub fn get_capture(
    device: pcap::Device, settings: &CaptureSettings,
) -> Result<pcap::Capture<pcap::Active>, InterfaceError> {
    let timeout = i32::try_from(settings.read_timeout_ms).unwrap_or(i32::MAX);

    pcap::Capture::from_device(device)
        .map_err(InterfaceError::PcapError)?
        .snaplen(SNAPSHOT_LENGTH)
        .promisc(settings.promiscuous)
        .timeout(timeout)
        .immediate_mode(true)
        .open()
        .map_err(InterfaceError::PcapError)
}

/// Largest frame kept whole.
pub const SNAPSHOT_LENGTH: i32 = 65535;

#[derive(Clone, Debug, PartialEq)]
pub struct CaptureSettings {
    pub interface: Option<String>,
    pub promiscuous: bool,
    pub read_timeout_ms: u32,
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Pcap Library error.")]
    PcapError(pcap::Error),

    #[error("There are no interfaces named \"{0}\".")]
    UnknownInterface(String),

    #[error("There is no default capture interface.")]
    NoDefaultInterface,
}
