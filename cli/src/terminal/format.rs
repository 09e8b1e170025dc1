use std::collections::BTreeSet;

use crate::terminal::colors;
use colored::*;
use radar_common::network::device::DeviceRecord;

pub type Detail = (String, ColoredString);

pub fn ports_to_string(ports: &BTreeSet<u16>) -> String {
    if ports.is_empty() {
        return String::from("none");
    }
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn device_to_details(device: &DeviceRecord, show_hostname: bool) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("IPv4"),
        device.address.to_string().color(colors::IPV4_ADDR),
    )];

    if show_hostname && device.has_hostname() {
        details.push((String::from("Name"), device.hostname.as_str().normal()));
    }

    details.push((
        String::from("Type"),
        device.device_type.label().color(colors::DEVICE_TYPE),
    ));

    let ports = ports_to_string(&device.open_ports);
    let ports = if device.open_ports.is_empty() {
        ports.dimmed()
    } else {
        ports.color(colors::PORT)
    };
    details.push((String::from("Ports"), ports));

    details.push((
        String::from("Seen"),
        device.last_seen.format("%H:%M:%S").to_string().dimmed(),
    ));

    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
