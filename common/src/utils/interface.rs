use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    fn get_scannable_ipv4_nets(&self) -> Vec<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    /// IPv4 networks worth sweeping: no loopback, link-local (APIPA) or unspecified.
    fn get_scannable_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .filter(|net| {
                let ip = net.ip();
                !ip.is_loopback() && !ip.is_link_local() && !ip.is_unspecified()
            })
            .collect()
    }
}
