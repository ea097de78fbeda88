const VIRTUAL_FSTYPES: &str = "tmpfs|devtmpfs|overlay|squashfs|ramfs|autofs|nsfs|fuse.*";
const VIRTUAL_NET_DEVICES: &str = "lo|veth.*|docker.*|br-.*|virbr.*|cali.*|flannel.*|cni.*|tun.*|vxlan.*";
const VIRTUAL_BLOCK_DEVICES: &str = "loop.*|ram.*|sr.*|dm-.*";

/// PromQL for every logical metric of one node-exporter target.
#[derive(Debug, Clone)]
pub(crate) struct HostQueries {
    pub up: String,
    pub cpu: String,
    pub memory_total: String,
    pub memory_available: String,
    pub filesystem_size: String,
    pub filesystem_avail: String,
    pub network_in: String,
    pub network_out: String,
    pub disk_read: String,
    pub disk_write: String,
    pub load1: String,
    pub load5: String,
    pub load15: String,
    pub boot_time: String,
}

impl HostQueries {
    pub(crate) fn for_target(target: &str) -> Self {
        let instance = format!("instance=\"{}\"", escape_label_value(target));
        let filesystem = format!("{},fstype!~\"{}\"", instance, VIRTUAL_FSTYPES);
        let network = format!("{},device!~\"{}\"", instance, VIRTUAL_NET_DEVICES);
        let block = format!("{},device!~\"{}\"", instance, VIRTUAL_BLOCK_DEVICES);

        Self {
            up: format!("up{{{}}}", instance),
            cpu: cpu_usage(&instance),
            memory_total: format!("node_memory_MemTotal_bytes{{{}}}", instance),
            memory_available: format!("node_memory_MemAvailable_bytes{{{}}}", instance),
            filesystem_size: format!("node_filesystem_size_bytes{{{}}}", filesystem),
            filesystem_avail: format!("node_filesystem_avail_bytes{{{}}}", filesystem),
            network_in: format!("irate(node_network_receive_bytes_total{{{}}}[5m])", network),
            network_out: format!("irate(node_network_transmit_bytes_total{{{}}}[5m])", network),
            disk_read: format!("irate(node_disk_read_bytes_total{{{}}}[5m])", block),
            disk_write: format!("irate(node_disk_written_bytes_total{{{}}}[5m])", block),
            load1: format!("node_load1{{{}}}", instance),
            load5: format!("node_load5{{{}}}", instance),
            load15: format!("node_load15{{{}}}", instance),
            boot_time: format!("node_boot_time_seconds{{{}}}", instance),
        }
    }
}

pub(crate) fn cpu_usage_query(target: &str) -> String {
    cpu_usage(&format!("instance=\"{}\"", escape_label_value(target)))
}

fn cpu_usage(instance: &str) -> String {
    format!(
        "100 - (avg(irate(node_cpu_seconds_total{{{},mode=\"idle\"}}[5m])) * 100)",
        instance
    )
}

fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
