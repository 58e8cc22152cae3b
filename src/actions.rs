pub mod lb;
pub mod neg;

pub use lb::{
    inject_traffic_delay, inject_traffic_faults, remove_fault_injection_traffic_policy,
    TrafficTarget,
};
pub use neg::{attach_network_endpoint_group, detach_network_endpoint_group};
