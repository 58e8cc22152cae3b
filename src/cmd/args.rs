mod network_endpoint;
mod output_format;

pub use network_endpoint::*;
pub use output_format::*;
