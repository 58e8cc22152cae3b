mod locator;
mod mutation;

pub use locator::{find_or_create_fault_injection_policy, remove_fault_injection_policy};
pub use mutation::{AbortFault, DelayFault, Mutation};
