use crate::{
    compute::{FaultInjectionPolicy, UrlMap},
    error::Result,
    logger,
};

use super::locator::{find_or_create_fault_injection_policy, remove_fault_injection_policy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayFault {
    pub percentage: f64,
    pub seconds: i64,
    pub nanos: i32,
}

impl Default for DelayFault {
    fn default() -> Self {
        Self {
            percentage: 50.0,
            seconds: 1,
            nanos: 0,
        }
    }
}

impl DelayFault {
    pub fn apply_to(&self, policy: &mut FaultInjectionPolicy) {
        let delay = policy.delay.get_or_insert_with(Default::default);

        delay.percentage = self.percentage;
        delay.fixed_delay.seconds = self.seconds;
        delay.fixed_delay.nanos = self.nanos;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbortFault {
    pub percentage: f64,
    pub http_status: i64,
}

impl Default for AbortFault {
    fn default() -> Self {
        Self {
            percentage: 50.0,
            http_status: 400,
        }
    }
}

impl AbortFault {
    pub fn apply_to(&self, policy: &mut FaultInjectionPolicy) {
        let abort = policy.abort.get_or_insert_with(Default::default);

        abort.percentage = self.percentage;
        abort.http_status = self.http_status;
    }
}

/// Edit applied to the fault injection policy of one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    Delay(DelayFault),
    Abort(AbortFault),
    Remove,
}

impl Mutation {
    pub fn apply(&self, url_map: &mut UrlMap, matcher_name: &str, path: &str) -> Result<()> {
        match self {
            Self::Delay(delay) => {
                let policy = find_or_create_fault_injection_policy(url_map, matcher_name, path)?;
                delay.apply_to(policy);

                logger!(
                    info,
                    "set delay on {}{}: percentage={} seconds={} nanos={}",
                    matcher_name,
                    path,
                    delay.percentage,
                    delay.seconds,
                    delay.nanos
                );
            }
            Self::Abort(abort) => {
                let policy = find_or_create_fault_injection_policy(url_map, matcher_name, path)?;
                abort.apply_to(policy);

                logger!(
                    info,
                    "set abort on {}{}: percentage={} http_status={}",
                    matcher_name,
                    path,
                    abort.percentage,
                    abort.http_status
                );
            }
            Self::Remove => {
                if remove_fault_injection_policy(url_map, matcher_name, path) {
                    logger!(info, "removed fault injection policy from {}{}", matcher_name, path);
                }
            }
        }

        Ok(())
    }
}
