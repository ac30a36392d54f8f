//! Browser clock for the workflow drivers.

use gloo_timers::future::TimeoutFuture;

use super::dom::now_ms;
use crate::core::deploy::Delay;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDelay;

impl Delay for BrowserDelay {
    fn now(&self) -> u64 {
        now_ms()
    }

    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// Sleep outside of a workflow.
pub async fn sleep(ms: u32) {
    TimeoutFuture::new(ms).await;
}
