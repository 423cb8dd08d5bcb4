//! 示例组件

use component_macros::component;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// 时钟
pub trait Clock: Send + Sync {
    /// 当前 Unix 秒数
    fn now(&self) -> u64;
}

/// 系统时钟
pub struct SystemClock;

#[component(singleton, provides(dyn Clock))]
impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// 固定时钟，用于命令行替换
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// 问候服务
pub struct Greeter {
    clock: Arc<dyn Clock>,
}

#[component(singleton)]
impl Greeter {
    #[inject]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn greet(&self, name: &str) -> String {
        format!("hello, {} (t={})", name, self.clock.now())
    }
}

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// 请求编号，每次解析生成新值
pub struct RequestId(pub u64);

#[component(prototype)]
impl RequestId {
    pub fn new() -> Self {
        Self(NEXT_REQUEST.fetch_add(1, Ordering::SeqCst))
    }
}
