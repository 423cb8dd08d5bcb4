//! 单例首次构造的按键锁

use infrastructure_common::{DependencyError, Key};
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::thread::{self, ThreadId};
use tracing::debug;

#[derive(Default)]
struct LockTable {
    /// 正在构造的键及其所属线程
    owners: HashMap<Key, ThreadId>,
    /// 正在等待某个键的线程
    waiting: HashMap<ThreadId, Key>,
}

/// 构造锁表
///
/// 每个绑定键一把锁，不同键的首次构造可以在不同线程上并行进行。
/// 线程在等待之前沿“等待 -> 持有”链检查，如果链最终回到自己，说明
/// 多个线程的构造过程互相依赖，直接报告循环依赖而不是挂起。
#[derive(Default)]
pub struct CreationLocks {
    table: Mutex<LockTable>,
    released: Condvar,
}

impl CreationLocks {
    /// 创建空锁表
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取键的构造锁
    ///
    /// `path` 是当前线程的解析链，以 `key` 结尾，只用于组装循环路径。
    pub fn acquire(&self, key: &Key, path: &[Key]) -> Result<CreationGuard<'_>, DependencyError> {
        let me = thread::current().id();
        let mut table = self.table.lock();

        loop {
            let owner = match table.owners.get(key).copied() {
                Some(owner) => owner,
                None => {
                    table.owners.insert(key.clone(), me);
                    return Ok(CreationGuard {
                        locks: self,
                        key: key.clone(),
                    });
                }
            };

            if let Some(chain) = wait_chain(&table, key, owner, me) {
                let cycle = close_cycle(path, &chain);
                debug!(%key, depth = chain.len(), "跨线程构造形成环");
                return Err(DependencyError::CircularDependency { cycle });
            }

            table.waiting.insert(me, key.clone());
            self.released.wait(&mut table);
            table.waiting.remove(&me);
        }
    }

    /// 正在构造中的键数量
    pub fn in_progress(&self) -> usize {
        self.table.lock().owners.len()
    }

    fn release(&self, key: &Key) {
        self.table.lock().owners.remove(key);
        self.released.notify_all();
    }
}

/// 构造锁守卫，析构时释放并唤醒等待者
pub struct CreationGuard<'a> {
    locks: &'a CreationLocks,
    key: Key,
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// 从请求的键出发沿等待链前进，回到当前线程持有的键时返回途经的键
fn wait_chain(table: &LockTable, key: &Key, owner: ThreadId, me: ThreadId) -> Option<Vec<Key>> {
    let mut chain = vec![key.clone()];
    let mut owner = owner;
    loop {
        if owner == me {
            return Some(chain);
        }
        let waiting = table.waiting.get(&owner)?;
        let next = *table.owners.get(waiting)?;
        if chain.contains(waiting) {
            return None;
        }
        chain.push(waiting.clone());
        owner = next;
    }
}

/// 组装循环路径
///
/// `chain` 以请求的键开头、以当前线程持有的键结尾。持有的键在本线程
/// 解析链上时从它开始截取，否则以它作为起点。
fn close_cycle(path: &[Key], chain: &[Key]) -> Vec<Key> {
    let held = &chain[chain.len() - 1];
    let mut cycle = match path.iter().position(|k| k == held) {
        Some(start) if start + 1 < path.len() => path[start..].to_vec(),
        _ => vec![held.clone(), chain[0].clone()],
    };
    cycle.extend(chain[1..].iter().cloned());
    cycle
}
