//! 单次顶层解析的上下文

use crate::engine::EngineState;
use crate::providers::ConstructorProvider;
use di_abstractions::{ContainerOptions, DependencyResolver, Instance, ProviderRef, ResolutionFrame};
use infrastructure_common::{DependencyError, Key};
use tracing::{debug, trace};

/// 提供者查找结果
enum Selection {
    /// 直接使用的提供者
    Provider(ProviderRef),
    /// 无限定符请求自动别名到唯一的限定绑定
    Alias(Key),
}

/// 解析上下文
///
/// 持有引擎状态的快照和本次解析的帧，作为 [`DependencyResolver`] 传给
/// 每个提供者，嵌套解析因此共享同一个帧。
pub struct ResolveContext<'e> {
    state: &'e EngineState,
    options: &'e ContainerOptions,
    frame: ResolutionFrame,
}

impl<'e> ResolveContext<'e> {
    pub(crate) fn new(state: &'e EngineState, options: &'e ContainerOptions) -> Self {
        Self {
            state,
            options,
            frame: ResolutionFrame::new(),
        }
    }

    /// 当前解析帧
    pub fn frame(&self) -> &ResolutionFrame {
        &self.frame
    }

    fn select(&self, key: &Key) -> Result<Selection, DependencyError> {
        let registry = &self.state.registry;
        if let Some(provider) = registry.lookup(key) {
            return Ok(Selection::Provider(provider.clone()));
        }
        if key.is_qualified() {
            return Err(DependencyError::unresolved(key.clone(), "没有匹配该限定符的绑定"));
        }

        match registry.qualified_keys(key.type_id()) {
            [only] => Ok(Selection::Alias(only.clone())),
            [] => self.implicit(key),
            candidates => {
                let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                Err(DependencyError::unresolved(
                    key.clone(),
                    format!("存在多个限定绑定，无法自动选择: [{}]", names.join(", ")),
                ))
            }
        }
    }

    fn implicit(&self, key: &Key) -> Result<Selection, DependencyError> {
        let descriptor = self
            .options
            .implicit_constructors
            .then(|| self.state.registry.constructible(key.type_id()))
            .flatten()
            .ok_or_else(|| DependencyError::unresolved(key.clone(), "未注册提供者"))?;

        let provider = self
            .state
            .implicit
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(%key, constructor = descriptor.constructor.kind(), "合成隐式构造提供者");
                ConstructorProvider::from_descriptor(descriptor)
            })
            .value()
            .clone();
        Ok(Selection::Provider(provider))
    }

    fn resolve_alias(&mut self, key: &Key, target: &Key) -> Result<Instance, DependencyError> {
        let instance = self.resolve_key(target)?;
        let shared = self
            .state
            .registry
            .lookup(target)
            .is_some_and(|provider| provider.lifetime().is_singleton());
        if shared {
            debug!(%key, alias = %target, "自动别名发布单例");
            return Ok(self.state.cache.publish(key, instance));
        }
        Ok(instance)
    }
}

impl DependencyResolver for ResolveContext<'_> {
    fn resolve_key(&mut self, key: &Key) -> Result<Instance, DependencyError> {
        let state = self.state;
        if let Some(instance) = state.cache.get(key) {
            trace!(%key, "命中单例缓存");
            return Ok(instance);
        }

        let provider = match self.select(key)? {
            Selection::Provider(provider) => provider,
            Selection::Alias(target) => return self.resolve_alias(key, &target),
        };

        self.frame.enter(key)?;
        let singleton = provider.lifetime().is_singleton();
        let produced = if singleton {
            state
                .cache
                .lock_creation(key, self.frame.path())
                .and_then(|_creation| provider.produce(self))
        } else {
            provider.produce(self)
        };
        self.frame.exit();

        let instance = produced.map_err(|err| attach_key(key, err))?;
        if singleton {
            return Ok(state.cache.publish(key, instance));
        }
        Ok(instance)
    }
}

/// 把未带绑定键的工厂失败归到最内层正在解析的键上，其余错误原样传播
fn attach_key(key: &Key, err: DependencyError) -> DependencyError {
    match err {
        DependencyError::FactoryFailed { source } => DependencyError::ResolutionFailed {
            key: key.clone(),
            source,
        },
        other => other,
    }
}
