//! `#[component]` 组件与容器构建器的集成测试
//!
//! 每个测试使用独立模块中的组件类型，计数器互不干扰，测试可以并行执行。

use di_impl::Engine;
use infrastructure_composition::DiBuilder;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// 生成一个带构造计数的单例组件模块
macro_rules! tracked_singleton {
    ($module:ident) => {
        pub mod $module {
            use component_macros::component;
            use std::sync::atomic::{AtomicUsize, Ordering};

            pub static CREATED: AtomicUsize = AtomicUsize::new(0);

            pub struct TrackedService {
                pub id: usize,
            }

            #[component(singleton)]
            impl TrackedService {
                pub fn new() -> Self {
                    Self {
                        id: CREATED.fetch_add(1, Ordering::SeqCst) + 1,
                    }
                }
            }
        }
    };
}

fn package(module: &str) -> String {
    format!("{}::{}", module_path!(), module)
}

fn engine_from(builder: DiBuilder) -> Engine {
    let engine = Engine::new();
    builder.build_and_init(&engine).unwrap();
    engine
}

tracked_singleton!(named_singleton_duplicate);

#[test]
fn test_provide_named_singleton_creates_separate_instance() {
    use named_singleton_duplicate::{TrackedService, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("named_singleton_duplicate")])
            .provide_singleton_named("my_service", |_| Ok(Arc::new(TrackedService::new()))),
    );

    let unnamed = engine.get::<TrackedService>().unwrap();
    let named = engine.get_named::<TrackedService>("my_service").unwrap();

    assert_eq!(CREATED.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&unnamed, &named));
    assert_eq!(unnamed.id, 1);
    assert_eq!(named.id, 2);
}

tracked_singleton!(separate_named_keys);

#[test]
fn test_each_named_singleton_key_has_its_own_instance() {
    use separate_named_keys::{TrackedService, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .provide_singleton_named("service1", |_| Ok(Arc::new(TrackedService::new())))
            .provide_singleton_named("service2", |_| Ok(Arc::new(TrackedService::new()))),
    );

    let first = engine.get_named::<TrackedService>("service1").unwrap();
    let second = engine.get_named::<TrackedService>("service2").unwrap();

    assert_eq!(CREATED.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(
        &first,
        &engine.get_named::<TrackedService>("service1").unwrap()
    ));
}

tracked_singleton!(bind_named_shared);

#[test]
fn test_bind_named_shares_discovered_singleton() {
    use bind_named_shared::{TrackedService, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("bind_named_shared")])
            .bind_named::<TrackedService, TrackedService>("alias1", |service| service)
            .bind_named::<TrackedService, TrackedService>("alias2", |service| service),
    );

    let first = engine.get_named::<TrackedService>("alias1").unwrap();
    let second = engine.get_named::<TrackedService>("alias2").unwrap();
    let unnamed = engine.get::<TrackedService>().unwrap();

    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &unnamed));
}

tracked_singleton!(delegating_named);

#[test]
fn test_delegating_provide_named_shares_singleton() {
    use delegating_named::{TrackedService, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("delegating_named")])
            .provide_named("my_service", |resolver| {
                Ok(resolver.get::<TrackedService>()?)
            }),
    );

    let unnamed = engine.get::<TrackedService>().unwrap();
    let named = engine.get_named::<TrackedService>("my_service").unwrap();

    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&unnamed, &named));
}

tracked_singleton!(unscanned_named);

#[test]
fn test_named_singleton_without_scanning_is_auto_aliased() {
    use unscanned_named::{TrackedService, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .provide_singleton_named("my_service", |_| Ok(Arc::new(TrackedService::new()))),
    );

    let first = engine.get_named::<TrackedService>("my_service").unwrap();
    let second = engine.get_named::<TrackedService>("my_service").unwrap();
    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));

    let unnamed = engine.get::<TrackedService>().unwrap();
    assert!(Arc::ptr_eq(&first, &unnamed));
}

tracked_singleton!(manual_instance);

#[test]
fn test_manual_instance_overrides_discovered() {
    use manual_instance::{TrackedService, CREATED};

    let custom = Arc::new(TrackedService::new());
    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("manual_instance")])
            .instance(Arc::clone(&custom)),
    );

    let retrieved = engine.get::<TrackedService>().unwrap();
    assert!(Arc::ptr_eq(&custom, &retrieved));
    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
}

pub mod named_injection {
    use component_macros::component;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub static CREATED: AtomicUsize = AtomicUsize::new(0);

    pub struct Database;

    #[component(singleton)]
    impl Database {
        pub fn new() -> Self {
            CREATED.fetch_add(1, Ordering::SeqCst);
            Database
        }
    }

    pub struct ServiceConsumer {
        pub database: Arc<Database>,
    }

    #[component]
    impl ServiceConsumer {
        #[inject]
        pub fn new(#[named("primary")] database: Arc<Database>) -> Self {
            Self { database }
        }
    }
}

#[test]
fn test_named_parameter_injects_shared_singleton() {
    use named_injection::{Database, ServiceConsumer, CREATED};

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("named_injection")])
            .bind_named::<Database, Database>("primary", |database| database),
    );

    let consumer = engine.get::<ServiceConsumer>().unwrap();
    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(
        &engine.get::<Database>().unwrap(),
        &consumer.database
    ));
}

pub mod beans {
    use component_macros::component;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

    fn next_id() -> usize {
        NEXT_ID.fetch_add(1, Ordering::SeqCst)
    }

    pub struct SingletonBean {
        pub id: usize,
    }

    #[component(singleton)]
    impl SingletonBean {
        pub fn new() -> Self {
            Self { id: next_id() }
        }
    }

    pub struct PrototypeBean {
        pub id: usize,
    }

    #[component(prototype)]
    impl PrototypeBean {
        pub fn new() -> Self {
            Self { id: next_id() }
        }
    }

    pub struct ConsumerBean {
        pub singleton: Arc<SingletonBean>,
        pub first: Arc<PrototypeBean>,
        pub second: Arc<PrototypeBean>,
    }

    #[component]
    impl ConsumerBean {
        #[inject]
        pub fn new(
            singleton: Arc<SingletonBean>,
            first: Arc<PrototypeBean>,
            second: Arc<PrototypeBean>,
        ) -> Self {
            Self {
                singleton,
                first,
                second,
            }
        }
    }
}

#[test]
fn test_prototype_beans_injected_twice_are_distinct() {
    use beans::{ConsumerBean, SingletonBean};

    let engine = engine_from(DiBuilder::new().scan_packages([package("beans")]));

    let consumer = engine.get::<ConsumerBean>().unwrap();
    assert!(!Arc::ptr_eq(&consumer.first, &consumer.second));
    assert_ne!(consumer.first.id, consumer.second.id);

    let again = engine.get::<ConsumerBean>().unwrap();
    assert!(Arc::ptr_eq(&consumer.singleton, &again.singleton));
    assert!(Arc::ptr_eq(
        &consumer.singleton,
        &engine.get::<SingletonBean>().unwrap()
    ));
    assert!(!Arc::ptr_eq(&consumer.first, &again.first));
}

pub mod routing {
    use component_macros::component;
    use std::sync::Arc;

    pub trait Router: Send + Sync {
        fn route(&self) -> String;
    }

    pub struct Executor(pub &'static str);
    pub struct EventListener(pub &'static str);

    pub struct NamedRouter {
        executor: Arc<Executor>,
        listener: Arc<EventListener>,
    }

    impl Router for NamedRouter {
        fn route(&self) -> String {
            format!("{}->{}", self.executor.0, self.listener.0)
        }
    }

    #[component(singleton, provides(dyn Router))]
    impl NamedRouter {
        #[inject]
        fn create(
            #[named("executor_service")] executor: Arc<Executor>,
            #[named("event_listener")] listener: Arc<EventListener>,
        ) -> Self {
            Self { executor, listener }
        }
    }
}

#[test]
fn test_interface_resolves_through_named_dependencies() {
    use routing::{EventListener, Executor, NamedRouter, Router};

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("routing")])
            .instance_named("executor_service", Arc::new(Executor("pool")))
            .instance_named("event_listener", Arc::new(EventListener("audit"))),
    );

    let router = engine.get::<dyn Router>().unwrap();
    assert_eq!(router.route(), "pool->audit");
    assert!(Arc::ptr_eq(
        &router,
        &(engine.get::<NamedRouter>().unwrap() as Arc<dyn Router>)
    ));
}

pub mod broken {
    use component_macros::component;
    use std::sync::Arc;

    pub struct Settings;

    #[component]
    impl Settings {
        fn new() -> Self {
            Settings
        }
    }

    pub struct Loader;

    #[component]
    impl Loader {
        #[inject]
        fn create(_settings: Arc<Settings>) -> anyhow::Result<Self> {
            anyhow::bail!("配置源不可用")
        }
    }

    impl Settings {
        pub fn build() -> Self {
            Self::new()
        }
    }
}

#[test]
fn test_missing_constructor_and_failing_constructor() {
    use broken::{Loader, Settings};
    use infrastructure_common::{DependencyError, Key};

    let engine = engine_from(DiBuilder::new().scan_packages([package("broken")]));

    let err = engine.get::<Settings>().err().unwrap();
    assert!(err.is_configuration());
    assert_eq!(err.key(), Some(&Key::of::<Settings>()));

    let engine = engine_from(
        DiBuilder::new()
            .scan_packages([package("broken")])
            .instance(Arc::new(Settings::build())),
    );
    match engine.get::<Loader>() {
        Err(DependencyError::ResolutionFailed { key, source }) => {
            assert_eq!(key, Key::of::<Loader>());
            assert!(source.to_string().contains("配置源不可用"));
        }
        other => panic!("期望解析失败, 实际: {:?}", other.err()),
    }
}

pub mod ordered {
    use component_macros::component;
    use std::sync::{Arc, Mutex};

    pub static RESOLVED: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    fn record(name: &'static str) {
        RESOLVED.lock().unwrap().push(name);
    }

    pub struct First;
    pub struct Second;
    pub struct Third;

    #[component]
    impl First {
        pub fn new() -> Self {
            record("first");
            First
        }
    }

    #[component]
    impl Second {
        pub fn new() -> Self {
            record("second");
            Second
        }
    }

    #[component]
    impl Third {
        pub fn new() -> Self {
            record("third");
            Third
        }
    }

    pub struct Pipeline;

    #[component]
    impl Pipeline {
        #[inject]
        pub fn new(_third: Arc<Third>, _first: Arc<First>, _second: Arc<Second>) -> Self {
            record("pipeline");
            Pipeline
        }
    }
}

#[test]
fn test_inject_parameters_resolve_in_declaration_order() {
    use ordered::{Pipeline, RESOLVED};

    let engine = engine_from(DiBuilder::new().scan_packages([package("ordered")]));
    engine.get::<Pipeline>().unwrap();

    assert_eq!(
        *RESOLVED.lock().unwrap(),
        ["third", "first", "second", "pipeline"]
    );
}
