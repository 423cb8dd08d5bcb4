//! 并发解析测试

use di_abstractions::{ComponentDescriptor, Constructor, DependencyResolver, Instance};
use di_impl::{Engine, Registry};
use infrastructure_common::{DependencyError, Key};
use infrastructure_composition::DiBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;

/// 在屏障处同时放行所有线程，收集每个线程的结果
fn race<T, F>(engine: &Arc<Engine>, resolve: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(&Engine) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(THREADS));
    let resolve = Arc::new(resolve);
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = Arc::clone(engine);
            let barrier = Arc::clone(&barrier);
            let resolve = Arc::clone(&resolve);
            thread::spawn(move || {
                barrier.wait();
                resolve(&engine)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

struct SlowService {
    id: usize,
}

#[test]
fn test_concurrent_first_callers_share_one_instance() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);

    let engine = Arc::new(Engine::new());
    DiBuilder::new()
        .provide_singleton(move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(SlowService { id }))
        })
        .build_and_init(&engine)
        .unwrap();

    let resolved = race(&engine, |engine| engine.get::<SlowService>().unwrap());

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(resolved.iter().all(|service| service.id == 0));
    assert!(resolved
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

struct Upstream;
struct Downstream(#[allow(dead_code)] Arc<Upstream>);

#[test]
fn test_independent_calls_never_report_false_cycles() {
    let engine = Arc::new(Engine::new());
    DiBuilder::new()
        .provide(|_| {
            thread::sleep(Duration::from_millis(1));
            Ok(Arc::new(Upstream))
        })
        .provide(|resolver| Ok(Arc::new(Downstream(resolver.get::<Upstream>()?))))
        .build_and_init(&engine)
        .unwrap();

    let results = race(&engine, |engine| {
        (0..20)
            .map(|_| engine.get::<Downstream>().map(|_| ()))
            .collect::<Result<Vec<_>, DependencyError>>()
    });

    assert!(results.iter().all(Result::is_ok));
}

struct Alpha(#[allow(dead_code)] Arc<Beta>);
struct Beta(#[allow(dead_code)] Arc<Alpha>);

fn inject_alpha(resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
    thread::sleep(Duration::from_millis(5));
    let beta = resolver.get::<Beta>()?;
    Ok(Instance::from_value(Alpha(beta)))
}

fn inject_beta(resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
    thread::sleep(Duration::from_millis(5));
    let alpha = resolver.get::<Alpha>()?;
    Ok(Instance::from_value(Beta(alpha)))
}

#[test]
fn test_cyclic_singletons_across_threads_fail_without_deadlock() {
    let mut registry = Registry::new();
    registry.register_constructible(ComponentDescriptor::singleton::<Alpha>(Constructor::Inject(
        inject_alpha,
    )));
    registry.register_constructible(ComponentDescriptor::singleton::<Beta>(Constructor::Inject(
        inject_beta,
    )));

    let engine = Arc::new(Engine::new());
    engine.init(registry).unwrap();

    // 一半线程从 Alpha 开始，一半从 Beta 开始
    let started = Arc::new(AtomicUsize::new(0));
    let results = race(&engine, move |engine| {
        if started.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            engine.get::<Alpha>().map(|_| ()).err()
        } else {
            engine.get::<Beta>().map(|_| ()).err()
        }
    });

    for err in results {
        let err = err.unwrap();
        let cycle = err.cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.contains(&Key::of::<Alpha>()));
        assert!(cycle.contains(&Key::of::<Beta>()));
    }
}

struct Inner;
struct Outer(#[allow(dead_code)] Arc<Inner>);

#[test]
fn test_singleton_factory_may_wait_on_unrelated_singleton_from_another_thread() {
    let engine = Arc::new(Engine::new());
    let worker_engine = Arc::clone(&engine);
    DiBuilder::new()
        .provide_singleton(|_| Ok(Arc::new(Inner)))
        .provide_singleton(move |_| {
            let engine = Arc::clone(&worker_engine);
            let inner = thread::spawn(move || engine.get::<Inner>())
                .join()
                .map_err(|_| anyhow::anyhow!("工作线程崩溃"))??;
            Ok(Arc::new(Outer(inner)))
        })
        .build_and_init(&engine)
        .unwrap();

    let (tx, rx) = mpsc::channel();
    let resolving = Arc::clone(&engine);
    thread::spawn(move || {
        let _ = tx.send(resolving.get::<Outer>().map(|outer| Arc::clone(&outer.0)));
    });

    let inner = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Outer 的解析没有在限定时间内返回")
        .unwrap();
    assert!(Arc::ptr_eq(&inner, &engine.get::<Inner>().unwrap()));
}

#[test]
fn test_clear_while_resolving_keeps_snapshot() {
    let engine = Arc::new(Engine::new());
    DiBuilder::new()
        .provide_singleton(|_| {
            thread::sleep(Duration::from_millis(10));
            Ok(Arc::new(SlowService { id: 99 }))
        })
        .build_and_init(&engine)
        .unwrap();

    let resolving = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.get::<SlowService>().map(|service| service.id))
    };
    thread::sleep(Duration::from_millis(2));
    engine.clear();

    // 已经开始的解析使用旧状态完成，或者在清空后报配置错误
    match resolving.join().unwrap() {
        Ok(id) => assert_eq!(id, 99),
        Err(err) => assert!(err.is_configuration()),
    }
    assert!(!engine.is_initialized());
}
