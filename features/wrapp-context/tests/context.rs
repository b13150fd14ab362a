use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier, Mutex,
    },
    thread,
    time::Duration,
};

use proptest::prelude::*;
use wrapp_context::{
    shared, Cleanup, Context, Factories, Factory, Instance, Product, ResolveError,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn entry(name: &str, factory: impl Factory + 'static) -> (String, Arc<dyn Factory>) {
    let factory: Arc<dyn Factory> = Arc::new(factory);
    (name.to_string(), factory)
}

/// Factory handing out a fresh token per construction, after a short sleep
fn slow_token_factory(constructions: Arc<AtomicUsize>) -> impl Factory + 'static {
    move || {
        thread::sleep(Duration::from_millis(20));
        let token = constructions.fetch_add(1, Ordering::SeqCst);
        Product::new(token, Cleanup::noop())
    }
}

#[test]
fn concurrent_resolutions_of_a_shared_factory_construct_once() {
    init_logging();
    let constructions = Arc::new(AtomicUsize::new(0));
    let ctx = Context::new(Factories::from([entry(
        "token",
        shared(slow_token_factory(constructions.clone())),
    )]));

    let start = Barrier::new(100);
    let products: Vec<Instance> = thread::scope(|scope| {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                scope.spawn(|| {
                    start.wait();
                    ctx.resolve("token").unwrap()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.disposable_count(), 100);
    for product in &products {
        assert_eq!(*product.downcast::<usize>().unwrap(), 0);
        assert!(Instance::ptr_eq(product, &products[0]));
    }
}

#[test]
fn concurrent_resolutions_of_a_shared_factory_hand_out_one_cleanup() {
    init_logging();
    let constructions = Arc::new(AtomicUsize::new(0));
    let factory = shared(slow_token_factory(constructions.clone()));

    let cleanups: Vec<Cleanup> = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| factory.construct().unwrap().cleanup))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert!(cleanups
        .iter()
        .all(|cleanup| Cleanup::ptr_eq(cleanup, &cleanups[0])));
}

#[test]
fn concurrent_resolutions_of_a_plain_factory_construct_each_time() {
    init_logging();
    let constructions = Arc::new(AtomicUsize::new(0));
    let ctx = Context::new(Factories::from([entry(
        "token",
        slow_token_factory(constructions.clone()),
    )]));

    thread::scope(|scope| {
        for _ in 0..20 {
            scope.spawn(|| ctx.resolve("token").unwrap());
        }
    });

    assert_eq!(constructions.load(Ordering::SeqCst), 20);
    assert_eq!(ctx.disposable_count(), 20);
}

#[test]
fn different_names_resolve_independently() {
    init_logging();
    let slow = Arc::new(AtomicUsize::new(0));
    let ctx = Context::new(Factories::from([
        entry("slow", shared(slow_token_factory(slow.clone()))),
        entry("fast", || Product::value("fast")),
    ]));

    thread::scope(|scope| {
        scope.spawn(|| ctx.resolve("slow").unwrap());
        for _ in 0..10 {
            scope.spawn(|| assert_eq!(*ctx.require::<&str>("fast"), "fast"));
        }
    });

    assert_eq!(slow.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.disposable_count(), 11);
}

/// Factory whose n-th cleanup records "{name}{n}"
fn recording_factory(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> impl Factory + 'static {
    let constructed = AtomicUsize::new(0);
    move || {
        let n = constructed.fetch_add(1, Ordering::SeqCst) + 1;
        let log = log.clone();
        Product::new(
            n,
            Cleanup::new(move || log.lock().unwrap().push(format!("{name}{n}"))),
        )
    }
}

#[test]
fn dispose_runs_cleanups_in_registration_order() {
    init_logging();
    let log = Arc::new(Mutex::new(Vec::new()));
    let ctx = Context::new(Factories::from([
        entry("a", recording_factory("a", log.clone())),
        entry("b", recording_factory("b", log.clone())),
    ]));

    ctx.resolve("a").unwrap();
    ctx.resolve("b").unwrap();
    ctx.resolve("a").unwrap();
    ctx.dispose().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a1", "b1", "a2"]);
}

#[test]
fn dispose_runs_the_shared_cleanup_once_per_resolution() {
    init_logging();
    let log = Arc::new(Mutex::new(Vec::new()));
    let ctx = Context::new(Factories::from([
        entry("a", shared(recording_factory("a", log.clone()))),
        entry("b", recording_factory("b", log.clone())),
    ]));

    ctx.resolve("a").unwrap();
    ctx.resolve("b").unwrap();
    ctx.resolve("a").unwrap();
    ctx.dispose().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a1", "b1", "a1"]);
}

#[test]
fn dispose_twice_runs_everything_again() {
    init_logging();
    let log = Arc::new(Mutex::new(Vec::new()));
    let ctx = Context::new(Factories::from([entry("a", recording_factory("a", log.clone()))]));

    ctx.resolve("a").unwrap();
    ctx.dispose().unwrap();
    ctx.dispose().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["a1", "a1"]);
}

#[test]
fn shared_factories_are_shared_between_contexts() {
    init_logging();
    let constructions = Arc::new(AtomicUsize::new(0));
    let factories = Arc::new(Factories::from([entry(
        "token",
        shared(slow_token_factory(constructions.clone())),
    )]));

    let first = Context::new(factories.clone());
    let second = Context::new(factories);

    let a = first.resolve("token").unwrap();
    let b = second.resolve("token").unwrap();
    assert!(Instance::ptr_eq(&a, &b));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert_eq!(first.disposable_count(), 1);
    assert_eq!(second.disposable_count(), 1);
}

#[test]
fn shared_failure_reaches_every_caller() {
    init_logging();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let ctx = Context::new(Factories::from([entry(
        "db",
        shared(move || -> Result<Product, std::io::Error> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::other("refused"))
        }),
    )]));

    thread::scope(|scope| {
        for _ in 0..10 {
            scope.spawn(|| {
                assert!(matches!(
                    ctx.resolve("db"),
                    Err(ResolveError::ConstructionFailed { .. })
                ));
            });
        }
    });

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.disposable_count(), 0);
}

proptest! {
    #[test]
    fn absent_names_never_resolve(
        registered in proptest::collection::hash_set("[a-z]{1,8}", 0..8),
        missing in "[A-Z]{1,8}",
    ) {
        let factories: Factories = registered
            .iter()
            .map(|name| entry(name, || Product::value(())))
            .collect();
        let ctx = Context::new(factories);

        match ctx.resolve(&missing) {
            Err(ResolveError::NotFound(name)) => prop_assert_eq!(name, missing),
            other => prop_assert!(false, "expected NotFound, got {:?}", other),
        }
        prop_assert_eq!(ctx.disposable_count(), 0);
    }

    #[test]
    fn plain_resolutions_construct_every_time(n in 0_usize..50) {
        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = constructions.clone();
        let ctx = Context::new(Factories::from([entry("db", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Product::value(())
        })]));

        for _ in 0..n {
            ctx.resolve("db").unwrap();
        }
        prop_assert_eq!(constructions.load(Ordering::SeqCst), n);
        prop_assert_eq!(ctx.disposable_count(), n);
    }

    #[test]
    fn shared_resolutions_construct_once(n in 1_usize..50, depth in 1_usize..4) {
        let constructions = Arc::new(AtomicUsize::new(0));
        let counter = constructions.clone();
        let mut factory = shared(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Product::value(())
        });
        for _ in 1..depth {
            factory = shared(factory);
        }
        let ctx = Context::new(Factories::from([entry("db", factory)]));

        for _ in 0..n {
            ctx.resolve("db").unwrap();
        }
        prop_assert_eq!(constructions.load(Ordering::SeqCst), 1);
        prop_assert_eq!(ctx.disposable_count(), n);
    }

    #[test]
    fn typed_resolution_returns_the_value_unchanged(value in any::<i64>()) {
        let ctx = Context::builder().add_instance("n", value).build().unwrap();

        prop_assert_eq!(*ctx.resolve_typed::<i64>("n").unwrap(), value);
        let mismatch = ctx.resolve_typed::<u64>("n");
        prop_assert!(matches!(mismatch, Err(ResolveError::TypeMismatch { .. })), "expected TypeMismatch");
    }
}
