use std::any::type_name;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use weave::{
    DiscoveredType, InjectError, Injector, Injectors, ResolveOptions, Role, ScanError,
    StaticCatalog,
};

trait Store: Send + Sync {
    fn name(&self) -> &str;
}

trait Ledger: Send + Sync {
    fn store(&self) -> Arc<dyn Store>;
}

trait Audit: Send + Sync {}

struct MemoryStore;

impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }
}

struct Books {
    store: Arc<dyn Store>,
}

impl Ledger for Books {
    fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }
}

impl Audit for Books {}

fn same<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

fn store_type(counter: Arc<AtomicUsize>) -> DiscoveredType {
    DiscoveredType::builder::<MemoryStore>()
        .role(Role::Repository)
        .contract::<dyn Store>(|it| it)
        .constructor(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(MemoryStore)
        })
        .build()
}

fn books_type(counter: Arc<AtomicUsize>) -> DiscoveredType {
    DiscoveredType::builder::<Books>()
        .role(Role::Service)
        .contract::<dyn Ledger>(|it| it)
        .contract::<dyn Audit>(|it| it)
        .inject::<dyn Store>("store")
        .constructor(move |deps| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Books {
                store: deps.take::<dyn Store>("store")?,
            })
        })
        .build()
}

struct Counters {
    store: Arc<AtomicUsize>,
    books: Arc<AtomicUsize>,
}

impl Counters {
    fn new() -> Self {
        Self {
            store: Arc::new(AtomicUsize::new(0)),
            books: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn catalog(&self) -> StaticCatalog {
        StaticCatalog::new()
            .register_type("ledger::repository", store_type(self.store.clone()))
            .register_type("ledger::service", books_type(self.books.clone()))
    }
}

#[test]
fn test_singletons() {
    let counters = Counters::new();
    let injector =
        Injector::scan("ledger", &counters.catalog(), ResolveOptions::default()).unwrap();

    let ledger = injector.get_instance::<dyn Ledger>().unwrap();
    let again = injector.get_instance::<dyn Ledger>().unwrap();
    assert!(same(&ledger, &again));

    // Another contract of the same concrete type shares the instance.
    let audit = injector.get_instance::<dyn Audit>().unwrap();
    assert!(same(&ledger, &audit));

    let store = injector.get_instance::<dyn Store>().unwrap();
    assert!(same(&ledger.store(), &store));
    assert_eq!(store.name(), "memory");

    assert_eq!(counters.store.load(Ordering::SeqCst), 1);
    assert_eq!(counters.books.load(Ordering::SeqCst), 1);
    assert_eq!(injector.instance_count(), 2);
}

#[test]
fn test_dependency_resolved_first() {
    let counters = Counters::new();
    let injector =
        Injector::scan("ledger", &counters.catalog(), ResolveOptions::default()).unwrap();

    let store = injector.get_instance::<dyn Store>().unwrap();
    assert_eq!(injector.instance_count(), 1);
    let ledger = injector.get_instance::<dyn Ledger>().unwrap();
    assert!(same(&ledger.store(), &store));
    assert_eq!(counters.store.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_binding() {
    let counters = Counters::new();
    let injector = Injector::scan(
        "ledger::repository",
        &counters.catalog(),
        ResolveOptions::default(),
    )
    .unwrap();

    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::NoBinding { contract }) => {
            assert_eq!(contract, type_name::<dyn Ledger>());
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(injector.instance_count(), 0);
}

#[test]
fn test_missing_dependency_binding() {
    let counters = Counters::new();
    let injector = Injector::scan(
        "ledger::service",
        &counters.catalog(),
        ResolveOptions::default(),
    )
    .unwrap();

    assert!(matches!(
        injector.get_instance::<dyn Ledger>(),
        Err(InjectError::NoBinding { .. })
    ));
    assert_eq!(counters.books.load(Ordering::SeqCst), 0);
}

#[test]
fn test_ambiguous_binding() {
    struct BackupStore;

    impl Store for BackupStore {
        fn name(&self) -> &str {
            "backup"
        }
    }

    let counters = Counters::new();
    let catalog = counters.catalog().register_type(
        "ledger::backup",
        DiscoveredType::builder::<BackupStore>()
            .role(Role::Repository)
            .contract::<dyn Store>(|it| it)
            .constructor(|_| Ok(BackupStore))
            .build(),
    );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();

    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::AmbiguousBinding {
            contract,
            candidates,
        }) => {
            assert_eq!(contract, type_name::<dyn Store>());
            assert!(candidates.contains(&type_name::<MemoryStore>()));
            assert!(candidates.contains(&type_name::<BackupStore>()));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(counters.books.load(Ordering::SeqCst), 0);
}

#[test]
fn test_untagged_not_bound() {
    let catalog = StaticCatalog::new().register_type(
        "ledger",
        DiscoveredType::builder::<MemoryStore>()
            .contract::<dyn Store>(|it| it)
            .constructor(|_| Ok(MemoryStore))
            .build(),
    );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();
    assert_eq!(injector.registry().len(), 1);
    assert!(matches!(
        injector.get_instance::<dyn Store>(),
        Err(InjectError::NoBinding { .. })
    ));
}

#[test]
fn test_missing_inject_marker() {
    struct Journal {
        _store: Arc<dyn Store>,
    }

    impl Ledger for Journal {
        fn store(&self) -> Arc<dyn Store> {
            self._store.clone()
        }
    }

    let counters = Counters::new();
    let catalog = StaticCatalog::new()
        .register_type("ledger", store_type(counters.store.clone()))
        .register_type(
            "ledger",
            DiscoveredType::builder::<Journal>()
                .role(Role::Service)
                .contract::<dyn Ledger>(|it| it)
                .unmarked::<dyn Store>("store")
                .constructor(|deps| {
                    Ok(Journal {
                        _store: deps.take::<dyn Store>("store")?,
                    })
                })
                .build(),
        );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();

    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::MissingInjectMarker { field, owner }) => {
            assert_eq!(field, "store");
            assert_eq!(owner, type_name::<Journal>());
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(injector.instance_count(), 0);
    assert_eq!(counters.store.load(Ordering::SeqCst), 0);
}

#[test]
fn test_construction_failure_discards_request() {
    struct Archive;

    struct Vault {
        _store: Arc<dyn Store>,
        _archive: Arc<Archive>,
    }

    impl Audit for Vault {}

    let counters = Counters::new();
    let catalog = StaticCatalog::new()
        .register_type("vault", store_type(counters.store.clone()))
        .register_type(
            "vault",
            DiscoveredType::builder::<Archive>()
                .role(Role::Repository)
                .contract::<Archive>(|it| it)
                .constructor(|_| Err("archive is offline".into()))
                .build(),
        )
        .register_type(
            "vault",
            DiscoveredType::builder::<Vault>()
                .role(Role::Service)
                .contract::<dyn Audit>(|it| it)
                .inject::<dyn Store>("store")
                .inject::<Archive>("archive")
                .constructor(|deps| {
                    Ok(Vault {
                        _store: deps.take::<dyn Store>("store")?,
                        _archive: deps.take::<Archive>("archive")?,
                    })
                })
                .build(),
        );
    let injector = Injector::scan("vault", &catalog, ResolveOptions::default()).unwrap();

    match injector.get_instance::<dyn Audit>() {
        Err(InjectError::Construction { type_name: name, source }) => {
            assert_eq!(name, type_name::<Archive>());
            assert_eq!(source.to_string(), "archive is offline");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    // The store was built for the failed request but never committed.
    assert_eq!(counters.store.load(Ordering::SeqCst), 1);
    assert_eq!(injector.instance_count(), 0);

    injector.get_instance::<dyn Store>().unwrap();
    assert_eq!(counters.store.load(Ordering::SeqCst), 2);
    assert_eq!(injector.instance_count(), 1);
}

#[test]
fn test_missing_constructor() {
    let catalog = StaticCatalog::new().register_type(
        "ledger",
        DiscoveredType::builder::<MemoryStore>()
            .role(Role::Repository)
            .contract::<dyn Store>(|it| it)
            .build(),
    );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();
    assert!(matches!(
        injector.get_instance::<dyn Store>(),
        Err(InjectError::Construction { type_name: name, .. }) if name == type_name::<MemoryStore>()
    ));
}

#[test]
fn test_dependency_taken_as_other_contract() {
    let counters = Counters::new();
    let catalog = StaticCatalog::new()
        .register_type("ledger", store_type(counters.store.clone()))
        .register_type(
            "ledger",
            DiscoveredType::builder::<Books>()
                .role(Role::Service)
                .contract::<dyn Ledger>(|it| it)
                .inject::<dyn Store>("store")
                .constructor(|deps| {
                    match deps.take::<dyn Audit>("store") {
                        Err(InjectError::DependencyMismatch {
                            owner,
                            field,
                            expected,
                        }) => {
                            assert_eq!(owner, type_name::<Books>());
                            assert_eq!(field, "store");
                            assert_eq!(expected, type_name::<dyn Audit>());
                        }
                        other => panic!("unexpected result: {:?}", other.map(|_| ())),
                    }
                    // A failed take leaves the dependency in place.
                    assert!(deps.contains("store"));
                    Ok(Books {
                        store: deps.take::<dyn Store>("store")?,
                    })
                })
                .build(),
        );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();

    let ledger = injector.get_instance::<dyn Ledger>().unwrap();
    assert_eq!(ledger.store().name(), "memory");
    assert_eq!(injector.instance_count(), 2);
}

#[test]
fn test_dependency_taken_under_unknown_field() {
    let counters = Counters::new();
    let catalog = StaticCatalog::new()
        .register_type("ledger", store_type(counters.store.clone()))
        .register_type(
            "ledger",
            DiscoveredType::builder::<Books>()
                .role(Role::Service)
                .contract::<dyn Ledger>(|it| it)
                .inject::<dyn Store>("store")
                .constructor(|deps| {
                    Ok(Books {
                        store: deps.take::<dyn Store>("stock")?,
                    })
                })
                .build(),
        );
    let injector = Injector::scan("ledger", &catalog, ResolveOptions::default()).unwrap();

    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::Construction { type_name: name, source }) => {
            assert_eq!(name, type_name::<Books>());
            assert!(matches!(
                source.downcast_ref::<InjectError>(),
                Some(InjectError::DependencyMismatch { field, .. }) if field == "stock"
            ));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(counters.store.load(Ordering::SeqCst), 1);
    assert_eq!(injector.instance_count(), 0);
}

#[test]
fn test_reentrant_request_fails() {
    let cell: Arc<OnceLock<Weak<Injector>>> = Arc::new(OnceLock::new());
    let counters = Counters::new();
    let catalog = StaticCatalog::new()
        .register_type("desk", store_type(counters.store.clone()))
        .register_type("desk", {
            let cell = cell.clone();
            DiscoveredType::builder::<Books>()
                .role(Role::Service)
                .contract::<dyn Ledger>(|it| it)
                .constructor(move |_| {
                    let injector = cell
                        .get()
                        .and_then(|v| v.upgrade())
                        .ok_or("injector is gone")?;
                    Ok(Books {
                        store: injector.get_instance::<dyn Store>()?,
                    })
                })
                .build()
        });
    let injector = Arc::new(Injector::scan("desk", &catalog, ResolveOptions::default()).unwrap());
    cell.set(Arc::downgrade(&injector)).unwrap();

    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::Construction { type_name: name, source }) => {
            assert_eq!(name, type_name::<Books>());
            assert!(matches!(
                source.downcast_ref::<InjectError>(),
                Some(InjectError::Construction { type_name: inner, .. })
                    if *inner == type_name::<dyn Store>()
            ));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(counters.store.load(Ordering::SeqCst), 0);
    assert_eq!(injector.instance_count(), 0);

    // The failed request released the injector.
    injector.get_instance::<dyn Store>().unwrap();
    assert_eq!(injector.instance_count(), 1);
}

#[test]
fn test_circular_dependency() {
    trait Ping: Send + Sync {}
    trait Pong: Send + Sync {}

    struct A {
        _pong: Arc<dyn Pong>,
    }
    impl Ping for A {}

    struct B {
        _ping: Arc<dyn Ping>,
    }
    impl Pong for B {}

    let catalog = StaticCatalog::new()
        .register_type(
            "cycle",
            DiscoveredType::builder::<A>()
                .name("A")
                .role(Role::Service)
                .contract::<dyn Ping>(|it| it)
                .inject::<dyn Pong>("pong")
                .constructor(|deps| {
                    Ok(A {
                        _pong: deps.take::<dyn Pong>("pong")?,
                    })
                })
                .build(),
        )
        .register_type(
            "cycle",
            DiscoveredType::builder::<B>()
                .name("B")
                .role(Role::Service)
                .contract::<dyn Pong>(|it| it)
                .inject::<dyn Ping>("ping")
                .constructor(|deps| {
                    Ok(B {
                        _ping: deps.take::<dyn Ping>("ping")?,
                    })
                })
                .build(),
        );
    let injector = Injector::scan("cycle", &catalog, ResolveOptions::default()).unwrap();

    match injector.get_instance::<dyn Ping>() {
        Err(InjectError::CircularDependency { chain }) => assert_eq!(chain, "A -> B -> A"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert_eq!(injector.instance_count(), 0);
}

#[test]
fn test_depth_limit() {
    let counters = Counters::new();
    let catalog = counters.catalog();

    let injector = Injector::scan("ledger", &catalog, ResolveOptions { max_depth: 1 }).unwrap();
    match injector.get_instance::<dyn Ledger>() {
        Err(InjectError::UnboundedRecursion { contract, limit }) => {
            assert_eq!(contract, type_name::<dyn Store>());
            assert_eq!(limit, 1);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    let injector = Injector::scan("ledger", &catalog, ResolveOptions { max_depth: 2 }).unwrap();
    assert!(injector.get_instance::<dyn Ledger>().is_ok());
}

#[test]
fn test_injectors_memoized() {
    let counters = Counters::new();
    let injectors = Injectors::with_catalog(counters.catalog());

    let first = injectors.for_root("ledger").unwrap();
    let second = injectors.for_root("ledger").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let service = injectors.for_root("ledger::service").unwrap();
    assert!(!Arc::ptr_eq(&first, &service));
    assert_eq!(service.root(), "ledger::service");

    assert!(matches!(
        injectors.for_root("ledger.service"),
        Err(InjectError::Scan(ScanError::MalformedSegment { .. }))
    ));
    assert!(matches!(
        injectors.for_root("billing"),
        Err(InjectError::Scan(ScanError::UnresolvedRoot { .. }))
    ));
    assert_eq!(injectors.roots(), vec!["ledger", "ledger::service"]);
}

#[test]
fn test_injectors_isolated() {
    let counters = Counters::new();
    let injectors = Injectors::with_catalog(counters.catalog());

    let first = injectors.for_root("ledger").unwrap();
    let second = injectors.for_root("ledger::repository").unwrap();
    let a = first.get_instance::<dyn Store>().unwrap();
    let b = second.get_instance::<dyn Store>().unwrap();
    assert!(!same(&a, &b));
    assert_eq!(counters.store.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_first_use() {
    let counters = Counters::new();
    let injectors = Injectors::with_catalog(counters.catalog());

    let ledgers: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    injectors
                        .for_root("ledger")
                        .unwrap()
                        .get_instance::<dyn Ledger>()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|v| v.join().unwrap()).collect()
    });

    for ledger in &ledgers[1..] {
        assert!(same(&ledgers[0], ledger));
    }
    assert_eq!(counters.books.load(Ordering::SeqCst), 1);
    assert_eq!(counters.store.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_append_only() {
    use std::any::{Any, TypeId};
    use weave::InstanceCache;

    let mut cache = InstanceCache::new();
    assert!(cache.is_empty());

    let first: Arc<dyn Any + Send + Sync> = Arc::new(MemoryStore);
    let second: Arc<dyn Any + Send + Sync> = Arc::new(MemoryStore);
    let kept = cache.put(TypeId::of::<MemoryStore>(), first.clone());
    assert!(Arc::ptr_eq(&kept, &first));
    let kept = cache.put(TypeId::of::<MemoryStore>(), second);
    assert!(Arc::ptr_eq(&kept, &first));

    assert_eq!(cache.len(), 1);
    assert!(cache.contains(TypeId::of::<MemoryStore>()));
    assert!(cache.get(TypeId::of::<Books>()).is_none());
}
