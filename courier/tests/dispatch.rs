//! End-to-end dispatch tests.

mod common;

use common::{Echo, Frame, Line, Login, Opcode, Session, line};
use courier::{
    DispatchError, DispatchOutcome, Dispatcher, HandlerDescriptor, HandlerError, HandlerResult,
    Lifetime, Package, RawKey, RegistryBuilder,
    testing::{CountingAsyncHandler, CountingHandler, RecordingFilter},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

#[tokio::test]
async fn test_unknown_key_is_dropped_silently() {
    let journal = RecordingFilter::journal();
    let login = CountingAsyncHandler::new();
    let echo = CountingHandler::new();
    let registry = RegistryBuilder::<Session, Line>::new()
        .global_filter(RecordingFilter::new("global", &journal))
        .register(HandlerDescriptor::from_async(login.clone()).named("LOGIN"))
        .register(HandlerDescriptor::sync(echo.clone()).named("ECHO"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(registry).propagate_errors();
    let session = Session::new(1);

    let outcome = dispatcher.handle_message(&session, &line("PING", "")).await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Unrouted);
    assert_eq!(login.count(), 0);
    assert_eq!(echo.count(), 0);
    assert!(journal.lock().unwrap().is_empty());

    let outcome = dispatcher.handle_message(&session, &line("LOGIN", "ada")).await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Invoked);
    assert_eq!(login.count(), 1);
    assert_eq!(echo.count(), 0);
}

#[tokio::test]
async fn test_handlers_see_session_and_message() {
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(HandlerDescriptor::from_async(Login).named("LOGIN"))
        .register(HandlerDescriptor::sync(Echo).named("ECHO"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(registry);
    let session = Session::new(7);

    dispatcher
        .handle_message(&session, &line("LOGIN", "ada"))
        .await
        .unwrap();
    dispatcher
        .handle_message(&session, &line("ECHO", "hello"))
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.replies(), vec!["welcome ada", "hello"]);
}

#[tokio::test]
async fn test_handler_runs_once_per_call() {
    let sync = CountingHandler::new();
    let asynchronous = CountingAsyncHandler::new();
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(HandlerDescriptor::sync(sync.clone()).named("SYNC"))
        .register(HandlerDescriptor::from_async(asynchronous.clone()).named("ASYNC"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(registry);
    let session = Session::new(1);

    for _ in 0..3 {
        dispatcher
            .handle_message(&session, &line("SYNC", ""))
            .await
            .unwrap();
    }
    dispatcher
        .handle_message(&session, &line("ASYNC", ""))
        .await
        .unwrap();

    assert_eq!(sync.count(), 3);
    assert_eq!(asynchronous.count(), 1);
}

#[tokio::test]
async fn test_integer_keys() {
    let pongs = Arc::new(AtomicUsize::new(0));
    let counter = pongs.clone();
    let ping = move |session: &Session, frame: &Frame| -> HandlerResult {
        counter.fetch_add(1, Ordering::SeqCst);
        session.reply(format!("pong {}", frame.payload.len()));
        Ok(())
    };
    let registry = RegistryBuilder::<Session, Frame>::new()
        .register(HandlerDescriptor::sync(ping).keyed(0x02))
        .register(HandlerDescriptor::sync(CountingHandler::new()).keyed(0x7f))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(registry);
    let session = Session::new(1);

    let outcome = dispatcher
        .handle_message(&session, &Package::new(Opcode::Ping, vec![1, 2, 3]))
        .await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Invoked);

    let outcome = dispatcher
        .handle_message(&session, &Package::new(Opcode::Hello, vec![]))
        .await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Unrouted);

    assert_eq!(pongs.load(Ordering::SeqCst), 1);
    assert_eq!(session.replies(), vec!["pong 3"]);
}

#[tokio::test]
async fn test_per_call_factory_builds_fresh_handler() {
    let built = Arc::new(AtomicUsize::new(0));
    let factory_count = built.clone();
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(
            HandlerDescriptor::sync_factory(Lifetime::PerCall, move || {
                factory_count.fetch_add(1, Ordering::SeqCst);
                Echo
            })
            .named("ECHO"),
        )
        .build()
        .unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let dispatcher = Dispatcher::new(registry);
    let session = Session::new(1);
    for _ in 0..2 {
        dispatcher
            .handle_message(&session, &line("ECHO", "x"))
            .await
            .unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_singleton_factory_is_shared() {
    let built = Arc::new(AtomicUsize::new(0));
    let factory_count = built.clone();
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(
            HandlerDescriptor::async_factory(Lifetime::Singleton, move || {
                factory_count.fetch_add(1, Ordering::SeqCst);
                Login
            })
            .named("LOGIN"),
        )
        .build()
        .unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);

    let dispatcher = Dispatcher::new(registry);
    let session = Session::new(1);
    for user in ["ada", "grace"] {
        dispatcher
            .handle_message(&session, &line("LOGIN", user))
            .await
            .unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handler_panic_is_contained() {
    let exploding = |_: &Session, _: &Line| -> HandlerResult { panic!("index out of bounds") };
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(HandlerDescriptor::sync(exploding).named("BOOM"))
        .register(HandlerDescriptor::sync(Echo).named("ECHO"))
        .build()
        .unwrap();
    let session = Session::new(1);

    let swallowing = Dispatcher::new(registry);
    let outcome = swallowing.handle_message(&session, &line("BOOM", "")).await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Invoked);

    let propagating = swallowing.clone().propagate_errors();
    let error = propagating
        .handle_message(&session, &line("BOOM", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DispatchError::Handler {
            source: HandlerError::Panicked(ref message),
            ..
        } if message == "index out of bounds"
    ));

    // The session keeps working.
    swallowing
        .handle_message(&session, &line("ECHO", "still here"))
        .await
        .unwrap();
    assert_eq!(session.replies(), vec!["still here"]);
}

#[tokio::test]
async fn test_per_call_factory_panic_is_contained() {
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(
            HandlerDescriptor::sync_factory(Lifetime::PerCall, || -> Echo {
                panic!("factory down")
            })
            .named("ECHO"),
        )
        .register(HandlerDescriptor::from_async(Login).named("LOGIN"))
        .build()
        .unwrap();
    let session = Session::new(1);

    let swallowing = Dispatcher::new(registry);
    let outcome = swallowing.handle_message(&session, &line("ECHO", "x")).await;
    assert_eq!(outcome.unwrap(), DispatchOutcome::Invoked);

    let propagating = swallowing.clone().propagate_errors();
    let error = propagating
        .handle_message(&session, &line("ECHO", "x"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DispatchError::Handler {
            source: HandlerError::Panicked(ref message),
            ..
        } if message == "factory down"
    ));

    swallowing
        .handle_message(&session, &line("LOGIN", "ada"))
        .await
        .unwrap();
    assert_eq!(session.replies(), vec!["welcome ada"]);
}

#[tokio::test]
async fn test_sessions_dispatch_concurrently() {
    let echo = CountingAsyncHandler::new();
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(HandlerDescriptor::from_async(echo.clone()).keyed("ECHO"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    let tasks: Vec<_> = (0..8)
        .map(|id| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let session = Session::new(id);
                for _ in 0..10 {
                    dispatcher
                        .handle_message(&session, &line("ECHO", ""))
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(echo.count(), 80);
}

#[test]
fn test_raw_key_forms() {
    assert_eq!(RawKey::from("ECHO"), RawKey::Text("ECHO".to_string()));
    assert_eq!(RawKey::from(0x02u8), RawKey::Integer(2));
}
