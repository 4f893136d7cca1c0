//! Wire packages through the mapper into the dispatcher.

mod common;

use common::{Echo, Frame, Line, Login, Session, decode_frame, parse_line};
use courier::{
    CourierError, DispatchError, DispatchOutcome, Dispatcher, HandlerDescriptor, MappingError,
    RegistryBuilder, testing::CountingHandler,
};

fn text_dispatcher() -> Dispatcher<Session, Line> {
    let registry = RegistryBuilder::<Session, Line>::new()
        .register(HandlerDescriptor::from_async(Login).named("LOGIN"))
        .register(HandlerDescriptor::sync(Echo).named("ECHO"))
        .build()
        .unwrap();
    Dispatcher::new(registry)
}

#[tokio::test]
async fn test_bad_package_does_not_affect_the_session() {
    let packages = text_dispatcher().with_mapper(parse_line);
    let session = Session::new(1);

    let inputs = ["LOGIN ada", "   ", "ECHO hello", "NOPE", "ECHO bye"];
    let mut outcomes = Vec::new();
    for input in inputs {
        outcomes.push(packages.handle(&session, input.to_string()).await.unwrap());
    }

    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Invoked,
            DispatchOutcome::Unmapped,
            DispatchOutcome::Invoked,
            DispatchOutcome::Unrouted,
            DispatchOutcome::Invoked,
        ]
    );
    assert_eq!(session.replies(), vec!["welcome ada", "hello", "bye"]);
}

#[tokio::test]
async fn test_mapping_error_propagates_when_configured() {
    let packages = text_dispatcher()
        .propagate_errors()
        .with_mapper(parse_line);
    let session = Session::new(1);

    let error = packages
        .handle(&session, String::new())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        DispatchError::Mapping(MappingError::MissingKey)
    ));

    let error = CourierError::from(error);
    assert_eq!(
        error.to_string(),
        "dispatch error: mapping error: package has no routing key"
    );
}

#[tokio::test]
async fn test_binary_frames() {
    let hello = CountingHandler::new();
    let registry = RegistryBuilder::<Session, Frame>::new()
        .register(HandlerDescriptor::sync(hello.clone()).keyed(0x01))
        .build()
        .unwrap();
    let frames = Dispatcher::new(registry).with_mapper(decode_frame);
    let session = Session::new(1);

    let outcome = frames.handle(&session, vec![0x01, 0xaa]).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Invoked);

    let outcome = frames.handle(&session, vec![0x42]).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Unmapped);

    let outcome = frames.handle(&session, Vec::new()).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Unmapped);

    let outcome = frames.handle(&session, vec![0x02]).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Unrouted);

    assert_eq!(hello.count(), 1);
}

#[tokio::test]
async fn test_closure_mapper() {
    let packages = text_dispatcher().with_mapper(|raw: &'static str| parse_line(raw.to_uppercase()));
    let session = Session::new(1);

    packages.handle(&session, "echo shout").await.unwrap();

    assert_eq!(session.replies(), vec!["SHOUT"]);
}
