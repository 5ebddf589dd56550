pub use crate::{
    config::*,
    mailer::{Mail, MemoryMailer},
    models::*,
    Config, Database, Error, Mailer, RateLimiter, Result, Unigate, UnigateEvent,
};

use async_std::channel::{unbounded, Receiver};

/// Fully in-memory Unigate instance for tests
pub fn for_test_with_config(config: Config) -> (Unigate, Receiver<UnigateEvent>) {
    let (s, r) = unbounded();

    (
        Unigate {
            config,
            database: Database::default(),
            mailer: Mailer::Memory(MemoryMailer::default()),
            rate_limiter: RateLimiter::default(),
            event_channel: Some(s),
        },
        r,
    )
}

pub fn for_test() -> (Unigate, Receiver<UnigateEvent>) {
    for_test_with_config(Config::default())
}

pub async fn for_test_authenticated_with_config(
    config: Config,
) -> (Unigate, Session, Account, Receiver<UnigateEvent>) {
    let (unigate, receiver) = for_test_with_config(config);

    let account = Account::new(
        &unigate,
        "Example Student".into(),
        "1234567@example.edu".into(),
        "password_insecure".into(),
        None,
        false,
        "127.0.0.1".into(),
    )
    .await
    .unwrap();

    // clear this event
    receiver.try_recv().expect("an event");

    let session = account
        .create_session(&unigate, "my session".into(), 3600)
        .await
        .unwrap();

    // clear this event
    receiver.try_recv().expect("an event");

    (unigate, session, account, receiver)
}

pub async fn for_test_authenticated() -> (Unigate, Session, Account, Receiver<UnigateEvent>) {
    for_test_authenticated_with_config(Config::default()).await
}

/// Access the captured outbox behind a test instance
pub fn outbox(unigate: &Unigate) -> &MemoryMailer {
    match &unigate.mailer {
        Mailer::Memory(mailer) => mailer,
        _ => panic!("expected the in-memory mailer"),
    }
}
