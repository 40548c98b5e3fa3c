//! Credential, session and entry stores exercised through `AppState`.
use journal_backend::error::AppError;
use journal_common::UserId;

use crate::test_utils::setup_test_env;

#[tokio::test]
async fn test_register_twice_for_many_names() {
    let app = setup_test_env().await;
    let names = ["alice", "Alice", "bob", "名前", "with space", "a.b-c_d"];

    for name in names {
        app.state.credentials.register(name, "pw").await.unwrap();
    }
    for name in names {
        let again = app.state.credentials.register(name, "pw").await;
        assert!(matches!(again, Err(AppError::AlreadyExists)), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_admits_one() {
    let app = setup_test_env().await;

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let credentials = app.state.credentials.clone();
            tokio::spawn(async move { credentials.register("race", "pw").await })
        })
        .collect();

    let mut created = Vec::new();
    let mut conflicts = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(id) => created.push(id),
            Err(AppError::AlreadyExists) => conflicts += 1,
            Err(other) => panic!("unexpected registration error: {other:?}"),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(conflicts, 7);
    assert_eq!(
        app.state.credentials.verify("race", "pw").await.unwrap(),
        Some(created[0])
    );
}

#[tokio::test]
async fn test_verify_matches_only_the_right_password() {
    let app = setup_test_env().await;
    let creds = &app.state.credentials;
    let alice = creds.register("alice", "pw1").await.unwrap();
    let bob = creds.register("bob", "pw1").await.unwrap();

    assert_ne!(alice, bob);
    assert_eq!(creds.verify("alice", "pw1").await.unwrap(), Some(alice));
    assert_eq!(creds.verify("bob", "pw1").await.unwrap(), Some(bob));
    for wrong in ["", "pw", "PW1", "pw1 ", "pw2"] {
        assert_eq!(creds.verify("alice", wrong).await.unwrap(), None, "{wrong:?}");
    }
    assert_eq!(creds.verify("carol", "pw1").await.unwrap(), None);
}

#[tokio::test]
async fn test_added_entry_is_most_recent() {
    let app = setup_test_env().await;
    let alice = app.state.credentials.register("alice", "pw").await.unwrap();
    let entries = &app.state.entries;

    for content in ["one", "two", "multi\nline", "<b>html</b>", "  padded  "] {
        let entry = entries.add(alice, content).await.unwrap();
        let listed = entries.list_for(alice).await.unwrap();
        assert_eq!(listed[0], entry);
        assert_eq!(listed[0].content, content);
    }
    assert_eq!(entries.list_for(alice).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_never_crosses_owners() {
    let app = setup_test_env().await;
    let mut users: Vec<UserId> = Vec::new();
    for name in ["u1", "u2", "u3"] {
        users.push(app.state.credentials.register(name, "pw").await.unwrap());
    }
    for (i, user) in users.iter().enumerate() {
        for n in 0..=i {
            app.state
                .entries
                .add(*user, &format!("entry {n} of {user}"))
                .await
                .unwrap();
        }
    }

    for (i, user) in users.iter().enumerate() {
        let listed = app.state.entries.list_for(*user).await.unwrap();
        assert_eq!(listed.len(), i + 1);
        assert!(listed.iter().all(|e| e.user_id == *user));
    }
}

#[tokio::test]
async fn test_sessions_are_per_identity() {
    let app = setup_test_env().await;
    let sessions = &app.state.sessions;
    let alice = app.state.credentials.register("alice", "pw").await.unwrap();
    let bob = app.state.credentials.register("bob", "pw").await.unwrap();

    let a = sessions.start(alice).await.unwrap();
    let b = sessions.start(bob).await.unwrap();
    assert_eq!(sessions.resolve(&a).await.unwrap(), Some(alice));
    assert_eq!(sessions.resolve(&b).await.unwrap(), Some(bob));

    sessions.end(&a).await.unwrap();
    assert_eq!(sessions.resolve(&a).await.unwrap(), None);
    assert_eq!(sessions.resolve(&b).await.unwrap(), Some(bob));
}

#[tokio::test]
async fn test_state_survives_reconnect() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let settings = crate::test_utils::test_settings(&temp_dir);

    let state = journal_backend::AppState::new(settings.clone()).await.unwrap();
    let alice = state.credentials.register("alice", "pw").await.unwrap();
    state.entries.add(alice, "persisted").await.unwrap();
    let token = state.sessions.start(alice).await.unwrap();
    state.db.close().await;

    let reopened = journal_backend::AppState::new(settings).await.unwrap();
    assert_eq!(reopened.credentials.verify("alice", "pw").await.unwrap(), Some(alice));
    assert_eq!(reopened.entries.list_for(alice).await.unwrap()[0].content, "persisted");
    assert_eq!(reopened.sessions.resolve(&token).await.unwrap(), Some(alice));
}
