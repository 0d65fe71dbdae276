//! Chat command handler tests.

use std::sync::Arc;
use taptoearn_core::{
    chat::{CommandHandler, IncomingMessage, FAILURE_REPLY, UNREGISTERED_REPLY},
    config::AppConfig,
    store::PlayerStore,
};

fn build() -> (CommandHandler, Arc<PlayerStore>) {
    let store = Arc::new(PlayerStore::in_memory().expect("in-memory store"));
    store.ensure_schema().expect("schema");
    let config = AppConfig {
        public_url: "https://tap.example".into(),
        ..AppConfig::default()
    };
    (CommandHandler::new(store.clone(), config), store)
}

fn msg(chat_id: &str, username: Option<&str>, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id:  chat_id.into(),
        username: username.map(str::to_string),
        text:     text.into(),
    }
}

#[test]
fn start_registers_and_replies_with_personal_link() {
    let (handler, store) = build();
    let reply = handler.handle(&msg("100", Some("ann"), "/start")).unwrap();

    assert!(reply.contains("ann"), "reply should greet the user: {reply}");
    assert!(reply.contains("https://tap.example/?ref=100"), "missing link: {reply}");
    assert_eq!(store.get_balance("100").unwrap(), Some(0.0));
}

#[test]
fn start_without_username_uses_placeholder() {
    let (handler, store) = build();
    let reply = handler.start("100", None, None).unwrap();
    assert!(reply.contains("Anonymous"));
    assert_eq!(store.player("100").unwrap().unwrap().username, "Anonymous");
}

#[test]
fn start_with_referrer_pays_exactly_fifty() {
    let (handler, store) = build();
    handler.handle(&msg("A", Some("ann"), "/start")).unwrap();
    handler.handle(&msg("B", Some("bob"), "/start A")).unwrap();

    assert_eq!(store.get_balance("A").unwrap(), Some(50.0));
    assert_eq!(store.player("B").unwrap().unwrap().referrer.as_deref(), Some("A"));
}

/// Repeated `/start <ref>` keeps crediting the referrer.
#[test]
fn repeated_start_with_referrer_credits_each_time() {
    let (handler, store) = build();
    handler.handle(&msg("A", None, "/start")).unwrap();
    handler.handle(&msg("B", None, "/start A")).unwrap();
    handler.handle(&msg("B", None, "/start A")).unwrap();

    assert_eq!(store.get_balance("A").unwrap(), Some(100.0));
    assert_eq!(store.player_count().unwrap(), 2);
}

#[test]
fn repeated_start_keeps_first_username_and_referrer() {
    let (handler, store) = build();
    handler.handle(&msg("A", None, "/start")).unwrap();
    handler.handle(&msg("B", Some("bob"), "/start A")).unwrap();
    handler.handle(&msg("B", Some("robert"), "/start")).unwrap();

    let b = store.player("B").unwrap().unwrap();
    assert_eq!(b.username, "bob");
    assert_eq!(b.referrer.as_deref(), Some("A"));
    assert_eq!(b.balance, 0.0);
}

#[test]
fn self_referral_is_ignored() {
    let (handler, store) = build();
    handler.handle(&msg("A", None, "/start A")).unwrap();
    handler.handle(&msg("A", None, "/start A")).unwrap();
    assert_eq!(store.get_balance("A").unwrap(), Some(0.0));
}

#[test]
fn balance_reports_whole_coins() {
    let (handler, store) = build();
    handler.handle(&msg("A", None, "/start")).unwrap();
    store.credit("A", 12.4).unwrap();

    let reply = handler.handle(&msg("A", None, "/balance")).unwrap();
    assert!(reply.contains("12 coins"), "unexpected reply: {reply}");
}

#[test]
fn balance_for_unregistered_player_prompts_registration() {
    let (handler, _store) = build();
    let reply = handler.handle(&msg("ghost", None, "/balance")).unwrap();
    assert_eq!(reply, UNREGISTERED_REPLY);
    assert!(!reply.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn non_command_text_gets_no_reply() {
    let (handler, store) = build();
    assert!(handler.handle(&msg("A", None, "hello there")).is_none());
    assert_eq!(store.player_count().unwrap(), 0);
}

/// Without a schema every statement fails; the user hears about it.
#[test]
fn store_failure_yields_error_reply_not_success() {
    let store = Arc::new(PlayerStore::in_memory().unwrap());
    let handler = CommandHandler::new(store, AppConfig::default());

    assert!(handler.start("A", None, None).is_err());
    assert_eq!(handler.handle(&msg("A", None, "/start")).unwrap(), FAILURE_REPLY);
    assert_eq!(handler.handle(&msg("A", None, "/balance")).unwrap(), FAILURE_REPLY);
}
