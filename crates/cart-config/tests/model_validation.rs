// crates/cart-config/tests/model_validation.rs
// ============================================================================
// Module: Config Model Validation Tests
// Description: Section-level validation and store construction.
// Purpose: Ensure invalid combinations fail closed and valid ones build.
// Dependencies: cart-config, cart-core, tempfile
// ============================================================================

//! Model validation tests for cart-config.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use cart_config::CartConfig;
use cart_config::ConfigError;
use cart_core::COLLECTION_CONFIG_KEY;
use cart_core::CartItemInput;
use cart_core::CartStore;
use cart_core::CustomerId;
use cart_core::InMemorySessionContext;
use cart_core::SessionContext;
use cart_core::SessionId;

#[test]
fn invalid_collection_name_is_rejected() {
    let err = CartConfig::from_toml("[cart]\ndefault_collection = \"9carts\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "unexpected error: {err}");
}

#[test]
fn memory_store_rejects_path() {
    let err = CartConfig::from_toml("[store]\ntype = \"memory\"\npath = \"cart.db\"\n").unwrap_err();
    assert!(err.to_string().contains("memory store must not set path"));
}

#[test]
fn sqlite_store_requires_path() {
    let err = CartConfig::from_toml("[store]\ntype = \"sqlite\"\n").unwrap_err();
    assert!(err.to_string().contains("sqlite store requires path"));
}

#[test]
fn sqlite_store_rejects_overlong_path_component() {
    let toml = format!("[store]\ntype = \"sqlite\"\npath = \"data/{}.db\"\n", "a".repeat(300));
    let err = CartConfig::from_toml(&toml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "unexpected error: {err}");
    assert!(err.to_string().contains("store path contains an overlong component"));
}

#[test]
fn sqlite_store_rejects_excessive_busy_timeout() {
    let err = CartConfig::from_toml(
        "[store]\ntype = \"sqlite\"\npath = \"cart.db\"\nbusy_timeout_ms = 600000\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unknown_store_type_is_rejected() {
    let err = CartConfig::from_toml("[store]\ntype = \"redis\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn establish_session_writes_configured_collection() {
    let config = CartConfig::from_toml("[cart]\ndefault_collection = \"web_carts\"\n").unwrap();
    let mut context = InMemorySessionContext::new(SessionId::new("sess-a"));
    config.establish_session(&mut context);
    assert_eq!(context.get(COLLECTION_CONFIG_KEY).as_deref(), Some("web_carts"));
}

#[test]
fn memory_store_builds_working_cart() {
    let config = CartConfig::default();
    let store = config.build_store().unwrap();
    let mut context = InMemorySessionContext::new(SessionId::new("sess-a"));
    config.establish_session(&mut context);

    let cart = CartStore::from_context(store, &context).unwrap();
    cart.insert(&CartItemInput::new("sku-1", "2", "3.00", "Widget"), CustomerId::NONE).unwrap();
    assert_eq!(cart.total_items().unwrap(), 2);
}

#[test]
fn sqlite_store_builds_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("cart.db");
    let toml = format!(
        "[cart]\ndefault_collection = \"durable_carts\"\n\n[store]\ntype = \"sqlite\"\npath = {:?}\njournal_mode = \"delete\"\nsync_mode = \"normal\"\n",
        path.to_string_lossy()
    );
    let config = CartConfig::from_toml(&toml).unwrap();
    let store = config.build_store().unwrap();
    let mut context = InMemorySessionContext::new(SessionId::new("sess-a"));
    config.establish_session(&mut context);

    let cart = CartStore::from_context(store, &context).unwrap();
    cart.insert(&CartItemInput::new("sku-1", "1", "4.50", "Widget"), CustomerId::NONE).unwrap();
    assert_eq!(cart.collection().as_str(), "durable_carts");
    assert!(path.exists());
}

#[test]
fn sqlite_store_open_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!("[store]\ntype = \"sqlite\"\npath = {:?}\n", dir.path().to_string_lossy());
    let config = CartConfig::from_toml(&toml).unwrap();
    let err = config.build_store().err().unwrap();
    assert!(matches!(err, ConfigError::Store(_)), "unexpected error: {err}");
}
