// crates/cart-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for cart configuration. The output is deterministic and
//! is parsed by the config tests to keep it in sync with the model.

/// Returns a canonical example `cart.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[cart]
default_collection = "order_data_temps"

[store]
type = "sqlite"
path = "cart.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000
"#,
    )
}
