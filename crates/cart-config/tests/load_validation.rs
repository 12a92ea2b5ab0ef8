//! Config load validation tests for cart-config.
// crates/cart-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, model).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use cart_config::CartConfig;
use cart_config::ConfigError;
use cart_config::StoreType;
use cart_config::config_toml_example;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CartConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(CartConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(CartConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing.toml");
    assert_invalid(CartConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(CartConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(CartConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("[cart\ndefault_collection = ")?;
    assert_invalid(CartConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let file = write_config("[cart]\ndefault_colection = \"carts\"\n")?;
    assert_invalid(CartConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_empty_file_uses_defaults() -> TestResult {
    let file = write_config("")?;
    let config = CartConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != CartConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    if config.default_collection().as_str() != "order_data_temps" {
        return Err("default collection mismatch".to_string());
    }
    if config.store.store_type != StoreType::Memory {
        return Err("default store should be memory".to_string());
    }
    Ok(())
}

#[test]
fn load_accepts_canonical_example() -> TestResult {
    let file = write_config(&config_toml_example())?;
    let config = CartConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Sqlite {
        return Err("example should select sqlite".to_string());
    }
    if config.store.busy_timeout_ms != 5_000 {
        return Err("example busy timeout mismatch".to_string());
    }
    Ok(())
}
