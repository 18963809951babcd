use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_env() {
    unsafe {
        std::env::remove_var("DECORBOARD_API_BASE_URL");
        std::env::remove_var("DECORBOARD_FETCH_PROXY_URL");
        std::env::remove_var("DECORBOARD_MAX_IMAGES");
        std::env::remove_var("DECORBOARD_SLOT_PATH");
        std::env::remove_var("DECORBOARD_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("DECORBOARD_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("DECORBOARD_MAX_EXPORT_PIXELS");
    }
}

#[test]
fn from_env_uses_defaults() {
    unsafe { clear_env() };

    let cfg = EditorConfig::from_env().unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.fetch_proxy_url, None);
    assert_eq!(cfg.max_images, 10);
    assert_eq!(cfg.slot_path, PathBuf::from(DEFAULT_SLOT_PATH));
    assert_eq!(cfg.max_export_pixels, DEFAULT_MAX_EXPORT_PIXELS);
}

#[test]
fn from_env_parses_overrides() {
    unsafe {
        clear_env();
        std::env::set_var("DECORBOARD_API_BASE_URL", "https://api.example.test/");
        std::env::set_var("DECORBOARD_FETCH_PROXY_URL", "https://proxy.example.test/fetch-image");
        std::env::set_var("DECORBOARD_MAX_IMAGES", "15");
        std::env::set_var("DECORBOARD_SLOT_PATH", "/tmp/slot.json");
        std::env::set_var("DECORBOARD_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("DECORBOARD_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("DECORBOARD_MAX_EXPORT_PIXELS", "1000000");
    }

    let cfg = EditorConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");
    assert_eq!(cfg.fetch_proxy_url.as_deref(), Some("https://proxy.example.test/fetch-image"));
    assert_eq!(cfg.max_images, 15);
    assert_eq!(cfg.slot_path, PathBuf::from("/tmp/slot.json"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.max_export_pixels, 1_000_000);

    unsafe { clear_env() };
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    unsafe {
        clear_env();
        std::env::set_var("DECORBOARD_MAX_IMAGES", "lots");
        std::env::set_var("DECORBOARD_REQUEST_TIMEOUT_SECS", "-1");
    }

    let cfg = EditorConfig::from_env().unwrap();
    assert_eq!(cfg.max_images, DEFAULT_MAX_IMAGES);
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_env() };
}

#[test]
fn zero_capacity_is_rejected() {
    unsafe {
        clear_env();
        std::env::set_var("DECORBOARD_MAX_IMAGES", "0");
    }

    assert_eq!(EditorConfig::from_env(), Err(ConfigError::ZeroCapacity));

    unsafe { clear_env() };
}

#[test]
fn blank_proxy_url_is_absent() {
    unsafe {
        clear_env();
        std::env::set_var("DECORBOARD_FETCH_PROXY_URL", "   ");
    }

    assert_eq!(EditorConfig::from_env().unwrap().fetch_proxy_url, None);

    unsafe { clear_env() };
}

#[test]
fn timeouts_build_client() {
    assert!(HttpTimeouts::default().client().is_ok());
}
