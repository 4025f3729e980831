use super::builder::default_config_content;
use super::loading::parse;
use super::validation::{is_pacing_sane, validate_config};
use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn with_xdg_config_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }

    let result = f();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    result
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("centinela").join("centinela.toml");

    let result = with_xdg_config_home(temp_dir.path(), Config::load);

    if let Err(e) = &result {
        eprintln!("Config::load() failed: {:?}", e);
    }
    assert!(result.is_ok());
    assert!(config_path.exists());
}

#[test]
#[serial]
fn test_existing_config_is_not_overwritten() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("centinela");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("centinela.toml");
    fs::write(&config_path, "frame_interval_ms = 100\n").unwrap();

    let config = with_xdg_config_home(temp_dir.path(), Config::load).unwrap();

    assert_eq!(config.frame_interval_ms, Some(100));
    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        "frame_interval_ms = 100\n"
    );
}

#[test]
fn test_default_file_round_trips_to_defaults() {
    let config = parse(&default_config_content()).unwrap();

    let services = config.carousel_settings(CarouselKind::Services);
    assert_eq!(services.autoplay_interval, Some(Duration::from_millis(6000)));
    assert_eq!(services.transition, Duration::from_millis(800));
    assert_eq!(services.window_size, 2);

    let testimonials = config.carousel_settings(CarouselKind::Testimonials);
    assert_eq!(
        testimonials.autoplay_interval,
        Some(Duration::from_millis(5000))
    );
    assert_eq!(testimonials.transition, Duration::from_millis(500));
    assert_eq!(testimonials.window_size, 3);

    assert_eq!(config.frame_interval(), Duration::from_millis(50));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config, Config::default());

    let contact = config.contact_settings();
    assert_eq!(contact.submit_delay, Duration::from_millis(1500));
    assert_eq!(contact.success_display, Duration::from_millis(3000));
    assert_eq!(
        config.carousel_settings(CarouselKind::Testimonials),
        parse(&default_config_content())
            .unwrap()
            .carousel_settings(CarouselKind::Testimonials)
    );
}

#[test]
fn test_disabling_autoplay() {
    let config = parse("[services]\nautoplay = false\nautoplay_interval_ms = 9000\n").unwrap();
    assert_eq!(
        config.carousel_settings(CarouselKind::Services).autoplay_interval,
        None
    );
    assert!(
        config
            .carousel_settings(CarouselKind::Testimonials)
            .autoplay_interval
            .is_some()
    );
}

#[test]
fn test_zero_transition_is_allowed() {
    let config = parse("[testimonials]\ntransition_ms = 0\n").unwrap();
    assert!(
        config
            .carousel_settings(CarouselKind::Testimonials)
            .transition
            .is_zero()
    );
}

#[test]
fn test_out_of_range_values_name_the_field() {
    let cases = [
        ("frame_interval_ms = 5", "frame_interval_ms"),
        ("frame_interval_ms = 5000", "frame_interval_ms"),
        ("[services]\nautoplay_interval_ms = 100", "services.autoplay_interval_ms"),
        ("[testimonials]\ntransition_ms = 20000", "testimonials.transition_ms"),
        ("[testimonials]\nwindow_size = 0", "testimonials.window_size"),
        ("[contact]\nsubmit_delay_ms = 120000", "contact.submit_delay_ms"),
        ("[contact]\nsuccess_display_ms = 70000", "contact.success_display_ms"),
    ];

    for (text, field) in cases {
        let config: Config = toml::from_str(text).unwrap();
        let error = validate_config(&config).unwrap_err().to_string();
        assert!(error.starts_with(field), "{text}: {error}");
    }
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(parse("[services]\nautoplay_ms = 100\n").is_err());
    assert!(parse("theme = \"dark\"\n").is_err());
}

#[test]
fn test_wrong_types_are_rejected() {
    assert!(parse("frame_interval_ms = \"fast\"\n").is_err());
    assert!(parse("[services]\nautoplay = 1\n").is_err());
}

#[test]
fn test_tight_pacing_warns_but_loads() {
    let config =
        parse("[services]\nautoplay_interval_ms = 800\ntransition_ms = 800\n").unwrap();
    assert!(!is_pacing_sane(&config, CarouselKind::Services));
    assert!(is_pacing_sane(&config, CarouselKind::Testimonials));
}

#[test]
fn test_load_from_missing_path_fails() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nope.toml");
    let error = Config::load_from_path(&path).unwrap_err();
    assert!(error.to_string().contains("not found"));
}

#[test]
fn test_load_from_path_reports_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("centinela.toml");
    fs::write(&path, "[services]\nwindow_size = 42\n").unwrap();

    let error = Config::load_from_path(&path).unwrap_err();
    let chain = format!("{error:#}");
    assert!(chain.contains("Invalid config in"));
    assert!(chain.contains("services.window_size (42)"));
}
