//! User configuration: engine tunables and demo toggles.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/jobdeck/config.toml` (default `~/.config/jobdeck/config.toml`).
//! Distances are measured in terminal columns, so one engine unit is
//! one column and speeds are columns per second.

use std::path::PathBuf;

use crate::core::deck::DeckTuning;
use crate::core::geometry::StripGeometry;

// ───────────────────────────────────────── config ────────────

/// Application configuration: deck motion, strip layout, feed knobs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Release speed (columns/s) beyond which a flick carries one card
    /// past the nearest snap.
    pub momentum_threshold: f32,
    /// Settle animation duration at zero release speed.
    pub settle_base_ms: u64,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
    /// Milliseconds shaved off the settle per column/s of release speed.
    pub settle_shorten: f32,
    /// Duration of keyboard and click-to-focus moves.
    pub step_duration_ms: u64,
    /// Settling within this many cards of the loaded end fetches more.
    pub lookahead: usize,
    /// Skeleton slots shown while a page is in flight.
    pub placeholder_cards: usize,
    pub card_width: u16,
    pub card_gap: u16,
    /// Columns the centered card is nudged left of true center.
    pub center_bias: f32,
    pub page_size: usize,
    /// Simulated provider latency.
    pub fetch_latency_ms: u64,
    pub show_ads: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 30.0,
            settle_base_ms: 320,
            settle_min_ms: 140,
            settle_max_ms: 420,
            settle_shorten: 2.0,
            step_duration_ms: 220,
            lookahead: 2,
            placeholder_cards: 2,
            card_width: 34,
            card_gap: 2,
            center_bias: 1.0,
            page_size: 8,
            fetch_latency_ms: 350,
            show_ads: true,
        }
    }
}

impl AppConfig {
    /// Engine tuning block derived from the current settings.
    pub fn tuning(&self) -> DeckTuning {
        DeckTuning {
            momentum_threshold: self.momentum_threshold,
            settle_base_ms: self.settle_base_ms as f32,
            settle_min_ms: self.settle_min_ms as f32,
            settle_max_ms: self.settle_max_ms as f32,
            settle_shorten: self.settle_shorten,
            step_duration_ms: self.step_duration_ms,
            lookahead: self.lookahead,
            placeholder_cards: self.placeholder_cards,
        }
    }

    /// Strip geometry for a measured container width (in columns).
    pub fn strip_geometry(&self, container_width: f32) -> StripGeometry {
        StripGeometry::new(
            container_width,
            f32::from(self.card_width),
            f32::from(self.card_gap),
            self.center_bias,
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk. On first run, write a commented template
    /// the user can edit.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        let config = Self::default();
        let _ = config.save();
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "momentum_threshold" => {
                    if let Ok(v) = value.parse::<f32>() {
                        config.momentum_threshold = v.clamp(1.0, 500.0);
                    }
                }
                "settle_base_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.settle_base_ms = v.clamp(60, 2000);
                    }
                }
                "settle_min_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.settle_min_ms = v.clamp(30, 1000);
                    }
                }
                "settle_max_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.settle_max_ms = v.clamp(60, 3000);
                    }
                }
                "settle_shorten" => {
                    if let Ok(v) = value.parse::<f32>() {
                        config.settle_shorten = v.clamp(0.0, 50.0);
                    }
                }
                "step_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.step_duration_ms = v.clamp(30, 2000);
                    }
                }
                "lookahead" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.lookahead = v.min(10);
                    }
                }
                "placeholder_cards" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.placeholder_cards = v.clamp(1, 8);
                    }
                }
                "card_width" => {
                    if let Ok(v) = value.parse::<u16>() {
                        // Narrower than this and the body text is unreadable.
                        config.card_width = v.clamp(12, 120);
                    }
                }
                "card_gap" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.card_gap = v.min(20);
                    }
                }
                "center_bias" => {
                    if let Ok(v) = value.parse::<f32>() {
                        config.center_bias = v.clamp(-20.0, 20.0);
                    }
                }
                "page_size" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.page_size = v.clamp(1, 100);
                    }
                }
                "fetch_latency_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.fetch_latency_ms = v.min(10_000);
                    }
                }
                "show_ads" => {
                    config.show_ads = value == "true";
                }
                _ => {}
            }
        }

        // An inverted settle window would make clamp() panic downstream.
        if config.settle_max_ms < config.settle_min_ms {
            config.settle_max_ms = config.settle_min_ms;
        }
        config.settle_base_ms = config
            .settle_base_ms
            .clamp(config.settle_min_ms, config.settle_max_ms);

        config
    }

    fn serialise(&self) -> String {
        let lines = vec![
            "# jobdeck configuration".to_string(),
            "# Distances are terminal columns; speeds are columns per second.".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("momentum_threshold = {}", self.momentum_threshold),
            format!("settle_base_ms = {}", self.settle_base_ms),
            format!("settle_min_ms = {}", self.settle_min_ms),
            format!("settle_max_ms = {}", self.settle_max_ms),
            format!("settle_shorten = {}", self.settle_shorten),
            format!("step_duration_ms = {}", self.step_duration_ms),
            String::new(),
            "# Strip layout".to_string(),
            format!("card_width = {}", self.card_width),
            format!("card_gap = {}", self.card_gap),
            format!("center_bias = {}", self.center_bias),
            format!("placeholder_cards = {}", self.placeholder_cards),
            String::new(),
            "# Feed".to_string(),
            format!("lookahead = {}", self.lookahead),
            format!("page_size = {}", self.page_size),
            format!("fetch_latency_ms = {}", self.fetch_latency_ms),
            format!("show_ads = {}", self.show_ads),
            String::new(),
        ];
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/jobdeck/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("jobdeck").join("config.toml")
}

// ───────────────────────── tests ─────────────────────────
