#[derive(Debug, Clone)]
pub struct LadderSettings {
    pub default_challenge_range: u32,
    pub novice_range_floor: u32,
    pub rematch_cooldown_days: i64,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            default_challenge_range: 5,
            novice_range_floor: 10,
            rematch_cooldown_days: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starter_rating: f64,
    pub k_factor: f64,
    pub provisional_k_factor: f64,
    pub provisional_matches: i32,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starter_rating: 1000.0,
            k_factor: 32.0,
            provisional_k_factor: 40.0,
            provisional_matches: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub gateway_url: &'static str,
    pub profile_base_url: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8787/push",
            profile_base_url: "http://localhost:5173/profile",
            user_agent: "ClubLadder/0.1",
            timeout_secs: 10,
            rate_limit_ms: 100, // 10 req/sec
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ladder: LadderSettings,
    pub rating: RatingSettings,
    pub notify: NotifySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ladder: LadderSettings::default(),
            rating: RatingSettings::default(),
            notify: NotifySettings::default(),
        }
    }
}

// Passed explicitly (dependency injection) rather than read from a global.
