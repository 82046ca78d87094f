use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cooldown_duration_seconds: u64,
    pub round_duration_seconds: u64,
    pub jwt_secret: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            cooldown_duration_seconds: env::var("COOLDOWN_DURATION")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid COOLDOWN_DURATION"),
            round_duration_seconds: env::var("ROUND_DURATION")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("Invalid ROUND_DURATION"),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-in-production".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
