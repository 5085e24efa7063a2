use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub app_name: String,
    pub currency: String,
    pub tax_rate: f64,
    pub hold_ttl_minutes: i64,
    pub sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Online Event Ticket Booking Platform".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string()),
            tax_rate: env::var("TAX_RATE").unwrap_or_else(|_| "0.08".to_string()).parse().expect("TAX_RATE must be a number"),
            hold_ttl_minutes: env::var("HOLD_TTL_MINUTES").unwrap_or_else(|_| "15".to_string()).parse().expect("HOLD_TTL_MINUTES must be a number"),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "60".to_string()).parse().expect("SWEEP_INTERVAL_SECS must be a number"),
        }
    }
}
