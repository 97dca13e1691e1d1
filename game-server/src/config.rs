use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub multicast_addr: String,
    pub multicast_port: u16,
    pub users_file: String,
    pub words_file: String,
    pub rotation_period_secs: u64,
    pub shutdown_grace_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "7070".to_string())
                .parse()
                .expect("Invalid PORT"),
            multicast_addr: env::var("MULTICAST_ADDR").unwrap_or_else(|_| "239.255.1.1".to_string()),
            multicast_port: env::var("MULTICAST_PORT")
                .unwrap_or_else(|_| "7071".to_string())
                .parse()
                .expect("Invalid MULTICAST_PORT"),
            users_file: env::var("USERS_FILE").unwrap_or_else(|_| "users.json".to_string()),
            words_file: env::var("WORDS_FILE").unwrap_or_else(|_| "words.txt".to_string()),
            rotation_period_secs: env::var("ROTATION_PERIOD_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("Invalid ROTATION_PERIOD_SECS"),
            shutdown_grace_secs: env::var("SHUTDOWN_GRACE_SECS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("Invalid SHUTDOWN_GRACE_SECS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
