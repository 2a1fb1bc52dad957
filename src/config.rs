use crate::models::rules::RuleSet;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HEAT_MINUTES: u32 = 20;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rules: RuleSet,
    pub heat_minutes: u32,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let heat_minutes = parse_or("SURF_HEAT_MINUTES", lookup("SURF_HEAT_MINUTES"), DEFAULT_HEAT_MINUTES);

        let rules = match lookup("SURF_RULESET") {
            Some(name) => RuleSet::by_name(&name).unwrap_or_else(|| {
                log::warn!("unknown SURF_RULESET {:?}, using isa", name);
                RuleSet::isa()
            }),
            None => RuleSet::isa(),
        };

        ServerConfig {
            host,
            port,
            rules,
            heat_minutes,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {}={:?}", key, value);
            default
        }),
        None => default,
    }
}
