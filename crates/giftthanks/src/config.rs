use std::{collections::BTreeMap, env, fmt, time::Duration};

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Port Redis listens on unless told otherwise.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Hostname of the Redis container when linked with `docker run --link redis`.
const DOCKER_REDIS_HOST: &str = "redis";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cloud Foundry service bindings (raw `VCAP_SERVICES` JSON).
    pub vcap_services: Option<String>,
    /// Explicit Redis URL (e.g. "redis://:secret@cache.internal:6379").
    pub redis_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `VCAP_SERVICES` - Service binding metadata (optional)
    /// - `REDIS_URL` - Redis connection URL (optional)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self {
            vcap_services: non_empty_var("VCAP_SERVICES"),
            redis_url: non_empty_var("REDIS_URL"),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Redis endpoints to try, in order.
    ///
    /// 1. The first bound service in `VCAP_SERVICES` with host and port credentials
    /// 2. `REDIS_URL`
    /// 3. `localhost:6379`
    /// 4. `redis:6379` (linked Docker container)
    ///
    /// Duplicate host/port pairs are dropped, keeping the first.
    pub fn redis_candidates(&self) -> Vec<RedisEndpoint> {
        let mut candidates = Vec::new();

        if let Some(endpoint) = self.vcap_services.as_deref().and_then(endpoint_from_vcap) {
            candidates.push(endpoint);
        }

        if let Some(raw) = self.redis_url.as_deref() {
            match RedisEndpoint::from_url(EndpointSource::RedisUrl, raw) {
                Some(endpoint) => candidates.push(endpoint),
                None => tracing::warn!("Ignoring REDIS_URL: not a valid redis:// URL"),
            }
        }

        candidates.push(RedisEndpoint::new(
            EndpointSource::Localhost,
            "localhost",
            DEFAULT_REDIS_PORT,
        ));
        candidates.push(RedisEndpoint::new(
            EndpointSource::DockerLink,
            DOCKER_REDIS_HOST,
            DEFAULT_REDIS_PORT,
        ));

        let mut unique: Vec<RedisEndpoint> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique
                .iter()
                .any(|seen| seen.host == candidate.host && seen.port == candidate.port)
            {
                unique.push(candidate);
            }
        }
        unique
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where a Redis endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    ServiceBinding,
    RedisUrl,
    Localhost,
    DockerLink,
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndpointSource::ServiceBinding => "VCAP_SERVICES",
            EndpointSource::RedisUrl => "REDIS_URL",
            EndpointSource::Localhost => "localhost",
            EndpointSource::DockerLink => "docker link",
        })
    }
}

/// A Redis server to connect to.
///
/// `Display` and `Debug` never print the password.
#[derive(Clone, PartialEq, Eq)]
pub struct RedisEndpoint {
    pub source: EndpointSource,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl RedisEndpoint {
    pub fn new(source: EndpointSource, host: impl Into<String>, port: u16) -> Self {
        Self {
            source,
            host: host.into(),
            port,
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Parses a `redis://` URL. Returns None for anything else.
    pub fn from_url(source: EndpointSource, raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        if url.scheme() != "redis" {
            return None;
        }

        let host = url.host_str()?;
        let port = url.port().unwrap_or(DEFAULT_REDIS_PORT);
        let endpoint = Self::new(source, host, port);

        Some(match url.password() {
            Some(encoded) => {
                let password = urlencoding::decode(encoded)
                    .map(|p| p.into_owned())
                    .unwrap_or_else(|_| encoded.to_string());
                endpoint.with_password(password)
            }
            None => endpoint,
        })
    }

    /// Connection URL for the redis client.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/",
                urlencoding::encode(password),
                self.host,
                self.port
            ),
            None => format!("redis://{}:{}/", self.host, self.port),
        }
    }
}

impl fmt::Display for RedisEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for RedisEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisEndpoint")
            .field("source", &self.source)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One entry of a `VCAP_SERVICES` service list.
#[derive(Debug, Deserialize)]
struct ServiceInstance {
    #[serde(default)]
    credentials: Map<String, Value>,
}

/// Finds the first bound service exposing Redis-style credentials.
fn endpoint_from_vcap(raw: &str) -> Option<RedisEndpoint> {
    let services: BTreeMap<String, Vec<ServiceInstance>> = match serde_json::from_str(raw) {
        Ok(services) => services,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring unparsable VCAP_SERVICES");
            return None;
        }
    };

    services
        .values()
        .flatten()
        .find_map(|instance| endpoint_from_credentials(&instance.credentials))
}

fn endpoint_from_credentials(credentials: &Map<String, Value>) -> Option<RedisEndpoint> {
    let host = credentials
        .get("hostname")
        .or_else(|| credentials.get("host"))
        .and_then(Value::as_str)?;

    // Brokers disagree on whether the port is a number or a string.
    let port = match credentials.get("port")? {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }?;

    let endpoint = RedisEndpoint::new(EndpointSource::ServiceBinding, host, port);

    Some(match credentials.get("password").and_then(Value::as_str) {
        Some(password) => endpoint.with_password(password),
        None => endpoint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vcap_services: Option<&str>, redis_url: Option<&str>) -> Config {
        Config {
            vcap_services: vcap_services.map(str::to_string),
            redis_url: redis_url.map(str::to_string),
            request_timeout_seconds: 10,
        }
    }

    fn hosts(candidates: &[RedisEndpoint]) -> Vec<String> {
        candidates.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config {
            request_timeout_seconds: 3,
            ..config(None, None)
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_candidates() {
        let candidates = config(None, None).redis_candidates();

        assert_eq!(hosts(&candidates), vec!["localhost:6379", "redis:6379"]);
        assert_eq!(candidates[0].source, EndpointSource::Localhost);
        assert_eq!(candidates[1].source, EndpointSource::DockerLink);
    }

    #[test]
    fn test_service_binding_comes_first() {
        let vcap = r#"{
            "rediscloud": [{
                "name": "redis",
                "credentials": {
                    "hostname": "pub-redis-16771.cloud.example.com",
                    "port": "16771",
                    "password": "s3cret"
                }
            }]
        }"#;

        let candidates = config(Some(vcap), Some("redis://cache:6380")).redis_candidates();

        assert_eq!(
            hosts(&candidates),
            vec![
                "pub-redis-16771.cloud.example.com:16771",
                "cache:6380",
                "localhost:6379",
                "redis:6379"
            ]
        );
        assert_eq!(candidates[0].source, EndpointSource::ServiceBinding);
        assert_eq!(candidates[0].password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_service_binding_numeric_port_and_host_key() {
        let vcap = r#"{"p-redis": [{"credentials": {"host": "10.0.0.5", "port": 6390}}]}"#;

        let candidates = config(Some(vcap), None).redis_candidates();

        assert_eq!(candidates[0].to_string(), "10.0.0.5:6390");
        assert_eq!(candidates[0].password, None);
    }

    #[test]
    fn test_unrelated_services_are_skipped() {
        let vcap = r#"{
            "elephantsql": [{"credentials": {"uri": "postgres://db"}}],
            "rediscloud": [{"credentials": {"hostname": "cache.example.com", "port": "1234"}}]
        }"#;

        let candidates = config(Some(vcap), None).redis_candidates();

        assert_eq!(candidates[0].to_string(), "cache.example.com:1234");
    }

    #[test]
    fn test_invalid_vcap_falls_back() {
        let candidates = config(Some("not json"), None).redis_candidates();
        assert_eq!(hosts(&candidates), vec!["localhost:6379", "redis:6379"]);
    }

    #[test]
    fn test_invalid_redis_url_is_ignored() {
        let candidates = config(None, Some("http://example.com")).redis_candidates();
        assert_eq!(hosts(&candidates), vec!["localhost:6379", "redis:6379"]);
    }

    #[test]
    fn test_duplicate_endpoints_are_dropped() {
        let candidates = config(None, Some("redis://localhost:6379")).redis_candidates();

        assert_eq!(hosts(&candidates), vec!["localhost:6379", "redis:6379"]);
        assert_eq!(candidates[0].source, EndpointSource::RedisUrl);
    }

    #[test]
    fn test_from_url_reads_password_and_default_port() {
        let endpoint =
            RedisEndpoint::from_url(EndpointSource::RedisUrl, "redis://:p%40ss@cache").unwrap();

        assert_eq!(endpoint.host, "cache");
        assert_eq!(endpoint.port, DEFAULT_REDIS_PORT);
        assert_eq!(endpoint.password.as_deref(), Some("p@ss"));
    }

    #[test]
    fn test_url_encodes_password() {
        let endpoint =
            RedisEndpoint::new(EndpointSource::Localhost, "localhost", 6379).with_password("p@ss");
        assert_eq!(endpoint.url(), "redis://:p%40ss@localhost:6379/");

        let endpoint = RedisEndpoint::new(EndpointSource::Localhost, "localhost", 6379);
        assert_eq!(endpoint.url(), "redis://localhost:6379/");
    }

    #[test]
    fn test_debug_redacts_password() {
        let endpoint =
            RedisEndpoint::new(EndpointSource::Localhost, "localhost", 6379).with_password("hunter2");
        let debug = format!("{endpoint:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
