use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs},
    path::Path,
};

use tactus_core::Engine;

use crate::{Config, SessionMode};

const ENGINE_VAR: &str = "STT_ENGINE";
const LANGUAGE_VAR: &str = "STT_LANGUAGE";
const HOST_VAR: &str = "STT_HOST";
const PORT_VAR: &str = "STT_PORT";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the built-in defaults. The text is expanded for
    /// `{{ env.VAR }}` placeholders, parsed, overlaid with the `STT_*`
    /// environment overrides and validated once.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, variable expansion or
    /// TOML parsing fails, an override is malformed, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = if path.exists() {
            std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            String::new()
        };

        let mut config = Self::parse(&raw)?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Expand and parse raw TOML without touching the process environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if expansion or parsing fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))
    }

    /// Overlay `STT_ENGINE`, `STT_LANGUAGE`, `STT_HOST` and `STT_PORT`
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be resolved or the port is not a number
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(engine) = std::env::var(ENGINE_VAR) {
            self.engine.engine = engine;
        }

        if let Ok(language) = std::env::var(LANGUAGE_VAR) {
            self.engine.language = language;
        }

        let host = std::env::var(HOST_VAR).ok();
        let port = std::env::var(PORT_VAR).ok();

        if host.is_none() && port.is_none() {
            return Ok(());
        }

        let port = match port {
            Some(raw) => {
                let port: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid {PORT_VAR} value '{raw}': {e}"))?;
                if !(1..=u32::from(u16::MAX)).contains(&port) {
                    anyhow::bail!("invalid port number: {port}");
                }
                u16::try_from(port)?
            }
            None => self.server.listen_address.port(),
        };

        let ip = match host {
            Some(host) => resolve_host(&host, port)?,
            None => self.server.listen_address.ip(),
        };

        self.server.listen_address = SocketAddr::new(ip, port);

        Ok(())
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_engine()?;
        self.validate_server()?;
        self.validate_sessions()?;
        Ok(())
    }

    fn validate_engine(&self) -> anyhow::Result<()> {
        self.engine
            .engine
            .parse::<Engine>()
            .map_err(|e| anyhow::anyhow!("{e} (supported: {})", supported_engines()))?;

        if self.engine.language.trim().is_empty() {
            anyhow::bail!("language must be specified");
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if self.server.listen_address.port() == 0 {
            anyhow::bail!("invalid port number: 0");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }

    fn validate_sessions(&self) -> anyhow::Result<()> {
        if self.retry.max_retries == 0 {
            anyhow::bail!("retry.max_retries must be at least 1");
        }

        if self.sessions.mode == SessionMode::Pool && self.sessions.workers == 0 {
            anyhow::bail!("sessions.workers must be at least 1 in pool mode");
        }

        Ok(())
    }
}

fn resolve_host(host: &str, port: u16) -> anyhow::Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    if host.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|e| anyhow::anyhow!("failed to resolve {HOST_VAR} '{host}': {e}"))?
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| anyhow::anyhow!("{HOST_VAR} '{host}' resolved to no addresses"))
}

fn supported_engines() -> String {
    Engine::ALL.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(", ")
}
