use super::DomainError;

pub const DEFAULT_PORT: u16 = 80;

/// Host and optional port extracted from a DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsnTarget {
    pub host: String,
    pub port: Option<u16>,
}

impl DsnTarget {
    /// Accepts `scheme://[user@]host[:port][/path]`, `host:port`, `[v6]:port`
    /// and bare `host`. A trailing `:something` that is not a valid port stays
    /// part of the host.
    pub fn parse(dsn: &str) -> Result<Self, DomainError> {
        let trimmed = dsn.trim();
        let without_scheme = match trimmed.find("://") {
            Some(idx) => &trimmed[idx + 3..],
            None => trimmed,
        };

        let authority = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let authority = match authority.rfind('@') {
            Some(idx) => &authority[idx + 1..],
            None => authority,
        };

        let target = if let Some(rest) = authority.strip_prefix('[') {
            Self::parse_bracketed(rest, dsn)?
        } else if authority.matches(':').count() > 1 {
            Self {
                host: authority.to_string(),
                port: None,
            }
        } else {
            match authority.rsplit_once(':') {
                Some((host, port)) => match port.parse::<u16>() {
                    Ok(port) => Self {
                        host: host.to_string(),
                        port: Some(port),
                    },
                    Err(_) => Self {
                        host: authority.to_string(),
                        port: None,
                    },
                },
                None => Self {
                    host: authority.to_string(),
                    port: None,
                },
            }
        };

        if target.host.is_empty() {
            return Err(DomainError::InvalidDsn(dsn.to_string()));
        }

        Ok(target)
    }

    fn parse_bracketed(rest: &str, dsn: &str) -> Result<Self, DomainError> {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| DomainError::InvalidDsn(dsn.to_string()))?;

        let port = match tail.strip_prefix(':') {
            Some(port) => port.parse::<u16>().ok(),
            None => None,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}
