use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.intacct.com/ia/xml/xmlgw.phtml";

/// The XML gateway a request is posted to.
///
/// Session acquisition returns the endpoint the session is bound to, which
/// may differ from the default gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IntacctEndpoint {
    #[default]
    Default,
    Custom(Url),
}

impl IntacctEndpoint {
    /// Converts the endpoint to a URL.
    pub fn to_url(&self) -> Result<Url> {
        match self {
            Self::Default => Url::parse(DEFAULT_ENDPOINT_URL).map_err(|_| Error::InvalidEndpoint),
            Self::Custom(url) => Ok(url.clone()),
        }
    }

    /// Parses a gateway URL. Only `http` and `https` URLs are accepted.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url.trim()).map_err(|_| Error::InvalidEndpoint)?;
        match url.scheme() {
            "http" | "https" if url.as_str() == DEFAULT_ENDPOINT_URL => Ok(Self::Default),
            "http" | "https" => Ok(Self::Custom(url)),
            _ => Err(Error::InvalidEndpoint),
        }
    }
}

impl fmt::Display for IntacctEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "{DEFAULT_ENDPOINT_URL}"),
            Self::Custom(url) => write!(f, "{url}"),
        }
    }
}

impl FromStr for IntacctEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<IntacctEndpoint> for Url {
    type Error = Error;

    fn try_from(endpoint: IntacctEndpoint) -> Result<Self> {
        endpoint.to_url()
    }
}

impl<'de> Deserialize<'de> for IntacctEndpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
