use crate::error::SecError;
use std::fmt;
use std::str::FromStr;

/// Backend used to produce session tokens and message signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// No cryptographic protection. Tokens carry only the expiry.
    #[default]
    None,
    /// Ed25519 session keys endorsed by a password-derived user key.
    Pki,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::None, Method::Pki];

    pub fn name(self) -> &'static str {
        match self {
            Method::None => "None",
            Method::Pki => "PKI",
        }
    }
}

impl FromStr for Method {
    type Err = SecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "None" => Ok(Method::None),
            "PKI" => Ok(Method::Pki),
            other => Err(SecError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_names() {
        assert_eq!("None".parse::<Method>().unwrap(), Method::None);
        assert_eq!("PKI".parse::<Method>().unwrap(), Method::Pki);
    }

    #[test]
    fn rejects_other_spellings() {
        for value in ["none", "pki", "Pki", "", "RSA"] {
            let err = value.parse::<Method>().unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid method: '{value}'"));
        }
    }

    #[test]
    fn display_matches_parse() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn default_is_none() {
        assert_eq!(Method::default(), Method::None);
    }
}
