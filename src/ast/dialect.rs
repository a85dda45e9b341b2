//! Target SQL dialects
//!
//! The AST is dialect-neutral; only rendering looks at the dialect, for
//! identifier quoting, placeholder syntax, boolean literals and pagination.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FacadeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Sqlite,
    SqlServer,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Postgres, Dialect::Sqlite, Dialect::SqlServer];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
        }
    }

    /// Write a quoted identifier part
    pub fn write_quoted(&self, out: &mut String, ident: &str) {
        let (open, close) = match self {
            Self::Postgres | Self::Sqlite => ('"', '"'),
            Self::SqlServer => ('[', ']'),
        };
        out.push(open);
        for c in ident.chars() {
            // Closing quote characters are escaped by doubling them
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
    }

    /// Placeholder for the 1-indexed parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${}", index),
            Self::Sqlite => format!("?{}", index),
            Self::SqlServer => format!("@p{}", index - 1),
        }
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Postgres, true) => "true",
            (Self::Postgres, false) => "false",
            (Self::Sqlite | Self::SqlServer, true) => "1",
            (Self::Sqlite | Self::SqlServer, false) => "0",
        }
    }
}

impl FromStr for Dialect {
    type Err = FacadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            other => Err(FacadeError::validation(format!(
                "unsupported dialect '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("SQLITE".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("SqlServer".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert!("oracle".parse::<Dialect>().unwrap_err().is_validation());
    }

    #[test]
    fn test_quoting() {
        let mut out = String::new();
        Dialect::Postgres.write_quoted(&mut out, "user\"name");
        assert_eq!(out, "\"user\"\"name\"");

        let mut out = String::new();
        Dialect::SqlServer.write_quoted(&mut out, "odd]name");
        assert_eq!(out, "[odd]]name]");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Sqlite.placeholder(2), "?2");
        assert_eq!(Dialect::SqlServer.placeholder(1), "@p0");
    }
}
