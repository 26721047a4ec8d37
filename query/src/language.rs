use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Supported content languages. One `data_xx` document column exists per
/// variant, so an unsupported code is unrepresentable: column names are only
/// ever built from this closed set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
    Es,
    Ja,
}

impl Language {
    pub const ALL: [Language; 5] = [Language::En, Language::Fr, Language::De, Language::Es, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
            Language::Ja => "ja",
        }
    }

    /// Physical column holding the JSON document for this language.
    pub fn document_column(&self) -> String { format!("data_{}", self.code()) }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

impl FromStr for Language {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "es" => Ok(Language::Es),
            "ja" => Ok(Language::Ja),
            other => Err(CompileError::UnsupportedLanguage(other.to_owned())),
        }
    }
}
