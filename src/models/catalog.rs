//! The two feature areas served by the same record type.

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Fluege,
    Spiele,
}

impl Catalog {
    pub fn as_str(&self) -> &'static str {
        match self {
            Catalog::Fluege => "fluege",
            Catalog::Spiele => "spiele",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fluege" => Some(Catalog::Fluege),
            "spiele" => Some(Catalog::Spiele),
            _ => None,
        }
    }

    /// REST resource path segment of this feature area.
    pub fn resource_path<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Catalog::Fluege => &config.fluege_path,
            Catalog::Spiele => &config.spiele_path,
        }
    }

    /// Message of the search screen for a 404.
    pub fn nothing_found(&self) -> &'static str {
        match self {
            Catalog::Fluege => "Keine Flüge gefunden.",
            Catalog::Spiele => "Keine Spiele gefunden.",
        }
    }

    /// Message of the details screen for a 404.
    pub fn not_found(&self) -> &'static str {
        match self {
            Catalog::Fluege => "Kein Flug gefunden.",
            Catalog::Spiele => "Kein Spiel gefunden.",
        }
    }

    /// Message of the update screen for a 404.
    pub fn not_present(&self) -> &'static str {
        match self {
            Catalog::Fluege => "Kein Flug vorhanden.",
            Catalog::Spiele => "Kein Spiel vorhanden.",
        }
    }

    /// Page title of the create screen.
    pub fn create_title(&self) -> &'static str {
        match self {
            Catalog::Fluege => "Neuer Flug",
            Catalog::Spiele => "Neues Spiel",
        }
    }
}
