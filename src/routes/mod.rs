//! Routing table of a feature area.
//!
//! Paths below `/{catalog}` map to screens; admin-only screens and the
//! create form's leave guard are attached here.

use crate::models::Catalog;

/// Role that unlocks the create, chart and update screens.
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    Create,
    BarChart,
    LineChart,
    PieChart,
    Details(String),
    Update(String),
}

impl Route {
    /// Parse the path below the feature area, e.g. `suche` or `42/update`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["suche"] => Some(Route::Search),
            ["create"] => Some(Route::Create),
            ["balkendiagramm"] => Some(Route::BarChart),
            ["liniendiagramm"] => Some(Route::LineChart),
            ["tortendiagramm"] => Some(Route::PieChart),
            [id] => Some(Route::Details((*id).to_string())),
            [id, "update"] => Some(Route::Update((*id).to_string())),
            _ => None,
        }
    }

    /// Absolute path of this route in the given feature area.
    pub fn path(&self, catalog: Catalog) -> String {
        let tail = match self {
            Route::Search => "suche".to_string(),
            Route::Create => "create".to_string(),
            Route::BarChart => "balkendiagramm".to_string(),
            Route::LineChart => "liniendiagramm".to_string(),
            Route::PieChart => "tortendiagramm".to_string(),
            Route::Details(id) => id.clone(),
            Route::Update(id) => format!("{}/update", id),
        };
        format!("/{}/{}", catalog.as_str(), tail)
    }

    pub fn requires_admin(&self) -> bool {
        !matches!(self, Route::Search | Route::Details(_))
    }

    pub fn has_deactivate_guard(&self) -> bool {
        matches!(self, Route::Create)
    }

    pub fn can_activate<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        !self.requires_admin() || roles.iter().any(|r| r.as_ref() == ROLE_ADMIN)
    }
}
