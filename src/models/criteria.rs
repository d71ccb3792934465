//! Search criteria of the search screen.

use serde::{Deserialize, Serialize};

use super::record::{Category, Publisher};

/// Keyword checkboxes of the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFilter {
    pub javascript: bool,
    pub typescript: bool,
}

/// Criteria entered in the search form. `Default` is the empty search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub titel: String,
    pub verlag: Option<Publisher>,
    pub art: Option<Category>,
    pub schlagwoerter: KeywordFilter,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.to_query_params().is_empty()
    }

    /// Query parameters for the list request; only non-default fields are sent.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.titel.is_empty() {
            params.push(("titel", self.titel.clone()));
        }
        if let Some(art) = self.art {
            params.push(("art", art.as_str().to_string()));
        }
        if let Some(verlag) = self.verlag {
            params.push(("verlag", verlag.as_str().to_string()));
        }
        if self.schlagwoerter.javascript {
            params.push(("javascript", "true".to_string()));
        }
        if self.schlagwoerter.typescript {
            params.push(("typescript", "true".to_string()));
        }

        params
    }
}
