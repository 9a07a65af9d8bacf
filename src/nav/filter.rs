use std::fmt;
use std::str::FromStr;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// How a filter query is matched against entry names. Always case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Substring,
    Prefix,
    Fuzzy,
}

impl FilterMode {
    pub fn name(self) -> &'static str {
        match self {
            FilterMode::Substring => "substring",
            FilterMode::Prefix => "prefix",
            FilterMode::Fuzzy => "fuzzy",
        }
    }

    /// Build a matcher for `query`.
    pub fn matcher(self, query: &str) -> Matcher {
        Matcher {
            mode: self,
            query: query.to_lowercase(),
            fuzzy: match self {
                FilterMode::Fuzzy => Some(SkimMatcherV2::default().ignore_case()),
                _ => None,
            },
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substring" => Ok(FilterMode::Substring),
            "prefix" => Ok(FilterMode::Prefix),
            "fuzzy" => Ok(FilterMode::Fuzzy),
            other => Err(other.to_string()),
        }
    }
}

/// A query bound to a mode.
pub struct Matcher {
    mode: FilterMode,
    query: String,
    fuzzy: Option<SkimMatcherV2>,
}

impl Matcher {
    pub fn matches(&self, name: &str) -> bool {
        match (self.mode, &self.fuzzy) {
            (FilterMode::Fuzzy, Some(m)) => m.fuzzy_match(name, &self.query).is_some(),
            (FilterMode::Prefix, _) => name.to_lowercase().starts_with(&self.query),
            _ => name.to_lowercase().contains(&self.query),
        }
    }
}
