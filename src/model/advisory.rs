use serde::Serialize;

/// Non-fatal conditions raised while deriving metrics for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    NoPairsFound,
    NoDimensionsFound,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Advisory::NoPairsFound => "No matching tv_ and bench_ column pairs found.",
            Advisory::NoDimensionsFound => "No tgv_ columns found in the dataset.",
        }
    }
}
