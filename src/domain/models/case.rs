//! Declarative test cases.
//!
//! A case table groups cases the same way the scenarios are organised:
//! positive functional, negative functional, UI and real-time typing.

use serde::{Deserialize, Serialize};

use super::verdict::LengthTier;

/// How a case's observed output is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCheck {
    /// Raw similarity must reach the tier threshold.
    Similar,
    /// Normalized output must differ from the expected text.
    Differs,
    /// Output must be non-empty and contain no whitespace.
    Unsegmented,
    /// Clearing after output must empty both fields.
    ClearResets,
    /// Typed character by character; output must converge and be similar.
    RealtimeTyping,
}

impl CaseCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Similar => "similar",
            Self::Differs => "differs",
            Self::Unsegmented => "unsegmented",
            Self::ClearResets => "clear_resets",
            Self::RealtimeTyping => "realtime_typing",
        }
    }
}

/// Scenario group a case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseGroup {
    Positive,
    Negative,
    Ui,
    Realtime,
}

impl CaseGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Ui => "ui",
            Self::Realtime => "realtime",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "negative" | "neg" => Some(Self::Negative),
            "ui" => Some(Self::Ui),
            "realtime" | "real-time" => Some(Self::Realtime),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the case table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub input: String,
    pub expected_output: String,
    #[serde(default = "default_true")]
    pub should_pass: bool,
    #[serde(default, alias = "input_length_type")]
    pub length: LengthTier,
    #[serde(default)]
    pub description: String,
    /// Explicit check; derived from `should_pass` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<CaseCheck>,
}

const fn default_true() -> bool {
    true
}

impl TestCase {
    pub fn effective_check(&self) -> CaseCheck {
        self.check.unwrap_or(if self.should_pass {
            CaseCheck::Similar
        } else {
            CaseCheck::Differs
        })
    }
}

/// All cases, grouped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTable {
    #[serde(default)]
    pub positive: Vec<TestCase>,
    #[serde(default)]
    pub negative: Vec<TestCase>,
    #[serde(default)]
    pub ui: Vec<TestCase>,
    #[serde(default)]
    pub realtime: Vec<TestCase>,
}

impl CaseTable {
    /// Iterate in scenario order: positive, negative, ui, realtime.
    pub fn iter(&self) -> impl Iterator<Item = (CaseGroup, &TestCase)> {
        self.positive
            .iter()
            .map(|case| (CaseGroup::Positive, case))
            .chain(self.negative.iter().map(|case| (CaseGroup::Negative, case)))
            .chain(self.ui.iter().map(|case| (CaseGroup::Ui, case)))
            .chain(self.realtime.iter().map(|case| (CaseGroup::Realtime, case)))
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len() + self.ui.len() + self.realtime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<(CaseGroup, &TestCase)> {
        self.iter().find(|(_, case)| case.id == id)
    }

    /// Cases matching the optional group and id filters, in scenario order.
    pub fn select<'a>(
        &'a self,
        group: Option<CaseGroup>,
        ids: &'a [String],
    ) -> impl Iterator<Item = (CaseGroup, &'a TestCase)> + 'a {
        self.iter().filter(move |(g, case)| {
            group.is_none_or(|wanted| wanted == *g)
                && (ids.is_empty() || ids.iter().any(|id| id == &case.id))
        })
    }
}
