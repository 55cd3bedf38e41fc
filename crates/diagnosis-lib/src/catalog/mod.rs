//! Playbook rule catalog
//!
//! The catalog maps a trigger key (budget tier, company-size tier, system
//! type, restriction or country class) to an ordered list of recommendation
//! templates. It is loaded once, validated, and then shared read-only.

mod conditions;

pub use conditions::{bind_rationale, thresholds, UsageCondition};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::CatalogLoadError;
use crate::models::{
    BudgetTier, CompanySizeTier, CountryClass, ModifierKey, RankClass, Restriction,
    SavingsDirection, StandardReference, SystemType, Vocabulary,
};

/// Catalog shipped with the engine
const DEFAULT_CATALOG: &str = include_str!("default_catalog.json");

/// What makes a playbook rule apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum RuleKey {
    BudgetTier(BudgetTier),
    CompanySize(CompanySizeTier),
    SystemType(SystemType),
    Restriction(Restriction),
    CountryClass(CountryClass),
}

impl RuleKey {
    /// Ranking band of every recommendation the rule emits
    pub fn rank_class(&self) -> RankClass {
        match self {
            Self::Restriction(_) | Self::CountryClass(CountryClass::StrictResidency) => {
                RankClass::Compliance
            }
            Self::BudgetTier(_) => RankClass::Budget,
            Self::CompanySize(_) => RankClass::CompanySize,
            Self::SystemType(_) | Self::CountryClass(CountryClass::Standard) => {
                RankClass::SystemType
            }
        }
    }
}

impl From<ModifierKey> for RuleKey {
    fn from(key: ModifierKey) -> Self {
        match key {
            ModifierKey::SystemType(system) => Self::SystemType(system),
            ModifierKey::Restriction(restriction) => Self::Restriction(restriction),
            ModifierKey::CountryClass(class) => Self::CountryClass(class),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetTier(tier) => write!(f, "budget-tier:{}", tier),
            Self::CompanySize(tier) => write!(f, "company-size:{}", tier),
            Self::SystemType(system) => write!(f, "system-type:{}", system.name()),
            Self::Restriction(restriction) => write!(f, "restriction:{}", restriction.name()),
            Self::CountryClass(class) => write!(f, "country-class:{}", class),
        }
    }
}

/// Elevated-priority variant of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escalation {
    pub when: UsageCondition,
    /// Added to the rank-class weight; kept below the gap between classes
    pub boost: u32,
    pub rationale: String,
}

/// One recommendation a rule can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationTemplate {
    pub domain: String,
    pub action: String,
    pub rationale: String,
    pub direction: SavingsDirection,
    /// Template only fires when this holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<UsageCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Escalation>,
}

/// Trigger plus the advice it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookRule {
    pub trigger: RuleKey,
    pub templates: Vec<RecommendationTemplate>,
    #[serde(default)]
    pub tracked_metrics: Vec<String>,
    /// Practices to adopt while acting on the rule
    #[serde(default)]
    pub practices: Vec<String>,
    /// Practices to avoid while acting on the rule
    #[serde(default)]
    pub guardrails: Vec<String>,
    /// Policy boundary note for restriction and country rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

/// Practice recommended whenever a usage condition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalPractice {
    pub when: UsageCondition,
    pub practice: String,
}

/// On-disk catalog layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CatalogDocument {
    version: String,
    published_on: NaiveDate,
    #[serde(default)]
    standards: Vec<StandardReference>,
    default_boundary: String,
    #[serde(default)]
    default_practices: Vec<String>,
    #[serde(default)]
    conditional_practices: Vec<ConditionalPractice>,
    rules: Vec<PlaybookRule>,
}

/// Immutable, validated rule catalog
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    document: CatalogDocument,
    index: HashMap<RuleKey, usize>,
}

impl RuleCatalog {
    /// Parse the catalog embedded in the crate
    pub fn builtin() -> Result<Self, CatalogLoadError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    /// Load an operator-supplied catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "Read rule catalog");
        Self::from_json(&content)
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self, CatalogLoadError> {
        if document.version.trim().is_empty() {
            return Err(CatalogLoadError::MissingVersion);
        }

        let mut index = HashMap::with_capacity(document.rules.len());
        for (position, rule) in document.rules.iter().enumerate() {
            if index.insert(rule.trigger, position).is_some() {
                return Err(CatalogLoadError::DuplicateTrigger(rule.trigger.to_string()));
            }
            for (i, template) in rule.templates.iter().enumerate() {
                let empty = if template.domain.trim().is_empty() {
                    Some("domain")
                } else if template.action.trim().is_empty() {
                    Some("action")
                } else {
                    None
                };
                if let Some(what) = empty {
                    return Err(CatalogLoadError::EmptyTemplateField {
                        trigger: rule.trigger.to_string(),
                        what,
                        index: i,
                    });
                }
            }
        }

        // Every profile classifies into one budget and one company-size tier,
        // so both families must be covered completely.
        let required = BudgetTier::ALL
            .into_iter()
            .map(RuleKey::BudgetTier)
            .chain(CompanySizeTier::ALL.into_iter().map(RuleKey::CompanySize));
        for key in required {
            if !index.contains_key(&key) {
                return Err(CatalogLoadError::MissingTierRule(key.to_string()));
            }
        }

        Ok(Self { document, index })
    }

    /// Rule for a trigger, with its declared position
    pub fn rule(&self, key: &RuleKey) -> Option<(usize, &PlaybookRule)> {
        self.index
            .get(key)
            .map(|&position| (position, &self.document.rules[position]))
    }

    /// All rules in declared order
    pub fn rules(&self) -> &[PlaybookRule] {
        &self.document.rules
    }

    pub fn version(&self) -> &str {
        &self.document.version
    }

    pub fn published_on(&self) -> NaiveDate {
        self.document.published_on
    }

    pub fn standards(&self) -> &[StandardReference] {
        &self.document.standards
    }

    /// Boundary note used when no matched rule carries one
    pub fn default_boundary(&self) -> &str {
        &self.document.default_boundary
    }

    /// Practices recommended for every profile
    pub fn default_practices(&self) -> &[String] {
        &self.document.default_practices
    }

    pub fn conditional_practices(&self) -> &[ConditionalPractice] {
        &self.document.conditional_practices
    }

    /// Serialize the catalog back to its document form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document)
    }
}
