//! Interview challenge catalog: read-only records with lookup, filtering and
//! case-insensitive substring search.

use crate::bundle::SourceBundle;
use crate::error::{SandboxError, SandboxResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

const BUILTIN_CHALLENGES: &[&str] = &[
    include_str!("../challenges/debounce-search.yaml"),
    include_str!("../challenges/todo-app.yaml"),
    include_str!("../challenges/infinite-scroll.yaml"),
    include_str!("../challenges/modal-component.yaml"),
    include_str!("../challenges/data-table.yaml"),
    include_str!("../challenges/form-validation.yaml"),
    include_str!("../challenges/drag-drop.yaml"),
    include_str!("../challenges/use-reducer-cart.yaml"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Difficulty::Easy => "hsl(142 76% 36%)",
            Difficulty::Medium => "hsl(38 92% 50%)",
            Difficulty::Hard => "hsl(0 72% 51%)",
        }
    }

    /// Suggested time budget for the difficulty, in minutes.
    pub fn minutes(self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Medium => 30,
            Difficulty::Hard => 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ReactHooks,
    DomManipulation,
    StateManagement,
    CssLayout,
    AsyncPatterns,
    ComponentDesign,
    Performance,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::ReactHooks => "React Hooks",
            Category::DomManipulation => "DOM Manipulation",
            Category::StateManagement => "State Management",
            Category::CssLayout => "CSS & Layout",
            Category::AsyncPatterns => "Async Patterns",
            Category::ComponentDesign => "Component Design",
            Category::Performance => "Performance",
        }
    }
}

/// One timed interview exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Minutes.
    pub time_limit: u32,
    pub initial_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_css: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Challenge {
    pub fn limit_seconds(&self) -> u32 {
        self.time_limit.saturating_mul(60)
    }

    /// Starter code and stylesheet, restored on reset and on exercise switch.
    pub fn default_bundle(&self) -> SourceBundle {
        SourceBundle {
            component_source: self.initial_code.clone(),
            style_source: self.initial_css.clone().unwrap_or_default(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    fn validate(&self) -> SandboxResult<()> {
        if !id_regex().is_match(&self.id) {
            return Err(SandboxError::InvalidChallenge {
                id: self.id.clone(),
                reason: "id must be non-empty and contain only letters, digits, '-' or '_'"
                    .to_string(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(SandboxError::InvalidChallenge {
                id: self.id.clone(),
                reason: "title must not be empty".to_string(),
            });
        }
        if self.time_limit == 0 {
            return Err(SandboxError::InvalidChallenge {
                id: self.id.clone(),
                reason: "timeLimit must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

static CHALLENGE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn id_regex() -> &'static Regex {
    CHALLENGE_ID_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap())
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    challenges: Vec<Challenge>,
}

impl Catalog {
    pub fn new(challenges: Vec<Challenge>) -> SandboxResult<Self> {
        let mut seen = HashSet::new();
        for c in &challenges {
            c.validate()?;
            if !seen.insert(c.id.as_str()) {
                return Err(SandboxError::DuplicateChallenge { id: c.id.clone() });
            }
        }
        Ok(Self { challenges })
    }

    /// Parses a YAML sequence of challenges.
    pub fn from_yaml_str(yaml: &str) -> SandboxResult<Self> {
        let challenges: Vec<Challenge> = serde_yaml::from_str(yaml)?;
        Self::new(challenges)
    }

    /// Parses one YAML document per challenge.
    pub fn from_yaml_documents<'a>(docs: impl IntoIterator<Item = &'a str>) -> SandboxResult<Self> {
        let challenges = docs
            .into_iter()
            .map(serde_yaml::from_str::<Challenge>)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(challenges)
    }

    /// The challenges shipped with the crate.
    pub fn builtin() -> SandboxResult<Self> {
        Self::from_yaml_documents(BUILTIN_CHALLENGES.iter().copied())
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn require(&self, id: &str) -> SandboxResult<&Challenge> {
        self.get(id).ok_or_else(|| SandboxError::UnknownChallenge { id: id.to_string() })
    }

    pub fn by_category(&self, category: Category) -> Vec<&Challenge> {
        self.challenges.iter().filter(|c| c.category == category).collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Challenge> {
        self.challenges.iter().filter(|c| c.difficulty == difficulty).collect()
    }

    /// Case-insensitive substring match over title, description and tags.
    pub fn search(&self, query: &str) -> Vec<&Challenge> {
        let needle = query.to_lowercase();
        self.challenges.iter().filter(|c| c.matches(&needle)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}
