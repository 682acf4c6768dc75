//! Rule composition for the behavioral guard.
//!
//! - [`languages`]: static-table language detection
//! - [`ruleset`]: rule file loading from `.chainlink/rules/`
//! - [`snapshot`]: project tree and dependency grounding blocks
//! - [`composer`]: full/condensed guard composition and the web protocol

pub mod composer;
pub mod languages;
pub mod ruleset;
pub mod snapshot;

pub use composer::{compose, should_send_full, web_guard, ComposedRules};
pub use languages::{detect_languages, language_list, LanguageSpec, LANGUAGES, LANGUAGE_FALLBACK};
pub use ruleset::RuleSet;
pub use snapshot::{dependency_snapshot, project_tree};
