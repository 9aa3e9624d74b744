//! Decisions, code patterns and learnings derived for a handoff

use serde::{Deserialize, Serialize};

const MAX_DECISIONS: usize = 10;
const MAX_LEARNINGS: usize = 10;
const MAX_PATTERNS_PER_KIND: usize = 5;

const DECISION_MARKERS: &[&str] = &["decision:", "decided to", "選擇"];
const RATIONALE_MARKERS: &[&str] = &["rationale:", "理由", "因為"];

const SOLUTION_KEYWORDS: &[&str] = &["fixed", "resolved", "solved", "修復"];
const OPTIMIZATION_KEYWORDS: &[&str] = &["optimized", "improved", "優化"];
const IMPLEMENTATION_KEYWORDS: &[&str] = &["implemented", "created", "實作", "創建"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: String,
    pub rationale: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodePattern {
    pub pattern: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub use_case: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningKind {
    Solution,
    Optimization,
    Implementation,
}

impl LearningKind {
    fn context(self) -> &'static str {
        match self {
            LearningKind::Solution => "Problem resolution",
            LearningKind::Optimization => "Performance improvement",
            LearningKind::Implementation => "New feature creation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learning {
    pub pattern: String,
    #[serde(rename = "type")]
    pub kind: LearningKind,
    pub context: String,
}

/// Decision lines, each paired with the rationale line that follows it
pub fn extract_decisions(text: &str) -> Vec<Decision> {
    let mut decisions = Vec::new();
    let mut current: Option<Decision> = None;

    for line in text.split('\n') {
        let lower = line.to_lowercase();

        if DECISION_MARKERS.iter().any(|m| lower.contains(m)) {
            decisions.extend(current.take());
            current = Some(Decision {
                decision: line.trim().to_string(),
                rationale: String::new(),
                source: "conversation".to_string(),
            });
        } else if let Some(decision) = current.as_mut() {
            if RATIONALE_MARKERS.iter().any(|m| lower.contains(m)) {
                decision.rationale = line.trim().to_string();
            }
        }
    }

    decisions.extend(current);
    decisions.truncate(MAX_DECISIONS);
    decisions
}

/// Function and class breadcrumbs recast as reusable patterns
pub fn extract_code_patterns(breadcrumbs: &[String]) -> Vec<CodePattern> {
    let of_kind = |kind: &'static str, label: &'static str| {
        let prefix = format!("{}:", kind);
        breadcrumbs
            .iter()
            .filter_map(move |b| b.strip_prefix(prefix.as_str()).map(str::to_string))
            .take(MAX_PATTERNS_PER_KIND)
            .map(move |identifier| CodePattern {
                use_case: format!("{} pattern: {}", label, identifier),
                pattern: identifier,
                kind: kind.to_string(),
            })
    };

    of_kind("function", "Function")
        .chain(of_kind("class", "Class"))
        .collect()
}

/// Actions classified by what kind of lesson they carry
pub fn extract_learnings(play_by_play: &[String]) -> Vec<Learning> {
    play_by_play
        .iter()
        .filter_map(|action| {
            let kind = classify_learning(&action.to_lowercase())?;
            Some(Learning {
                pattern: action.clone(),
                kind,
                context: kind.context().to_string(),
            })
        })
        .take(MAX_LEARNINGS)
        .collect()
}

fn classify_learning(lower: &str) -> Option<LearningKind> {
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has(SOLUTION_KEYWORDS) {
        Some(LearningKind::Solution)
    } else if has(OPTIMIZATION_KEYWORDS) {
        Some(LearningKind::Optimization)
    } else if has(IMPLEMENTATION_KEYWORDS) {
        Some(LearningKind::Implementation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decisions_with_rationale() {
        let text = "Decision: use a five-tier weighting scheme\nRationale: balances importance and flexibility\nWe decided to keep JSON as the fallback\nunrelated line";
        let decisions = extract_decisions(text);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].decision, "Decision: use a five-tier weighting scheme");
        assert_eq!(
            decisions[0].rationale,
            "Rationale: balances importance and flexibility"
        );
        assert_eq!(decisions[1].rationale, "");
        assert_eq!(decisions[1].source, "conversation");
    }

    #[test]
    fn test_rationale_without_decision_is_ignored() {
        assert!(extract_decisions("Rationale: nothing to attach to").is_empty());
    }

    #[test]
    fn test_decisions_cap() {
        let text = "Decision: option\n".repeat(15);
        assert_eq!(extract_decisions(&text).len(), 10);
    }

    #[test]
    fn test_code_patterns_functions_then_classes() {
        let breadcrumbs: Vec<String> = [
            "class:MemoryHub",
            "function:sort_by_priority",
            "import:json",
            "function:compress_context",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let patterns = extract_code_patterns(&breadcrumbs);
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].pattern, "sort_by_priority");
        assert_eq!(patterns[1].pattern, "compress_context");
        assert_eq!(patterns[2].kind, "class");
        assert_eq!(patterns[2].use_case, "Class pattern: MemoryHub");
    }

    #[test]
    fn test_learnings_classification() {
        let actions: Vec<String> = [
            "Fixed: version detection regex",
            "Optimized: token allocation by priority",
            "Created: context7_integration.py",
            "Pushed branch",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let learnings = extract_learnings(&actions);
        let kinds: Vec<_> = learnings.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LearningKind::Solution,
                LearningKind::Optimization,
                LearningKind::Implementation
            ]
        );
        assert_eq!(learnings[0].context, "Problem resolution");
    }

    #[test]
    fn test_learning_serializes_type_field() {
        let learning = Learning {
            pattern: "Fixed login".to_string(),
            kind: LearningKind::Solution,
            context: "Problem resolution".to_string(),
        };
        let value = serde_json::to_value(&learning).unwrap();
        assert_eq!(value["type"], "solution");
    }
}
