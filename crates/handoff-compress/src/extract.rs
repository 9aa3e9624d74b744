//! Line-oriented signal extraction from conversation transcripts
//!
//! Four independent passes, each stateless and order-preserving:
//! session intent, action log, file artifacts and code breadcrumbs.
//! No pass reads another pass's output.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const USER_PREFIX: &str = "user:";

const INTENT_NOISE: &[&str] = &[
    "TODO", "FIXME", "Note:", "NOTE:", "```", "[DEBUG]", "[INFO]", "[WARNING]", "[ERROR]",
];

const ACTION_VERBS: &[&str] = &[
    "created",
    "modified",
    "fixed",
    "implemented",
    "refactored",
    "optimized",
    "added",
    "removed",
    "updated",
    "commit",
    "pushed",
    "merged",
    "deployed",
    "tested",
];

const FILE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".rs", ".go", ".md", ".json", ".yaml", ".yml", ".toml",
    ".sh", ".bat", ".feature", ".sql", ".html", ".css", ".txt",
];

const LEGACY_FILE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".md", ".json", ".yaml", ".yml", ".sh", ".bat",
    ".feature", ".sql", ".html", ".css", ".txt",
];

const PATH_TRIM: &[char] = &[',', ':', ';', '(', ')', '[', ']', '{', '}', '"', '\'', ' '];

const KIND_TERMINATORS: &[char] = &['(', ':', '=', '{', ',', ' ', '\t'];
const KEYWORD_TERMINATORS: &[char] = &['(', ':', '='];

const MAX_IDENTIFIER_CHARS: usize = 50;

/// Declaration keyword -> breadcrumb kind, scanned in this order
const DECLARATION_PATTERNS: &[(&str, &str)] = &[
    ("async def ", "async_function"),
    ("def ", "function"),
    ("class ", "class"),
    ("function ", "function"),
    ("const ", "const"),
    ("let ", "variable"),
    ("var ", "variable"),
    ("import ", "import"),
    ("from ", "module"),
    ("export ", "export"),
    ("@property", "property"),
    ("@staticmethod", "static_method"),
    ("@classmethod", "class_method"),
];

const LEGACY_DECLARATION_PATTERNS: &[(&str, &str)] = &[
    ("def ", "function"),
    ("class ", "class"),
    ("function ", "function"),
    ("const ", "const"),
    ("let ", "variable"),
    ("var ", "variable"),
    ("import ", "import"),
    ("from ", "module"),
    ("export ", "export"),
];

static ACTION_NOISE_RE: OnceLock<Vec<Regex>> = OnceLock::new();

fn action_noise() -> &'static [Regex] {
    ACTION_NOISE_RE.get_or_init(|| {
        [
            r"^[-=*_~]{3,}$",
            r"^\[(DEBUG|INFO|WARN|WARNING|ERROR|TRACE)\]",
            r"^Traceback \(most recent call last\)",
            r#"^File ".*", line \d+"#,
            r"^\d+(\.\d+)?%",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
    })
}

/// How breadcrumbs are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreadcrumbStyle {
    /// `"function:authenticate_user"`
    Kind,
    /// `"def: authenticate_user"`
    Keyword,
}

/// Which loop is outermost when scanning for breadcrumbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreadcrumbOrder {
    /// Every line for the first pattern, then every line for the next
    ByPattern,
    /// Every pattern for the first line, then every pattern for the next
    ByLine,
}

/// Caps and thresholds for the extraction passes
#[derive(Debug, Clone)]
pub struct ExtractLimits {
    /// Only the first N user lines are considered (before length filtering)
    pub intent_candidates: Option<usize>,
    /// Intent length must be strictly greater than this
    pub min_intent_chars: usize,
    /// Intent length must be strictly less than this
    pub max_intent_chars: Option<usize>,
    pub max_intents: usize,
    /// Qualifying action lines are cut to this many chars
    pub max_action_chars: usize,
    /// Truncated action length must be strictly greater than this
    pub min_action_chars: usize,
    pub max_actions: usize,
    pub max_breadcrumbs: usize,
    /// Skip comment lines and denylisted noise
    pub filter_noise: bool,
    pub breadcrumb_style: BreadcrumbStyle,
    pub breadcrumb_order: BreadcrumbOrder,
    /// Declaration keyword -> breadcrumb kind, scanned in this order
    pub declarations: &'static [(&'static str, &'static str)],
    /// Extensions that mark a path token as an artifact, scanned in this order
    pub extensions: &'static [&'static str],
}

impl ExtractLimits {
    pub fn standard() -> Self {
        Self {
            intent_candidates: None,
            min_intent_chars: 15,
            max_intent_chars: Some(200),
            max_intents: 5,
            max_action_chars: 80,
            min_action_chars: 10,
            max_actions: 15,
            max_breadcrumbs: 40,
            filter_noise: true,
            breadcrumb_style: BreadcrumbStyle::Kind,
            breadcrumb_order: BreadcrumbOrder::ByPattern,
            declarations: DECLARATION_PATTERNS,
            extensions: FILE_EXTENSIONS,
        }
    }

    /// The simpler handoff format: fewer intents, longer actions, keyword
    /// breadcrumbs in line order over a smaller declaration table
    pub fn legacy() -> Self {
        Self {
            intent_candidates: Some(3),
            min_intent_chars: 20,
            max_intent_chars: None,
            max_intents: 3,
            max_action_chars: 100,
            min_action_chars: 0,
            max_actions: 20,
            max_breadcrumbs: 30,
            filter_noise: false,
            breadcrumb_style: BreadcrumbStyle::Keyword,
            breadcrumb_order: BreadcrumbOrder::ByLine,
            declarations: LEGACY_DECLARATION_PATTERNS,
            extensions: LEGACY_FILE_EXTENSIONS,
        }
    }
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// Heuristic extractor over raw conversation text
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    limits: ExtractLimits,
}

impl Extractor {
    pub fn new(limits: ExtractLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractLimits {
        &self.limits
    }

    /// User-originated statements, first-N in transcript order
    pub fn session_intent(&self, text: &str) -> Vec<String> {
        let limits = &self.limits;
        text.split('\n')
            .filter_map(strip_user_prefix)
            .take(limits.intent_candidates.unwrap_or(usize::MAX))
            .filter(|intent| !(limits.filter_noise && contains_any(intent, INTENT_NOISE)))
            .filter(|intent| {
                let len = intent.chars().count();
                len > limits.min_intent_chars
                    && limits.max_intent_chars.map_or(true, |max| len < max)
            })
            .take(limits.max_intents)
            .map(str::to_string)
            .collect()
    }

    /// Lines describing completed work, deduplicated in first-seen order
    pub fn actions(&self, text: &str) -> Vec<String> {
        let limits = &self.limits;
        let mut seen = HashSet::new();
        let mut actions = Vec::new();

        for line in text.split('\n') {
            let trimmed = line.trim();
            if limits.filter_noise && (is_comment(trimmed) || is_action_noise(trimmed)) {
                continue;
            }

            let lower = trimmed.to_lowercase();
            if !ACTION_VERBS.iter().any(|verb| lower.contains(verb)) {
                continue;
            }

            let action = truncate_chars(trimmed, limits.max_action_chars);
            if action.chars().count() <= limits.min_action_chars {
                continue;
            }

            if seen.insert(action.to_string()) {
                actions.push(action.to_string());
                if actions.len() == limits.max_actions {
                    break;
                }
            }
        }

        actions
    }

    /// File-path-like tokens: a known extension plus a path separator,
    /// ordered by line, then by extension table
    pub fn artifacts(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut artifacts = Vec::new();

        for line in text.split('\n') {
            for ext in self.limits.extensions.iter().filter(|ext| line.contains(*ext)) {
                for token in line.split_whitespace() {
                    let is_path = token.contains('/') || token.contains('\\');
                    if !is_path || !token.contains(ext) {
                        continue;
                    }

                    let path = token.trim_matches(PATH_TRIM);
                    if !path.is_empty() && seen.insert(path.to_string()) {
                        artifacts.push(path.to_string());
                    }
                }
            }
        }

        artifacts
    }

    /// Declared identifiers, deduplicated, in pattern-major or line-major order
    pub fn breadcrumbs(&self, text: &str) -> Vec<String> {
        let limits = &self.limits;
        let lines: Vec<&str> = text.split('\n').collect();
        let count = lines.len();
        let declarations = limits.declarations;

        let candidates: Box<dyn Iterator<Item = (usize, (&str, &str))>> =
            match limits.breadcrumb_order {
                BreadcrumbOrder::ByPattern => Box::new(
                    declarations
                        .iter()
                        .flat_map(move |&pattern| (0..count).map(move |idx| (idx, pattern))),
                ),
                BreadcrumbOrder::ByLine => Box::new((0..count).flat_map(move |idx| {
                    declarations.iter().map(move |&pattern| (idx, pattern))
                })),
            };

        let mut seen = HashSet::new();
        candidates
            .filter_map(|(idx, (keyword, kind))| self.breadcrumb(&lines, idx, keyword, kind))
            .filter(|crumb| seen.insert(crumb.clone()))
            .take(limits.max_breadcrumbs)
            .collect()
    }

    fn breadcrumb(&self, lines: &[&str], idx: usize, keyword: &str, kind: &str) -> Option<String> {
        let line = lines[idx];
        let trimmed = line.trim();
        if trimmed.is_empty() || (self.limits.filter_noise && is_comment(trimmed)) {
            return None;
        }

        let pos = line.find(keyword)?;
        let mut rest = &line[pos + keyword.len()..];
        if keyword.starts_with('@') && rest.trim().is_empty() {
            rest = decorated_name(&lines[idx + 1..]);
        }

        let identifier = self.identifier(rest)?;
        Some(match self.limits.breadcrumb_style {
            BreadcrumbStyle::Kind => format!("{}:{}", kind, identifier),
            BreadcrumbStyle::Keyword => format!("{}: {}", keyword.trim(), identifier),
        })
    }

    fn identifier<'a>(&self, rest: &'a str) -> Option<&'a str> {
        let (terminators, min_chars) = match self.limits.breadcrumb_style {
            BreadcrumbStyle::Kind => (KIND_TERMINATORS, 2),
            BreadcrumbStyle::Keyword => (KEYWORD_TERMINATORS, 0),
        };

        let identifier = rest
            .trim_start()
            .split(terminators)
            .next()
            .unwrap_or("")
            .trim();

        let len = identifier.chars().count();
        (len > min_chars && len < MAX_IDENTIFIER_CHARS).then_some(identifier)
    }
}

/// Strip a case-insensitive `user:` prefix, returning the trimmed statement
fn strip_user_prefix(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let prefix = line.get(..USER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(USER_PREFIX) {
        return None;
    }
    Some(line[USER_PREFIX.len()..].trim())
}

/// The function a decorator applies to, from the next non-blank `def` line
fn decorated_name<'a>(following: &[&'a str]) -> &'a str {
    let Some(next) = following.iter().map(|l| l.trim()).find(|l| !l.is_empty()) else {
        return "";
    };
    next.strip_prefix("async def ")
        .or_else(|| next.strip_prefix("def "))
        .unwrap_or("")
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

fn is_action_noise(trimmed: &str) -> bool {
    action_noise().iter().any(|re| re.is_match(trimmed))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> Extractor {
        Extractor::default()
    }

    #[test]
    fn test_empty_input_yields_empty_sequences() {
        let extractor = standard();
        assert!(extractor.session_intent("").is_empty());
        assert!(extractor.actions("").is_empty());
        assert!(extractor.artifacts("").is_empty());
        assert!(extractor.breadcrumbs("").is_empty());
    }

    #[test]
    fn test_intent_requires_user_prefix() {
        let text = "User: Implement login feature\nAssistant: Sure, implementing the login flow\nuser: add password reset endpoint";
        let intents = standard().session_intent(text);
        assert_eq!(
            intents,
            vec!["Implement login feature", "add password reset endpoint"]
        );
    }

    #[test]
    fn test_intent_length_bounds() {
        let long = format!("User: {}", "x".repeat(200));
        let text = format!("User: too short\n{}\nUSER: exactly sixteen ch", long);
        let intents = standard().session_intent(&text);
        // "too short" is 9 chars, the long one is 200 (exclusive upper bound)
        assert_eq!(intents, vec!["exactly sixteen ch"]);
    }

    #[test]
    fn test_intent_noise_denylist() {
        let text = "User: TODO remember the migration script\nUser: Note: this is just background\nUser: Build the export pipeline today";
        let intents = standard().session_intent(text);
        assert_eq!(intents, vec!["Build the export pipeline today"]);
    }

    #[test]
    fn test_intent_cap() {
        let text: String = (0..10)
            .map(|i| format!("User: request number {} for the backlog\n", i))
            .collect();
        let intents = standard().session_intent(&text);
        assert_eq!(intents.len(), 5);
        assert!(intents[0].contains("number 0"));
        assert!(intents[4].contains("number 4"));
    }

    #[test]
    fn test_legacy_intent_considers_first_three_candidates() {
        let text = "User: short\nUser: this request is long enough to keep\nUser: tiny\nUser: this fourth request is never considered";
        let extractor = Extractor::new(ExtractLimits::legacy());
        assert_eq!(
            extractor.session_intent(text),
            vec!["this request is long enough to keep"]
        );
    }

    #[test]
    fn test_actions_keyword_match_and_truncation() {
        let long = format!("Refactored {}", "the storage layer ".repeat(10));
        let text = format!("Created: auth.py\nran some checks\n{}", long);
        let actions = standard().actions(&text);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], "Created: auth.py");
        assert_eq!(actions[1].chars().count(), 80);
    }

    #[test]
    fn test_actions_skip_comments_noise_and_short_lines() {
        let text = "# Created by generator\n// updated automatically\n[DEBUG] updated cache entry\n---\nfixed it\nFixed the flaky login test";
        let actions = standard().actions(text);
        assert_eq!(actions, vec!["Fixed the flaky login test"]);
    }

    #[test]
    fn test_actions_deduplicate() {
        let text = "Pushed branch to origin\n".repeat(100);
        let actions = standard().actions(&text);
        assert_eq!(actions, vec!["Pushed branch to origin"]);
    }

    #[test]
    fn test_legacy_actions_keep_comments_and_short_lines() {
        let text = "# Created by generator\nfixed it";
        let extractor = Extractor::new(ExtractLimits::legacy());
        assert_eq!(
            extractor.actions(text),
            vec!["# Created by generator", "fixed it"]
        );
    }

    #[test]
    fn test_artifacts_require_path_separator() {
        let text = "Created: auth.py\nModified: src/auth/login.py, docs/README.md\nSee (tests\\test_auth.py)";
        let artifacts = standard().artifacts(text);
        assert_eq!(
            artifacts,
            vec!["src/auth/login.py", "docs/README.md", "tests\\test_auth.py"]
        );
    }

    #[test]
    fn test_artifacts_ordered_by_extension_within_line() {
        let text = "Touched src/main.rs and scripts/build.py\nthen web/app.js";
        let artifacts = standard().artifacts(text);
        assert_eq!(
            artifacts,
            vec!["scripts/build.py", "src/main.rs", "web/app.js"]
        );
    }

    #[test]
    fn test_artifacts_deduplicate_and_ignore_urls_without_extension() {
        let text = "Edited src/lib.rs\nEdited src/lib.rs again\nSee https://example.com/page";
        let artifacts = standard().artifacts(text);
        assert_eq!(artifacts, vec!["src/lib.rs"]);
    }

    #[test]
    fn test_breadcrumbs_kinds() {
        let text = "def authenticate_user():\nclass SessionStore:\nconst MAX_RETRIES = 3\nfrom pathlib import Path";
        let crumbs = standard().breadcrumbs(text);
        assert_eq!(
            crumbs,
            vec![
                "function:authenticate_user",
                "class:SessionStore",
                "const:MAX_RETRIES",
                "import:Path",
                "module:pathlib",
            ]
        );
    }

    #[test]
    fn test_breadcrumbs_identifier_length_bounds() {
        let long_name = "a".repeat(50);
        let text = format!("import os\ndef {}():\ndef ok_name():", long_name);
        let crumbs = standard().breadcrumbs(&text);
        assert_eq!(crumbs, vec!["function:ok_name"]);
    }

    #[test]
    fn test_breadcrumbs_skip_comment_lines() {
        let text = "# def commented_out():\n// function legacyHandler()\ndef live_handler():";
        let crumbs = standard().breadcrumbs(text);
        assert_eq!(crumbs, vec!["function:live_handler"]);
    }

    #[test]
    fn test_breadcrumbs_async_and_decorators() {
        let text = "    @property\n    def display_name(self):\n        return self.name\nasync def fetch_rows():";
        let crumbs = standard().breadcrumbs(text);
        assert!(crumbs.contains(&"async_function:fetch_rows".to_string()));
        assert!(crumbs.contains(&"function:fetch_rows".to_string()));
        assert!(crumbs.contains(&"property:display_name".to_string()));
    }

    #[test]
    fn test_breadcrumbs_cap() {
        let text: String = (0..100).map(|i| format!("def handler_{}():\n", i)).collect();
        let crumbs = standard().breadcrumbs(&text);
        assert_eq!(crumbs.len(), 40);
        assert_eq!(crumbs[0], "function:handler_0");
    }

    #[test]
    fn test_legacy_breadcrumb_format() {
        let text = "def compress_context(conversation):\nclass ContextCompressor:";
        let extractor = Extractor::new(ExtractLimits::legacy());
        assert_eq!(
            extractor.breadcrumbs(text),
            vec!["def: compress_context", "class: ContextCompressor"]
        );
    }

    #[test]
    fn test_legacy_breadcrumbs_follow_line_order() {
        let text = "class Foo:\ndef bar():\nfrom pathlib import Path";
        let extractor = Extractor::new(ExtractLimits::legacy());
        assert_eq!(
            extractor.breadcrumbs(text),
            vec!["class: Foo", "def: bar", "import: Path", "from: pathlib import Path"]
        );

        // the standard profile groups by pattern instead
        assert_eq!(
            standard().breadcrumbs(text),
            vec!["function:bar", "class:Foo", "import:Path", "module:pathlib"]
        );
    }

    #[test]
    fn test_legacy_uses_smaller_tables() {
        let text = "    @property\n    def display_name(self):\nasync def fetch_rows():\nEdited src/main.rs and src/app.py";
        let extractor = Extractor::new(ExtractLimits::legacy());
        assert_eq!(
            extractor.breadcrumbs(text),
            vec!["def: display_name", "def: fetch_rows"]
        );
        assert_eq!(extractor.artifacts(text), vec!["src/app.py"]);
    }

    #[test]
    fn test_passes_are_idempotent() {
        let text = "User: Implement dynamic memory compression for handoffs\nCreated: project/scripts/compress.py\ndef compress_context(conversation):";
        let extractor = standard();
        assert_eq!(extractor.session_intent(text), extractor.session_intent(text));
        assert_eq!(extractor.actions(text), extractor.actions(text));
        assert_eq!(extractor.artifacts(text), extractor.artifacts(text));
        assert_eq!(extractor.breadcrumbs(text), extractor.breadcrumbs(text));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("記憶交接", 2), "記憶");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
