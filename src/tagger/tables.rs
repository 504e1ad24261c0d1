//! Lookup tables for tag derivation. Order matters in both tables.

/// How a model pattern is matched against the lowercased model string
#[derive(Debug, Clone, Copy)]
pub enum ModelPattern {
    Contains(&'static str),
    Prefix(&'static str),
}

impl ModelPattern {
    pub fn matches(self, model: &str) -> bool {
        match self {
            ModelPattern::Contains(p) => model.contains(p),
            ModelPattern::Prefix(p) => model.starts_with(p),
        }
    }
}

use ModelPattern::{Contains, Prefix};

/// Model families in priority order; the first family with a matching pattern wins
pub const MODEL_FAMILIES: &[(&str, &[ModelPattern])] = &[
    ("gpt-5", &[Contains("gpt-5")]),
    ("gpt-4o", &[Contains("gpt-4o")]),
    ("gpt-4", &[Contains("gpt-4")]),
    ("gpt-3.5", &[Contains("gpt-3.5"), Contains("gpt-35")]),
    ("claude-3.7", &[Contains("claude-3.7"), Contains("claude-3-7")]),
    ("claude-3.5", &[Contains("claude-3.5"), Contains("claude-3-5")]),
    (
        "claude-4",
        &[
            Contains("claude-opus-4"),
            Contains("claude-sonnet-4"),
            Contains("claude-haiku-4"),
            Contains("claude-4"),
        ],
    ),
    ("claude-3", &[Contains("claude-3")]),
    ("o-series", &[Prefix("o1"), Prefix("o3"), Prefix("o4")]),
];

/// How a topic keyword is matched against the lowercased body
#[derive(Debug, Clone, Copy)]
pub enum Keyword {
    Substring(&'static str),
    /// Whole word only: neighbours must not be alphanumeric
    Word(&'static str),
}

impl Keyword {
    pub fn matches(self, text: &str) -> bool {
        match self {
            Keyword::Substring(k) => text.contains(k),
            Keyword::Word(w) => text.match_indices(w).any(|(start, _)| {
                let before = text[..start].chars().next_back();
                let after = text[start + w.len()..].chars().next();
                let boundary = |c: Option<char>| !c.is_some_and(char::is_alphanumeric);
                boundary(before) && boundary(after)
            }),
        }
    }
}

use Keyword::{Substring as S, Word as W};

/// Topic name and the case-insensitive keywords that signal it
pub const TOPICS: &[(&str, &[Keyword])] = &[
    ("typescript", &[S("typescript"), S("tsx"), S("tsconfig"), W("tsc")]),
    ("javascript", &[S("javascript"), S("node.js"), S("nodejs"), W("npm"), S("pnpm"), S("yarn")]),
    ("react", &[S("react"), S("jsx"), S("usestate"), S("useeffect")]),
    ("python", &[S("python"), S("pip install"), S("django"), S("flask"), S("pandas"), S("numpy")]),
    ("rust", &[S("rust"), S("cargo"), S("rustc"), S("crate")]),
    ("go", &[S("golang"), S("go mod"), S("goroutine")]),
    ("git", &[W("git"), S("github"), S("commit"), S("rebase"), S("pull request"), S("branch")]),
    ("css", &[S("css"), S("tailwind"), S("scss"), S("sass"), S("flexbox"), S("stylesheet")]),
    ("html", &[S("html"), W("dom"), S("<div")]),
    ("api", &[W("api"), W("apis"), S("graphql"), S("endpoint"), S("axios"), S("webhook")]),
    (
        "database",
        &[
            S("database"),
            S("sql"),
            S("postgres"),
            S("mysql"),
            S("mongodb"),
            S("sqlite"),
            S("prisma"),
            S("redis"),
        ],
    ),
    ("testing", &[S("test"), S("jest"), S("vitest"), S("playwright"), S("cypress"), S("mock")]),
    ("debugging", &[S("debug"), S("error"), S("bug"), S("fix"), S("stack trace"), S("exception")]),
    ("devops", &[S("docker"), S("kubernetes"), S("ci/cd"), S("deploy"), S("terraform"), W("aws")]),
    ("coding", &[S("code"), S("function"), S("class"), S("refactor"), S("implement")]),
];
