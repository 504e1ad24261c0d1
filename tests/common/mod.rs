//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a fake home directory holding Claude Code and Codex session logs
pub struct HomeBuilder {
    temp_dir: TempDir,
}

impl HomeBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add `~/.claude/projects/<project>/<session>.jsonl`
    pub fn with_claude_code_session(self, project: &str, log: &ClaudeCodeLogBuilder) -> Self {
        let project_dir = self.temp_dir.path().join(".claude").join("projects").join(project);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");
        fs::write(project_dir.join(format!("{}.jsonl", log.session_id)), log.to_jsonl())
            .expect("Failed to write session log");
        self
    }

    /// Add a Codex rollout file under `~/.codex/sessions/<relative>`
    pub fn with_codex_session(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(".codex").join("sessions").join(relative);
        fs::create_dir_all(path.parent().expect("relative path has a parent"))
            .expect("Failed to create codex dir");
        fs::write(path, content).expect("Failed to write codex log");
        self
    }

    /// Write an arbitrary file relative to the home directory
    pub fn with_file(self, relative: &str, content: &[u8]) -> Self {
        let path = self.temp_dir.path().join(relative);
        fs::create_dir_all(path.parent().expect("relative path has a parent"))
            .expect("Failed to create dir");
        fs::write(path, content).expect("Failed to write file");
        self
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for HomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one Claude Code session log
pub struct ClaudeCodeLogBuilder {
    session_id: String,
    cwd: String,
    lines: Vec<Value>,
    minute: u32,
}

impl ClaudeCodeLogBuilder {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            cwd: "/home/dev/project".to_string(),
            lines: Vec::new(),
            minute: 0,
        }
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = cwd.to_string();
        self
    }

    fn next_timestamp(&mut self) -> String {
        self.minute += 1;
        format!("2025-02-03T10:{:02}:00Z", self.minute)
    }

    pub fn user(mut self, text: &str) -> Self {
        let timestamp = self.next_timestamp();
        self.lines.push(json!({
            "type": "user",
            "sessionId": self.session_id,
            "cwd": self.cwd,
            "timestamp": timestamp,
            "message": {"role": "user", "content": text},
        }));
        self
    }

    pub fn assistant(mut self, text: &str) -> Self {
        let timestamp = self.next_timestamp();
        self.lines.push(json!({
            "type": "assistant",
            "sessionId": self.session_id,
            "cwd": self.cwd,
            "timestamp": timestamp,
            "message": {
                "role": "assistant",
                "model": "claude-sonnet-4-20250514",
                "content": [{"type": "text", "text": text}],
            },
        }));
        self
    }

    pub fn raw_line(mut self, line: Value) -> Self {
        self.lines.push(line);
        self
    }

    pub fn to_jsonl(&self) -> String {
        self.lines.iter().map(Value::to_string).collect::<Vec<_>>().join("\n")
    }
}

/// Codex rollout with session metadata and one exchange
pub fn codex_rollout(id: &str, question: &str, answer: &str) -> String {
    [
        json!({"timestamp": "2025-08-01T12:00:00Z", "type": "session_meta",
               "payload": {"id": id, "timestamp": "2025-08-01T12:00:00Z", "cwd": "/home/dev/webapp", "model_provider": "openai"}}),
        json!({"timestamp": "2025-08-01T12:00:01Z", "type": "turn_context", "payload": {"model": "gpt-5-codex"}}),
        json!({"timestamp": "2025-08-01T12:00:02Z", "type": "response_item",
               "payload": {"type": "message", "role": "user", "content": [{"type": "input_text", "text": question}]}}),
        json!({"timestamp": "2025-08-01T12:00:03Z", "type": "response_item",
               "payload": {"type": "message", "role": "assistant", "content": [{"type": "output_text", "text": answer}]}}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n")
}

/// ChatGPT export whose tree forks below the root: A -> B (active) and A -> C
pub fn chatgpt_forked_export() -> String {
    json!([{
        "id": "chatgpt-fork",
        "title": "Forked chat",
        "create_time": 1736935200.25,
        "default_model_slug": "gpt-4o",
        "current_node": "b",
        "mapping": {
            "root": {"message": null, "parent": null, "children": ["a"]},
            "a": {
                "message": {"author": {"role": "user"}, "content": {"content_type": "text", "parts": ["Question A about python"]}},
                "parent": "root",
                "children": ["b", "c"],
            },
            "b": {
                "message": {"author": {"role": "assistant"}, "content": {"content_type": "text", "parts": ["Answer B with pandas"]}},
                "parent": "a",
                "children": [],
            },
            "c": {
                "message": {"author": {"role": "assistant"}, "content": {"content_type": "text", "parts": ["DISCARDED BRANCH C"]}},
                "parent": "a",
                "children": [],
            },
        },
    }])
    .to_string()
}

/// Claude web export with one assistant message carrying a thinking block and a text block
pub fn claude_web_thinking_export() -> String {
    json!([{
        "uuid": "web-thinking",
        "name": "Thinking chat",
        "created_at": "2025-03-01T12:00:00Z",
        "chat_messages": [
            {"sender": "human", "text": "Explain SQL joins"},
            {"sender": "assistant", "text": "", "content": [
                {"type": "thinking", "thinking": "Consider inner joins first"},
                {"type": "text", "text": "An inner join keeps matching rows."},
            ]},
        ],
    }])
    .to_string()
}

/// Claude web export with `count` simple conversations
pub fn claude_web_export(count: usize) -> String {
    let conversations: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "uuid": format!("web-{}", i),
                "name": format!("Conversation {}", i),
                "created_at": "2025-03-01T12:00:00Z",
                "chat_messages": [
                    {"sender": "human", "text": format!("question {} about rust and git", i)},
                    {"sender": "assistant", "text": "answer"},
                ],
            })
        })
        .collect();
    Value::Array(conversations).to_string()
}

/// Write a minimal document with the given tags straight into a collection
pub fn write_document(dir: &Path, name: &str, title: &str, tags: &[&str]) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create collection dir");
    let path = dir.join(format!("{}.md", name));
    let text = format!(
        "---\nsource: codex\ndate: 2025-01-01\ntags: [{}]\nid: {}\n---\n# {}\n\n## User\n\nprose for {}\n\n## Related\n",
        tags.join(", "),
        name,
        title,
        name
    );
    fs::write(&path, text).expect("Failed to write document");
    path
}

/// Markdown files in a collection, sorted
pub fn collection_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read collection")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .collect();
    files.sort();
    files
}
