// CodeLens Prompt Composer
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Builds the request the front-end sends to `/api/chat` and expands it into
// the turn list the completion provider receives. Nothing here performs I/O.

use crate::review::language::Language;
use serde::{Deserialize, Serialize};

/// Mode-invariant instructions sent as the first turn of every completion.
pub const SYSTEM_PROMPT: &str = "\
You are CodeLens, a fast and precise code auditor.
Your readers are reviewers, managers and senior developers: keep answers short, direct and easy to scan.

RULES:
1. Identity: you are CodeLens.
2. Analysis: when asked to analyze code, give a quick high-level summary in 3-4 short bullet points. \
Mark each point with an emoji (✅ good, ⚠️ warning, ❌ bad, ⚡ performance). Explain the core issue plainly. Do not rewrite the code.
3. Editing and optimizing: when asked to modify or optimize code, return the COMPLETE updated code in a single block fenced with triple backticks. Never elide parts of it.
4. Metrics: when the request asks for a score, time complexity or space complexity, append them at the VERY END of the response, outside any code block, in exactly this form:
   [SCORE: 85] [TIME: O(N)] [SPACE: O(1)]
   When optimizing, use: [SCORE: 85] [OLD_TIME: O(N^2)] [NEW_TIME: O(N)] [NEW_SPACE: O(1)]
5. Tone: confident, concise and professional.";

const ANALYZE_SUFFIX: &str = " Evaluate code quality (0-100), Time Complexity, and Space Complexity. \
Return them strictly at the very end in this exact format: [SCORE: number] [TIME: O(N)] [SPACE: O(1)].";

const OPTIMIZE_SUFFIX: &str = " Optimize this code to the absolute best possible Time and Space Complexity. \
Return the new code. At the very end, provide the new score, the old time complexity, and the new time complexity \
in this exact format: [SCORE: number] [OLD_TIME: O(N^2)] [NEW_TIME: O(N)] [NEW_SPACE: O(1)].";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    #[serde(alias = "ai")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// How the user is interacting with the model on this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Chat,
    Analyze,
    Optimize,
    Execute,
}

impl Mode {
    /// Output-shape instruction appended to the user text.
    pub fn instruction(self) -> &'static str {
        match self {
            Mode::Analyze => ANALYZE_SUFFIX,
            Mode::Optimize => OPTIMIZE_SUFFIX,
            Mode::Chat | Mode::Execute => "",
        }
    }

    /// Fixed request text for the one-click actions. Chat has none.
    pub fn canned_request(self, language: Language, code: &str) -> Option<String> {
        match self {
            Mode::Chat => None,
            Mode::Analyze => Some(format!(
                "Analyze this {} code for logic, security, and performance issues. DO NOT rewrite the code.",
                language
            )),
            Mode::Optimize => Some(format!(
                "Optimize this {} code for better performance and readability. Return the full updated code block.",
                language
            )),
            Mode::Execute => Some(format!(
                "Act strictly as a compiler/interpreter for {}. Execute the following code and return ONLY the raw \
console output it would produce. If there are compilation or runtime errors, output the exact error message. \
DO NOT wrap the output in markdown code blocks. DO NOT explain anything. DO NOT converse. \
ONLY output the raw terminal result:\n\n{}",
                language, code
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::Analyze => "analyze",
            Mode::Optimize => "optimize",
            Mode::Execute => "execute",
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Compose the request for `mode`. Execute runs without history.
    pub fn compose(mode: Mode, buffer: &str, user_text: &str, history: &[ChatTurn]) -> Self {
        let history = match mode {
            Mode::Execute => Vec::new(),
            _ => history.to_vec(),
        };

        Self {
            message: format!("{}{}", user_text, mode.instruction()),
            code: buffer.to_string(),
            history,
        }
    }

    /// Full turn list for the provider: system, history, then the code and
    /// question folded into one final user turn.
    pub fn to_turns(&self) -> Vec<ChatTurn> {
        let mut turns = Vec::with_capacity(self.history.len() + 2);
        turns.push(ChatTurn::new(Role::System, SYSTEM_PROMPT));
        turns.extend(self.history.iter().cloned());
        turns.push(ChatTurn::new(
            Role::User,
            format!(
                "CURRENT CODE CONTEXT:\n{}\n\nUSER QUESTION:\n{}",
                self.code, self.message
            ),
        ));
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_appends_metric_grammar() {
        let req = ChatRequest::compose(Mode::Analyze, "x = 1", "Analyze this.", &[]);
        assert!(req.message.starts_with("Analyze this."));
        assert!(req.message.ends_with("[SCORE: number] [TIME: O(N)] [SPACE: O(1)]."));
        assert_eq!(req.code, "x = 1");
    }

    #[test]
    fn test_optimize_appends_old_new_grammar() {
        let req = ChatRequest::compose(Mode::Optimize, "", "Go.", &[]);
        assert!(req.message.contains("[OLD_TIME: O(N^2)] [NEW_TIME: O(N)] [NEW_SPACE: O(1)]"));
    }

    #[test]
    fn test_chat_passes_text_through() {
        let history = vec![ChatTurn::new(Role::Assistant, "hello")];
        let req = ChatRequest::compose(Mode::Chat, "code", "why?", &history);
        assert_eq!(req.message, "why?");
        assert_eq!(req.history, history);
    }

    #[test]
    fn test_execute_drops_history() {
        let history = vec![ChatTurn::new(Role::User, "earlier")];
        let req = ChatRequest::compose(Mode::Execute, "print(1)", "run it", &history);
        assert!(req.history.is_empty());
        assert_eq!(req.message, "run it");
    }

    #[test]
    fn test_turn_layout() {
        let req = ChatRequest {
            message: "What does it do?".into(),
            code: "fn main() {}".into(),
            history: vec![
                ChatTurn::new(Role::Assistant, "hi"),
                ChatTurn::new(Role::User, "What does it do?"),
            ],
        };
        let turns = req.to_turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].content, SYSTEM_PROMPT);
        assert_eq!(turns[1].content, "hi");
        assert_eq!(turns[3].role, Role::User);
        assert_eq!(
            turns[3].content,
            "CURRENT CODE CONTEXT:\nfn main() {}\n\nUSER QUESTION:\nWhat does it do?"
        );
    }

    #[test]
    fn test_system_prompt_is_mode_invariant() {
        let a = ChatRequest::compose(Mode::Analyze, "c", "a", &[]).to_turns();
        let o = ChatRequest::compose(Mode::Optimize, "c", "o", &[]).to_turns();
        assert_eq!(a[0], o[0]);
    }

    #[test]
    fn test_canned_requests_name_language() {
        let text = Mode::Analyze.canned_request(Language::Python, "").unwrap();
        assert!(text.contains("this Python code"));
        let run = Mode::Execute.canned_request(Language::Cpp, "int main(){}").unwrap();
        assert!(run.contains("interpreter for C++"));
        assert!(run.ends_with("int main(){}"));
        assert!(Mode::Chat.canned_request(Language::Python, "").is_none());
    }

    #[test]
    fn test_role_wire_format() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"ai","content":"x"}"#).unwrap();
        assert_eq!(turn.role, Role::Assistant);
        let json = serde_json::to_string(&ChatTurn::new(Role::Assistant, "x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);
    }

    #[test]
    fn test_request_defaults_missing_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(req.code.is_empty());
        assert!(req.history.is_empty());
    }
}
