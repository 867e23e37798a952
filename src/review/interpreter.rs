// CodeLens Response Interpreter
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Turns raw model text into (display text, replacement buffer, metric update).
// Parsing never fails: anything that does not match is simply "no update".

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Shown when a response carried only code.
pub const CODE_ONLY_ACK: &str = "✅ I have optimized the code to the best possible complexity.";
/// Console text when an execution produced nothing.
pub const NO_OUTPUT: &str = "Process finished with exit code 0 (No output)";

const COMPLEXITY: &str = r"O\([^)]+\)";

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:[^\s`]*\n)?(.*?)```").expect("fence pattern"));

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[^\s`]*\n?").expect("fence opener pattern"));

// Anything shaped like one of our tags, well-formed or not.
static TAG_RESIDUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*(?:SCORE|TIME|SPACE|OLD_TIME|NEW_TIME|NEW_SPACE)\s*:[^\]\n]*\]")
        .expect("tag residue pattern")
});

static TAG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    MetricTag::ALL
        .iter()
        .map(|tag| {
            let value = match tag {
                // ASCII only; other Unicode digits are not a score
                MetricTag::Score => r"[0-9]+",
                _ => COMPLEXITY,
            };
            Regex::new(&format!(r"(?i)\[{}:\s*({})\]", tag.label(), value))
                .expect("metric tag pattern")
        })
        .collect()
});

/// The six bracketed metric tags of the response grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricTag {
    Score,
    Time,
    Space,
    OldTime,
    NewTime,
    NewSpace,
}

impl MetricTag {
    pub const ALL: [MetricTag; 6] = [
        MetricTag::Score,
        MetricTag::Time,
        MetricTag::Space,
        MetricTag::OldTime,
        MetricTag::NewTime,
        MetricTag::NewSpace,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricTag::Score => "SCORE",
            MetricTag::Time => "TIME",
            MetricTag::Space => "SPACE",
            MetricTag::OldTime => "OLD_TIME",
            MetricTag::NewTime => "NEW_TIME",
            MetricTag::NewSpace => "NEW_SPACE",
        }
    }

    fn pattern(self) -> &'static Regex {
        &TAG_PATTERNS[self as usize]
    }

    /// Captured value of the first well-formed occurrence.
    pub fn capture(self, text: &str) -> Option<&str> {
        self.pattern()
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Partial metric update. `None` fields leave the snapshot untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsUpdate {
    pub score: Option<u8>,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub previous_time_complexity: Option<String>,
}

impl MetricsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == MetricsUpdate::default()
    }

    pub fn from_text(text: &str) -> Self {
        let owned = |tag: MetricTag| tag.capture(text).map(str::to_string);

        let score = MetricTag::Score.capture(text).map(|digits| {
            // Overlong digit runs saturate, then clamp to the 0-100 scale.
            digits.parse::<u32>().unwrap_or(u32::MAX).min(100) as u8
        });

        Self {
            score,
            // Optimize-mode values supersede the analyze-mode ones.
            time_complexity: owned(MetricTag::NewTime).or_else(|| owned(MetricTag::Time)),
            space_complexity: owned(MetricTag::NewSpace).or_else(|| owned(MetricTag::Space)),
            previous_time_complexity: owned(MetricTag::OldTime),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub display_text: String,
    pub buffer: Option<String>,
    pub metrics: MetricsUpdate,
}

pub fn interpret(raw: &str) -> Interpretation {
    // 1. Replacement code block
    let mut buffer = None;
    let mut display = raw.to_string();
    if let Some(code) = FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|code| !code.is_empty())
    {
        buffer = Some(code.to_string());
        display = FENCE.replace(raw, "").into_owned();
        if display.trim().is_empty() {
            display = CODE_ONLY_ACK.to_string();
        }
    }

    // 2. Metric tags
    let metrics = MetricsUpdate::from_text(&display);

    // 3. Strip tags, including malformed ones that failed to capture
    let mut stripped = display.clone();
    for tag in MetricTag::ALL {
        stripped = tag.pattern().replace_all(&stripped, "").into_owned();
    }
    if TAG_RESIDUE.is_match(&stripped) {
        debug!("[INTERPRETER] Dropping malformed metric tags from display text");
        stripped = TAG_RESIDUE.replace_all(&stripped, "").into_owned();
    }

    Interpretation {
        display_text: stripped.trim().to_string(),
        buffer,
        metrics,
    }
}

/// Console text for an execute-mode response: fences removed, never empty.
pub fn interpret_execution(raw: &str) -> String {
    let without_openers = FENCE_OPEN.replace_all(raw, "");
    let output = without_openers.replace("```", "");
    let output = output.trim();
    if output.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        output.to_string()
    }
}
