// CodeLens Language Sniffer - Keyword Heuristics
// Copyright (c) 2026 Xing_The_Creator | CodeLens

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static WORD_DEF: LazyLock<Regex> = LazyLock::new(|| word("def"));
static WORD_END: LazyLock<Regex> = LazyLock::new(|| word("end"));
static WORD_MOV: LazyLock<Regex> = LazyLock::new(|| word("mov"));
static WORD_PUSH: LazyLock<Regex> = LazyLock::new(|| word("push"));

fn word(w: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", w)).expect("static word pattern")
}

/// Guessed source language of the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CSharp,
    Cpp,
    C,
    Assembly,
    Ruby,
    Java,
    React,
    TypeScript,
    Python,
    JavaScript,
    Html,
    PlainText,
}

/// Wire form returned by `/api/detect`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LanguageInfo {
    pub name: &'static str,
    pub syntax: &'static str,
    pub file: &'static str,
}

impl Language {
    /// Classify a code buffer. First matching rule wins, so the order of the
    /// checks below is significant.
    pub fn detect(code: &str) -> Self {
        let code = code.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| code.contains(n));
        let has_def = WORD_DEF.is_match(&code);

        if has(&["using system;", "console.writeline", "namespace "]) {
            return Language::CSharp;
        }
        if has(&[
            "std::",
            "#include <iostream>",
            "cout <<",
            "cin >>",
            "using namespace std;",
        ]) {
            return Language::Cpp;
        }
        if has(&["#include <stdio.h>", "printf(", "malloc("]) {
            return Language::C;
        }
        if has(&["section .data", "global _start", "syscall"])
            || (WORD_MOV.is_match(&code) && WORD_PUSH.is_match(&code))
        {
            return Language::Assembly;
        }
        // `def` without a colon cannot be Python
        if (has_def && !code.contains(':'))
            || code.contains("puts ")
            || (has_def && WORD_END.is_match(&code))
        {
            return Language::Ruby;
        }
        if has(&["public static void main", "system.out.print"]) {
            return Language::Java;
        }
        if has(&["import react", "use client", "usestate"]) {
            return Language::React;
        }
        if has(&["interface ", "type "]) || (code.contains("const ") && code.contains(':')) {
            return Language::TypeScript;
        }
        if (has_def && code.contains(':')) || has(&["print(", "import sys", "\"\"\""]) {
            return Language::Python;
        }
        if has(&["const ", "let ", "console.log", "=>", "function("]) {
            return Language::JavaScript;
        }
        if has(&["<html>", "<div>", "<!doctype html>"]) {
            return Language::Html;
        }

        Language::PlainText
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::CSharp => "C#",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Assembly => "Assembly",
            Language::Ruby => "Ruby",
            Language::Java => "Java",
            Language::React => "React",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Html => "HTML",
            Language::PlainText => "Plain Text",
        }
    }

    /// Tag understood by highlight.js-style highlighters.
    pub fn highlight_tag(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Assembly => "x86asm",
            Language::Ruby => "ruby",
            Language::Java => "java",
            Language::React => "tsx",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Html => "html",
            Language::PlainText => "text",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Language::CSharp => "Program.cs",
            Language::Cpp => "main.cpp",
            Language::C => "main.c",
            Language::Assembly => "program.asm",
            Language::Ruby => "script.rb",
            Language::Java => "Main.java",
            Language::React => "component.tsx",
            Language::TypeScript => "script.ts",
            Language::Python => "script.py",
            Language::JavaScript => "script.js",
            Language::Html => "index.html",
            Language::PlainText => "snippet.txt",
        }
    }

    pub fn info(self) -> LanguageInfo {
        LanguageInfo {
            name: self.display_name(),
            syntax: self.highlight_tag(),
            file: self.file_name(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
