//! Heuristic source-language detection from a file name and a content sample.
//!
//! Detection runs in this order, stopping at the first hit:
//!
//! 1. NUL byte in the sample: treated as binary, no language.
//! 2. Shebang interpreter (`#!/usr/bin/env python3` -> Python).
//! 3. Well-known file names (`Makefile`, `Dockerfile`, ...).
//! 4. Unambiguous extensions.
//! 5. Ambiguous extensions (`.h`, `.pl`, `.m`, ...) resolved by content
//!    regexes. When no regex matches, the first candidate is returned
//!    without confidence.
//!
//! Only confident guesses are meant to be recorded; see
//! [`LanguageGuess::confident_language`].

use std::path::Path;

use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;

/// Upper bound on how many leading bytes the classifier looks at.
pub const SAMPLE_LIMIT: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageGuess {
    pub language: Option<&'static str>,
    pub confident: bool,
}

impl LanguageGuess {
    fn confident(language: &'static str) -> Self {
        Self {
            language: Some(language),
            confident: true,
        }
    }

    fn tentative(language: &'static str) -> Self {
        Self {
            language: Some(language),
            confident: false,
        }
    }

    fn unknown() -> Self {
        Self {
            language: None,
            confident: false,
        }
    }

    /// The detected language, but only when the guess is safe to report.
    pub fn confident_language(&self) -> Option<&'static str> {
        if self.confident { self.language } else { None }
    }
}

static INTERPRETERS: phf::Map<&'static str, &'static str> = phf_map! {
    "sh" => "Shell",
    "bash" => "Shell",
    "zsh" => "Shell",
    "dash" => "Shell",
    "ksh" => "Shell",
    "ash" => "Shell",
    "mksh" => "Shell",
    "fish" => "fish",
    "python" => "Python",
    "pypy" => "Python",
    "ruby" => "Ruby",
    "jruby" => "Ruby",
    "perl" => "Perl",
    "node" => "JavaScript",
    "nodejs" => "JavaScript",
    "deno" => "TypeScript",
    "ts-node" => "TypeScript",
    "php" => "PHP",
    "lua" => "Lua",
    "luajit" => "Lua",
    "Rscript" => "R",
    "tclsh" => "Tcl",
    "wish" => "Tcl",
    "awk" => "Awk",
    "gawk" => "Awk",
    "mawk" => "Awk",
    "pwsh" => "PowerShell",
    "groovy" => "Groovy",
    "escript" => "Erlang",
    "elixir" => "Elixir",
    "runhaskell" => "Haskell",
    "make" => "Makefile",
    "osascript" => "AppleScript",
    "sbcl" => "Common Lisp",
    "guile" => "Scheme",
};

static FILENAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "Makefile" => "Makefile",
    "makefile" => "Makefile",
    "GNUmakefile" => "Makefile",
    "Dockerfile" => "Dockerfile",
    "Containerfile" => "Dockerfile",
    "Rakefile" => "Ruby",
    "Gemfile" => "Ruby",
    "Vagrantfile" => "Ruby",
    "CMakeLists.txt" => "CMake",
    "Jenkinsfile" => "Groovy",
    "BUILD.bazel" => "Starlark",
    "WORKSPACE" => "Starlark",
};

static EXTENSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "sh" => "Shell",
    "bash" => "Shell",
    "zsh" => "Shell",
    "ksh" => "Shell",
    "fish" => "fish",
    "py" => "Python",
    "pyw" => "Python",
    "rb" => "Ruby",
    "js" => "JavaScript",
    "mjs" => "JavaScript",
    "cjs" => "JavaScript",
    "jsx" => "JavaScript",
    "tsx" => "TSX",
    "go" => "Go",
    "c" => "C",
    "cc" => "C++",
    "cpp" => "C++",
    "cxx" => "C++",
    "hpp" => "C++",
    "hh" => "C++",
    "hxx" => "C++",
    "cs" => "C#",
    "java" => "Java",
    "kt" => "Kotlin",
    "kts" => "Kotlin",
    "scala" => "Scala",
    "swift" => "Swift",
    "php" => "PHP",
    "lua" => "Lua",
    "r" => "R",
    "ps1" => "PowerShell",
    "psm1" => "PowerShell",
    "json" => "JSON",
    "yaml" => "YAML",
    "yml" => "YAML",
    "toml" => "TOML",
    "md" => "Markdown",
    "markdown" => "Markdown",
    "html" => "HTML",
    "htm" => "HTML",
    "css" => "CSS",
    "scss" => "SCSS",
    "sql" => "SQL",
    "tf" => "HCL",
    "hcl" => "HCL",
    "mk" => "Makefile",
    "awk" => "Awk",
    "tcl" => "Tcl",
    "ex" => "Elixir",
    "exs" => "Elixir",
    "erl" => "Erlang",
    "hs" => "Haskell",
    "ml" => "OCaml",
    "zig" => "Zig",
    "dart" => "Dart",
    "vue" => "Vue",
    "xml" => "XML",
    "proto" => "Protocol Buffer",
    "ini" => "INI",
    "bat" => "Batchfile",
    "cmd" => "Batchfile",
    "groovy" => "Groovy",
    "clj" => "Clojure",
    "nix" => "Nix",
};

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in language heuristic must compile")
}

static OBJC: Lazy<Regex> =
    Lazy::new(|| regex(r"(?m)^\s*(@interface|@implementation|@protocol|@end|#import\b)"));
static CPP: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?m)^\s*(template\s*<|class\s+\w+\s*[:{]|namespace\s+\w+|#include\s*<(iostream|string|vector|memory|map)>)",
    )
});
static MATLAB: Lazy<Regex> = Lazy::new(|| regex(r"(?m)^\s*(function\s.*=|%)"));
static PROLOG: Lazy<Regex> = Lazy::new(|| regex(r"(?m)^[^#\n]*:-"));
static PERL: Lazy<Regex> =
    Lazy::new(|| regex(r"\buse\s+(strict|warnings)\b|\bmy\s+[\$@%]|\bsub\s+\w+\s*\{"));
static RUST: Lazy<Regex> =
    Lazy::new(|| regex(r"(?m)^\s*(pub\s+)?(fn|use|mod|impl|struct|enum|trait)\b"));
static RENDERSCRIPT: Lazy<Regex> = Lazy::new(|| regex(r"#pragma\s+(rs|version)\b"));
static QT_TRANSLATION: Lazy<Regex> = Lazy::new(|| regex(r"<\?xml|<TS\b"));
static COQ: Lazy<Regex> =
    Lazy::new(|| regex(r"(?m)^\s*(Theorem|Lemma|Proof|Require\s+Import)\b"));
static VERILOG: Lazy<Regex> = Lazy::new(|| regex(r"(?m)^\s*module\s+\w+"));

/// Guess the language of `filename` from its extension and leading bytes.
///
/// Only the first [`SAMPLE_LIMIT`] bytes of `sample` are considered.
pub fn classify(filename: &str, sample: &[u8]) -> LanguageGuess {
    let sample = &sample[..sample.len().min(SAMPLE_LIMIT)];

    if sample.contains(&0) {
        return LanguageGuess::unknown();
    }

    if let Some(language) = by_shebang(sample) {
        return LanguageGuess::confident(language);
    }

    let path = Path::new(filename);

    if let Some(language) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| FILENAMES.get(n).copied())
    {
        return LanguageGuess::confident(language);
    }

    let Some(ext) = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return LanguageGuess::unknown();
    };

    if let Some(&language) = EXTENSIONS.get(ext.as_str()) {
        return LanguageGuess::confident(language);
    }

    by_content(&ext, &String::from_utf8_lossy(sample)).unwrap_or_else(LanguageGuess::unknown)
}

fn by_shebang(sample: &[u8]) -> Option<&'static str> {
    let rest = sample.strip_prefix(b"#!")?;
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let line = std::str::from_utf8(&rest[..line_end]).ok()?;

    let mut tokens = line.split_whitespace();
    let mut program = basename(tokens.next()?);

    // `#!/usr/bin/env [-S] [VAR=value] interpreter`
    if program == "env" {
        program = tokens
            .find(|t| !t.starts_with('-') && !t.contains('='))
            .map(basename)?;
    }

    let program = program.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    INTERPRETERS.get(program).copied()
}

fn basename(token: &str) -> &str {
    token.rsplit('/').next().unwrap_or(token)
}

fn by_content(ext: &str, text: &str) -> Option<LanguageGuess> {
    let guess = match ext {
        "h" => {
            if OBJC.is_match(text) {
                LanguageGuess::confident("Objective-C")
            } else if CPP.is_match(text) {
                LanguageGuess::confident("C++")
            } else {
                LanguageGuess::tentative("C")
            }
        }
        "m" => {
            if OBJC.is_match(text) {
                LanguageGuess::confident("Objective-C")
            } else if MATLAB.is_match(text) {
                LanguageGuess::confident("MATLAB")
            } else {
                LanguageGuess::tentative("Objective-C")
            }
        }
        "pl" => {
            if PROLOG.is_match(text) {
                LanguageGuess::confident("Prolog")
            } else if PERL.is_match(text) {
                LanguageGuess::confident("Perl")
            } else {
                LanguageGuess::tentative("Perl")
            }
        }
        "rs" => {
            if RUST.is_match(text) {
                LanguageGuess::confident("Rust")
            } else if RENDERSCRIPT.is_match(text) {
                LanguageGuess::confident("RenderScript")
            } else {
                LanguageGuess::tentative("Rust")
            }
        }
        "ts" => {
            if QT_TRANSLATION.is_match(text) {
                LanguageGuess::confident("XML")
            } else {
                LanguageGuess::confident("TypeScript")
            }
        }
        "v" => {
            if COQ.is_match(text) {
                LanguageGuess::confident("Coq")
            } else if VERILOG.is_match(text) {
                LanguageGuess::confident("Verilog")
            } else {
                LanguageGuess::tentative("Verilog")
            }
        }
        _ => return None,
    };

    Some(guess)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shebang_interpreter_wins_over_missing_extension() {
        let g = classify("bin/deploy", b"#!/bin/bash\nset -e\n");
        assert_eq!(g.confident_language(), Some("Shell"));
    }

    #[test]
    fn env_shebang_with_versioned_interpreter() {
        let g = classify("tool", b"#!/usr/bin/env python3.11\nprint('hi')\n");
        assert_eq!(g.confident_language(), Some("Python"));

        let g = classify("tool", b"#!/usr/bin/env -S node --harmony\n");
        assert_eq!(g.confident_language(), Some("JavaScript"));
    }

    #[test]
    fn unknown_interpreter_falls_through_to_extension() {
        let g = classify("script.rb", b"#!/opt/custom/interp\nputs 1\n");
        assert_eq!(g.confident_language(), Some("Ruby"));
    }

    #[test]
    fn binary_sample_has_no_language() {
        let g = classify("program.py", b"\x7fELF\x02\x01\x01\x00\x00");
        assert_eq!(g, LanguageGuess::unknown());
    }

    #[test]
    fn well_known_file_names() {
        assert_eq!(classify("src/Makefile", b"all:\n").confident_language(), Some("Makefile"));
        assert_eq!(classify("Dockerfile", b"FROM x\n").confident_language(), Some("Dockerfile"));
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(classify("MAIN.GO", b"package main\n").confident_language(), Some("Go"));
    }

    #[test]
    fn header_heuristics() {
        let cpp = classify("a.h", b"namespace foo {\nclass Bar {};\n}\n");
        assert_eq!(cpp.confident_language(), Some("C++"));

        let objc = classify("a.h", b"#import <Foundation/Foundation.h>\n@interface X\n@end\n");
        assert_eq!(objc.confident_language(), Some("Objective-C"));

        let plain = classify("a.h", b"int add(int a, int b);\n");
        assert_eq!(plain.language, Some("C"));
        assert!(!plain.confident);
        assert_eq!(plain.confident_language(), None);
    }

    #[test]
    fn perl_versus_prolog() {
        let perl = classify("x.pl", b"use strict;\nmy $x = 1;\n");
        assert_eq!(perl.confident_language(), Some("Perl"));

        let prolog = classify("x.pl", b"parent(tom, bob).\nancestor(X, Y) :- parent(X, Y).\n");
        assert_eq!(prolog.confident_language(), Some("Prolog"));
    }

    #[test]
    fn rust_extension_needs_rust_looking_content() {
        assert_eq!(
            classify("lib.rs", b"pub fn main() {}\n").confident_language(),
            Some("Rust")
        );
        assert_eq!(classify("lib.rs", b"\n").confident_language(), None);
    }

    #[test]
    fn unknown_extension_is_not_confident() {
        let g = classify("notes.zzz", b"hello");
        assert_eq!(g, LanguageGuess::unknown());
        assert_eq!(classify("README", b"hello").confident_language(), None);
    }

    #[test]
    fn content_beyond_sample_limit_is_ignored() {
        let mut sample = vec![b' '; SAMPLE_LIMIT];
        sample.extend_from_slice(b"\nuse strict;\n");
        let g = classify("x.pl", &sample);
        assert!(!g.confident);
    }
}
