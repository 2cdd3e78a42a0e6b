//! Text document language identifiers
//!
//! The identifier set is open: editors report filetypes this table has never
//! heard of, and those must pass through untouched.

use super::macros::string_enum;

string_enum! {
    /// Identifier of a text document's language, as sent in `languageId`.
    pub struct LanguageIdentifier {
        ABAP = "abap",
        WINDOWS_BAT = "bat",
        BIBTEX = "bibtex",
        CLOJURE = "clojure",
        COFFEESCRIPT = "coffeescript",
        C = "c",
        CPP = "cpp",
        CSHARP = "csharp",
        CSS = "css",
        DIFF = "diff",
        DART = "dart",
        DOCKERFILE = "dockerfile",
        ELIXIR = "elixir",
        ERLANG = "erlang",
        FSHARP = "fsharp",
        GIT_COMMIT = "git-commit",
        GIT_REBASE = "git-rebase",
        GO = "go",
        GROOVY = "groovy",
        HANDLEBARS = "handlebars",
        HASKELL = "haskell",
        HTML = "html",
        INI = "ini",
        JAVA = "java",
        JAVASCRIPT = "javascript",
        JAVASCRIPT_REACT = "javascriptreact",
        JSON = "json",
        LATEX = "latex",
        LESS = "less",
        LUA = "lua",
        MAKEFILE = "makefile",
        MARKDOWN = "markdown",
        OBJECTIVE_C = "objective-c",
        OBJECTIVE_CPP = "objective-cpp",
        PERL = "perl",
        PERL6 = "perl6",
        PHP = "php",
        POWERSHELL = "powershell",
        PUG = "jade",
        PYTHON = "python",
        R = "r",
        RAZOR = "razor",
        RUBY = "ruby",
        RUST = "rust",
        SCSS = "scss",
        SASS = "sass",
        SCALA = "scala",
        SHADERLAB = "shaderlab",
        SHELL_SCRIPT = "shellscript",
        SQL = "sql",
        SWIFT = "swift",
        TYPESCRIPT = "typescript",
        TYPESCRIPT_REACT = "typescriptreact",
        TEX = "tex",
        VISUAL_BASIC = "vb",
        XML = "xml",
        XSL = "xsl",
        YAML = "yaml",
    }
}

impl LanguageIdentifier {
    /// Resolve an editor filetype name to an identifier.
    ///
    /// Covers the common places where editor filetypes and protocol
    /// identifiers disagree (`sh` vs `shellscript`, `cs` vs `csharp`, ...).
    /// Anything else goes through [`LanguageIdentifier::lookup`].
    pub fn from_filetype(filetype: &str) -> Self {
        match filetype {
            "sh" | "bash" | "zsh" | "ksh" => Self::SHELL_SCRIPT,
            "cs" => Self::CSHARP,
            "fs" => Self::FSHARP,
            "gitcommit" => Self::GIT_COMMIT,
            "gitrebase" => Self::GIT_REBASE,
            "golang" => Self::GO,
            "hbs" => Self::HANDLEBARS,
            "javascript.jsx" | "jsx" => Self::JAVASCRIPT_REACT,
            "typescript.tsx" | "tsx" => Self::TYPESCRIPT_REACT,
            "make" => Self::MAKEFILE,
            "objc" => Self::OBJECTIVE_C,
            "objcpp" => Self::OBJECTIVE_CPP,
            "ps1" => Self::POWERSHELL,
            "pug" => Self::PUG,
            "raku" => Self::PERL6,
            "vbnet" => Self::VISUAL_BASIC,
            "yml" => Self::YAML,
            "dosbatch" => Self::WINDOWS_BAT,
            other => Self::lookup(other),
        }
    }

    /// Resolve a file extension (without the dot) to an identifier.
    ///
    /// Unknown extensions are wrapped verbatim, lowercased.
    pub fn from_extension(ext: &str) -> Self {
        let lower = ext.to_ascii_lowercase();
        match lower.as_str() {
            "bat" | "cmd" => Self::WINDOWS_BAT,
            "bib" => Self::BIBTEX,
            "clj" | "cljs" | "cljc" | "edn" => Self::CLOJURE,
            "coffee" => Self::COFFEESCRIPT,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Self::CPP,
            "cs" => Self::CSHARP,
            "css" => Self::CSS,
            "diff" | "patch" => Self::DIFF,
            "dart" => Self::DART,
            "ex" | "exs" => Self::ELIXIR,
            "erl" | "hrl" => Self::ERLANG,
            "fs" | "fsx" | "fsi" => Self::FSHARP,
            "go" => Self::GO,
            "groovy" | "gradle" => Self::GROOVY,
            "hbs" | "handlebars" => Self::HANDLEBARS,
            "hs" | "lhs" => Self::HASKELL,
            "html" | "htm" => Self::HTML,
            "ini" => Self::INI,
            "java" => Self::JAVA,
            "js" | "mjs" | "cjs" => Self::JAVASCRIPT,
            "jsx" => Self::JAVASCRIPT_REACT,
            "json" => Self::JSON,
            "less" => Self::LESS,
            "lua" => Self::LUA,
            "mk" => Self::MAKEFILE,
            "md" | "markdown" => Self::MARKDOWN,
            "m" => Self::OBJECTIVE_C,
            "mm" => Self::OBJECTIVE_CPP,
            "pl" | "pm" => Self::PERL,
            "p6" | "pm6" | "raku" => Self::PERL6,
            "php" => Self::PHP,
            "ps1" | "psm1" | "psd1" => Self::POWERSHELL,
            "jade" | "pug" => Self::PUG,
            "py" | "pyi" => Self::PYTHON,
            "r" => Self::R,
            "cshtml" | "razor" => Self::RAZOR,
            "rb" | "rake" | "gemspec" => Self::RUBY,
            "rs" => Self::RUST,
            "scss" => Self::SCSS,
            "sass" => Self::SASS,
            "scala" | "sc" => Self::SCALA,
            "shader" => Self::SHADERLAB,
            "sh" | "bash" | "zsh" => Self::SHELL_SCRIPT,
            "sql" => Self::SQL,
            "swift" => Self::SWIFT,
            "ts" | "mts" | "cts" => Self::TYPESCRIPT,
            "tsx" => Self::TYPESCRIPT_REACT,
            "tex" => Self::TEX,
            "vb" => Self::VISUAL_BASIC,
            "xml" => Self::XML,
            "xsl" | "xslt" => Self::XSL,
            "yaml" | "yml" => Self::YAML,
            _ => {
                tracing::trace!("No language identifier for extension '{}'", ext);
                Self::from(lower)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let id = LanguageIdentifier::lookup("rust");
        assert_eq!(id, LanguageIdentifier::RUST);
        assert!(id.is_known());
    }

    #[test]
    fn test_lookup_unknown_passthrough() {
        let id = LanguageIdentifier::lookup("zig");
        assert!(!id.is_known());
        assert_eq!(id.as_str(), "zig");
        assert_eq!(id.to_string(), "zig");
    }

    #[test]
    fn test_from_filetype_aliases() {
        assert_eq!(
            LanguageIdentifier::from_filetype("sh"),
            LanguageIdentifier::SHELL_SCRIPT
        );
        assert_eq!(LanguageIdentifier::from_filetype("cs"), LanguageIdentifier::CSHARP);
        assert_eq!(LanguageIdentifier::from_filetype("go"), LanguageIdentifier::GO);
        assert_eq!(LanguageIdentifier::from_filetype("nim").as_str(), "nim");
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(LanguageIdentifier::from_extension("RS"), LanguageIdentifier::RUST);
        assert_eq!(
            LanguageIdentifier::from_extension("tsx"),
            LanguageIdentifier::TYPESCRIPT_REACT
        );
        assert_eq!(LanguageIdentifier::from_extension("hpp"), LanguageIdentifier::CPP);
        assert_eq!(LanguageIdentifier::from_extension("Zig").as_str(), "zig");
    }

    #[test]
    fn test_serde_passthrough() {
        let id: LanguageIdentifier = serde_json::from_str(r#""vimscript""#).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""vimscript""#);

        let known: LanguageIdentifier = serde_json::from_str(r#""typescriptreact""#).unwrap();
        assert_eq!(known, LanguageIdentifier::TYPESCRIPT_REACT);
    }

    #[test]
    fn test_owned_equals_constant() {
        assert_eq!(
            LanguageIdentifier::from("go".to_string()),
            LanguageIdentifier::GO
        );
    }
}
