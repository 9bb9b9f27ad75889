/// Maps a file extension to the language hint placed after the opening fence.
///
/// Unknown extensions made only of ASCII alphanumerics, `+` and `-` are used
/// as-is; anything else gets no hint.
pub fn fence_lang(extension: &str) -> String {
    let ext = extension.to_ascii_lowercase();
    if let Some(tag) = known_tag(&ext) {
        return tag.to_string();
    }

    let plain = ext
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
    if plain {
        ext
    } else {
        String::new()
    }
}

fn known_tag(ext: &str) -> Option<&'static str> {
    let tag = match ext {
        "ts" | "mts" | "cts" => "ts",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "py" | "pyi" | "pyw" => "python",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "scala" | "sc" => "scala",
        "groovy" | "gradle" => "groovy",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "c++" | "hh" | "hpp" | "hxx" | "h++" => "cpp",
        "cs" => "csharp",
        "fs" | "fsx" => "fsharp",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "m" | "mm" => "objectivec",
        "rb" => "ruby",
        "php" => "php",
        "pl" | "pm" => "perl",
        "lua" => "lua",
        "r" => "r",
        "dart" => "dart",
        "ex" | "exs" => "elixir",
        "erl" | "hrl" => "erlang",
        "hs" => "haskell",
        "clj" | "cljs" | "edn" => "clojure",
        "sh" | "bash" | "zsh" | "ksh" => "bash",
        "fish" => "fish",
        "ps1" | "psm1" => "powershell",
        "bat" | "cmd" => "batch",
        "sql" => "sql",
        "html" | "htm" => "html",
        "xml" | "xsd" | "xsl" | "svg" | "plist" => "xml",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "vue" => "vue",
        "svelte" => "svelte",
        "json" | "jsonc" | "json5" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" | "conf" => "ini",
        "md" | "markdown" | "mdx" => "markdown",
        "proto" => "protobuf",
        "graphql" | "gql" => "graphql",
        "tf" | "tfvars" | "hcl" => "hcl",
        "dockerfile" => "dockerfile",
        "mk" | "makefile" => "makefile",
        "cmake" => "cmake",
        "nix" => "nix",
        "zig" => "zig",
        "diff" | "patch" => "diff",
        "txt" | "log" => "text",
        _ => return None,
    };
    Some(tag)
}
