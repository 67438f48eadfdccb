use super::SymbolId;
use super::SymbolKind;
use super::SymbolTable;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid regex literal {pattern}: {err}"))
}

static KNOT_REGEX: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"^={2,}\s*(function\s+)?([A-Za-z_][A-Za-z0-9_]*)"));
static STITCH_REGEX: Lazy<Regex> = Lazy::new(|| compile_regex(r"^=\s*([A-Za-z_][A-Za-z0-9_]*)"));
static LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"^(?:[*+\-]\s*)+\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)"));
static GLOBAL_REGEX: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"^(VAR|CONST|LIST|EXTERNAL)\s+([A-Za-z_][A-Za-z0-9_]*)"));

/// Extract the symbol tree of an Ink source file.
///
/// Knots and functions open a top-level scope, stitches nest inside the
/// current knot, and labelled choices or gathers nest inside the innermost
/// open scope. Global declarations (`VAR`, `CONST`, `LIST`, `EXTERNAL`) are
/// always top-level.
pub fn extract_ink_symbols(content: &str) -> SymbolTable {
    let mut table = SymbolTable::new();
    let mut knot: Option<SymbolId> = None;
    let mut stitch: Option<SymbolId> = None;
    let mut in_block_comment = false;

    for (row, raw_line) in content.split('\n').enumerate() {
        let line = raw_line.trim();
        if in_block_comment {
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if line.starts_with("//") || line.is_empty() {
            continue;
        }
        if line.starts_with("/*") {
            in_block_comment = !line.contains("*/");
            continue;
        }

        if let Some(caps) = KNOT_REGEX.captures(line) {
            let kind = if caps.get(1).is_some() {
                SymbolKind::Function
            } else {
                SymbolKind::Knot
            };
            knot = Some(table.push(None, &caps[2], kind, row));
            stitch = None;
            continue;
        }
        if let Some(caps) = STITCH_REGEX.captures(line) {
            stitch = Some(table.push(knot, &caps[1], SymbolKind::Stitch, row));
            continue;
        }
        if let Some(caps) = LABEL_REGEX.captures(line) {
            table.push(stitch.or(knot), &caps[1], SymbolKind::Label, row);
            continue;
        }
        if let Some(caps) = GLOBAL_REGEX.captures(line) {
            let kind = match &caps[1] {
                "VAR" => SymbolKind::Variable,
                "CONST" => SymbolKind::Constant,
                "LIST" => SymbolKind::List,
                _ => SymbolKind::External,
            };
            table.push(None, &caps[2], kind, row);
        }
    }
    table
}
