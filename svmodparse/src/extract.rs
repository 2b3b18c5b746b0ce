//! Carves the text of each `module ... endmodule` block out of a file.

use super::*;
use crate::segment::strip_line_comment;
use crate::stmtnom::parse_module_name;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref RE_ENDMODULE: Regex = Regex::new(r"\bendmodule\b").unwrap();
}

/// The raw text of one module, from its `module` keyword up to and
/// including `endmodule`, with comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModule {
    /// Declared module name, taken from the header.
    pub name: CompactString,
    /// Module text. Each source line ends with `\n`.
    pub text: String,
}

/// Returns whether a trimmed line opens a module, i.e. its first
/// token is exactly `module`.
#[inline]
fn opens_module(line: &str) -> bool {
    line.strip_prefix("module").map_or(false, |rest| {
        rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '(')
    })
}

/// Extracts all modules in source order.
///
/// Lines are read one by one with `//` comments removed. A block
/// starts on a line whose first token is `module` and ends at the
/// next `endmodule`, which may sit on the header line itself.
/// Whatever follows `endmodule` on the same line is scanned again.
///
/// Blocks with byte-identical text are kept once. Two different
/// blocks declaring the same name are rejected.
pub fn extract_modules(src: &str) -> Result<Vec<RawModule>, ParseError> {
    let mut modules: Vec<RawModule> = Vec::new();
    let mut name2idx = HashMap::<CompactString, usize>::new();
    let mut current: Option<String> = None;

    let mut emit = |text: String| -> Result<(), ParseError> {
        let name = parse_module_name(&text)?;
        match name2idx.get(&name) {
            Some(&idx) if modules[idx].text == text => {
                clilog::warn!(SVM_DUPTEXT,
                              "module {} appears twice with identical text, \
                               keeping one copy", name);
            },
            Some(_) => {
                return Err(ParseError::DuplicateModuleName { name })
            },
            None => {
                clilog::debug!("extracted module {}", name);
                name2idx.insert(name.clone(), modules.len());
                modules.push(RawModule { name, text });
            }
        }
        Ok(())
    };

    for line in src.lines() {
        let mut rest = strip_line_comment(line).trim();
        while !rest.is_empty() {
            let mut block = match current.take() {
                Some(block) => block,
                None if opens_module(rest) => String::new(),
                // stray text between modules.
                None => break
            };
            match RE_ENDMODULE.find(rest) {
                Some(m) => {
                    block.push_str(&rest[..m.end()]);
                    block.push('\n');
                    emit(block)?;
                    rest = rest[m.end()..].trim_start();
                },
                None => {
                    block.push_str(rest);
                    block.push('\n');
                    current = Some(block);
                    break
                }
            }
        }
    }

    if let Some(block) = current {
        let header = block.lines().next().unwrap_or_default().to_string();
        return Err(ParseError::UnterminatedModule { header })
    }
    Ok(modules)
}
