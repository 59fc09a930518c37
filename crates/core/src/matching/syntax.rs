//! Syntax-tree search for function definitions.
//!
//! The file is parsed with the tree-sitter C grammar and the whole tree is
//! walked, so a definition anywhere in the file counts regardless of the
//! line the debug info reported. Multi-line signatures and definitions nested
//! inside preprocessor conditionals are found the same way.

use log::{debug, warn};
use tree_sitter::{Language, Node, Parser, Tree};

use crate::matching::{contains_identifier, SourceFile};

/// One function definition found in a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionHit {
    pub name: String,
    /// 1-based line of the defining identifier.
    pub line: u32,
}

/// Every function definition of one file, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionIndex {
    pub hits: Vec<DefinitionHit>,
}

impl DefinitionIndex {
    /// Exact, case-sensitive lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.hits.iter().any(|hit| hit.name == name)
    }

    /// Lines on which `name` is defined (more than one under `#if`/`#else` splits).
    pub fn lines_of(&self, name: &str) -> Vec<u32> {
        self.hits.iter().filter(|hit| hit.name == name).map(|hit| hit.line).collect()
    }
}

/// Tree-sitter backed matcher for C function definitions.
///
/// A fresh parser is built per file; nothing is cached between files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxMatcher;

impl SyntaxMatcher {
    pub fn new() -> Self {
        SyntaxMatcher
    }

    fn parse(&self, file: &SourceFile) -> Option<Tree> {
        let language: Language = tree_sitter_c::LANGUAGE.into();
        let mut parser = Parser::new();
        if let Err(err) = parser.set_language(&language) {
            warn!("C grammar unavailable: {err}");
            return None;
        }
        parser.parse(&file.text, None)
    }

    /// Collect every function definition in `file`.
    ///
    /// Returns `None` when no tree could be built at all; a tree with error
    /// nodes still yields whatever definitions were recovered.
    pub fn definitions(&self, file: &SourceFile) -> Option<DefinitionIndex> {
        let tree = match self.parse(file) {
            Some(tree) => tree,
            None => {
                warn!("Failed to parse {}", file.path.display());
                return None;
            }
        };
        let root = tree.root_node();
        let source = file.text.as_bytes();

        let mut index = DefinitionIndex::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "function_definition" {
                if let Some(hit) = definition_hit(node, source) {
                    index.hits.push(hit);
                }
            }
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            // Reverse so the stack pops children in source order.
            stack.extend(children.into_iter().rev());
        }

        debug!(
            "{}: {} function definitions (errors: {})",
            file.path.display(),
            index.hits.len(),
            root.has_error()
        );
        Some(index)
    }

    /// Whether `file` defines `target` anywhere. False if parsing fails.
    pub fn matches(&self, file: &SourceFile, target: &str) -> bool {
        self.definitions(file).is_some_and(|index| index.contains(target))
    }
}

/// Name and line of a `function_definition`, following its declarator chain.
fn definition_hit(node: Node, source: &[u8]) -> Option<DefinitionHit> {
    let mut current = node.child_by_field_name("declarator")?;
    let mut saw_function = false;
    loop {
        match current.kind() {
            "identifier" => {
                if !saw_function {
                    return None;
                }
                let name = current.utf8_text(source).ok()?;
                return Some(DefinitionHit {
                    name: name.to_string(),
                    line: current.start_position().row as u32 + 1,
                });
            }
            "function_declarator" => {
                saw_function = true;
                current = current.child_by_field_name("declarator")?;
            }
            "pointer_declarator" => {
                current = current.child_by_field_name("declarator")?;
            }
            "parenthesized_declarator" | "attributed_declarator" => {
                current = inner_declarator(current)?;
            }
            _ => return None,
        }
    }
}

/// First named child that is itself a declarator (these wrappers have no field name).
fn inner_declarator(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let inner = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "identifier" || child.kind().ends_with("declarator"));
    inner
}

/// Wrapper-macro convention: a line containing one of `markers` announces
/// that the next non-blank line is the real definition site.
///
/// Matches when `target` appears on that line as a whole identifier. This
/// covers accessor patterns such as `__NTH (name (...))` that the grammar
/// reads as a definition of the wrapper macro instead of `name`.
pub fn wrapper_marker_match(file: &SourceFile, target: &str, markers: &[String]) -> bool {
    let lines = file.lines();
    for (idx, line) in lines.iter().enumerate() {
        if !markers.iter().any(|marker| !marker.is_empty() && contains_identifier(line, marker)) {
            continue;
        }
        let next = lines[idx + 1..].iter().find(|candidate| !candidate.trim().is_empty());
        if let Some(next) = next {
            if contains_identifier(next, target) {
                debug!(
                    "{}: '{}' follows wrapper marker at line {}",
                    file.path.display(),
                    target,
                    idx + 1
                );
                return true;
            }
        }
    }
    false
}
