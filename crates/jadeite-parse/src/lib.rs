use jadeite_errors::Diagnostic;
use jadeite_tree::Tree;
use rustc_hash::FxHashMap;

mod builder;

/// Parsed templates by name.
pub type Registry = FxHashMap<String, Tree>;

/// Parses `text` into a tree named `name`.
///
/// Empty delimiters default to `{{` and `}}`. On success an independent copy
/// of the tree is recorded in `registry` under `name`; on failure the
/// registry is left untouched.
pub fn parse(
    name: &str,
    text: &str,
    left_delim: &str,
    right_delim: &str,
    registry: &mut Registry,
) -> Result<Tree, Diagnostic> {
    let tokens = jadeite_tokenizer::lex(name, text, left_delim, right_delim);
    let tree = builder::build(name, tokens)?;
    registry.insert(tree.name.clone(), tree.clone());
    Ok(tree)
}
