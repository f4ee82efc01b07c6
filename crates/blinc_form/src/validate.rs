//! Rule validation
//!
//! Walks a [`RuleTree`] and a [`ValueTree`] in lock-step and collects the
//! first failing check of every field into a flat [`ErrorMap`].
//!
//! The walk is driven by the rule keys at the top level and by the value's
//! own keys below it, so rules for nested fields that were never submitted
//! are skipped. A field that fails a leaf check is not descended into.

use crate::field_errors::ErrorMap;
use crate::path::FieldPath;
use crate::rules::{MessageNode, MessageTree, RuleMessages, RuleNode, RuleTree};
use crate::value::{FormValue, ValueTree};

/// Validate `data` against `rules`, using `messages` for overrides
pub fn validate_rules(data: &ValueTree, rules: &RuleTree, messages: &MessageTree) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for (name, rule) in rules.iter() {
        validate_node(
            &mut errors,
            FieldPath::single(name),
            data.get(name),
            Some(rule),
            messages.get(name),
        );
    }
    errors
}

fn validate_node(
    errors: &mut ErrorMap,
    path: FieldPath,
    value: Option<&FormValue>,
    rule: Option<&RuleNode>,
    messages: Option<&MessageNode>,
) {
    let (leaf, branch) = match rule {
        Some(RuleNode::Leaf(leaf)) => (Some(leaf), None),
        Some(RuleNode::Branch(branch)) => (None, Some(branch)),
        None => (None, None),
    };

    if let Some(error) = leaf.and_then(|leaf| leaf.check(value)) {
        let message = match messages {
            Some(MessageNode::Leaf(overrides)) => overrides.resolve(&error),
            _ => RuleMessages::default().resolve(&error),
        };
        tracing::trace!(path = %path, error = ?error, "field failed validation");
        errors.insert(path.to_string(), message);
        return;
    }

    let (Some(FormValue::Map(children)), Some(branch)) = (value, branch) else {
        return;
    };

    let nested_messages = match messages {
        Some(MessageNode::Branch(tree)) => Some(tree),
        _ => None,
    };

    for (key, child) in children.iter() {
        validate_node(
            errors,
            path.child(key),
            Some(child),
            branch.get(key),
            nested_messages.and_then(|tree| tree.get(key)),
        );
    }
}
