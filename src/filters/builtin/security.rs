//! Per-question security check on called functions and used names.

use crate::core::ast::Node;
use crate::core::error::{FilterResult, ValidationError};
use crate::core::filter::{AstFilter, ParametricFilter};
use crate::core::params::ParamBundle;
use crate::core::vocab::{ALWAYS_FORBIDDEN, GREEK_LETTERS, STUDENT_FORBIDDEN};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who typed the expression being checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// Learner input; the restrictive default.
    #[default]
    #[serde(rename = "s")]
    Student,
    /// Question author input.
    #[serde(rename = "t")]
    Teacher,
}

impl SecurityLevel {
    /// Short code used in settings.
    pub fn code(&self) -> &'static str {
        match self {
            SecurityLevel::Student => "s",
            SecurityLevel::Teacher => "t",
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(SecurityLevel::Student),
            "t" => Ok(SecurityLevel::Teacher),
            other => Err(format!("unknown security level '{}', expected 's' or 't'", other)),
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const KEYS: &[&str] = &["security", "allowwords", "forbidwords"];

/// Rejects forbidden functions and words.
///
/// Settings:
/// - `security`: `"s"` (default) or `"t"`.
/// - `allowwords`: functions students may call despite the default list.
/// - `forbidwords`: names nobody may use in this question, as a function or
///   a value.
///
/// Functions in the always-forbidden list cannot be allowed back in.
#[derive(Debug, Clone, Default)]
pub struct Security {
    level: SecurityLevel,
    allow: IndexSet<String>,
    forbid: IndexSet<String>,
}

impl Security {
    /// Create a check for the given level with no extra words.
    pub fn new(level: SecurityLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Bound security level.
    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    fn offence(&self, node: &Node) -> Option<(&'static str, String)> {
        let (name, called) = match (callee(node), node.as_atom()) {
            (Some(name), _) => (name, true),
            (None, Some(name)) => (name, false),
            _ => return None,
        };
        if self.forbid.contains(name) {
            return Some(("forbiddenWord", format!("The word '{}' is forbidden here", name)));
        }
        if ALWAYS_FORBIDDEN.contains(&name) {
            return Some((
                "forbiddenFunction",
                format!("The function '{}' is never allowed", name),
            ));
        }
        // A bare `lambda` is the Greek letter; only its call is a function.
        let student_forbidden = STUDENT_FORBIDDEN.contains(&name)
            && !self.allow.contains(name)
            && (called || !GREEK_LETTERS.contains(&name));
        if self.level == SecurityLevel::Student && student_forbidden {
            return Some((
                "forbiddenFunction",
                format!("You may not use the function '{}'", name),
            ));
        }
        None
    }
}

/// Name of the called function, looking through parentheses around it.
fn callee(node: &Node) -> Option<&str> {
    let Node::Call { name, .. } = node else {
        return None;
    };
    let mut target: &Node = name;
    while let Node::Group(items) = target {
        match items.as_slice() {
            [inner] => target = inner,
            _ => return None,
        }
    }
    target.as_atom()
}

impl AstFilter for Security {
    fn name(&self) -> &'static str {
        "998_security"
    }

    fn description(&self) -> &'static str {
        "Rejects forbidden functions and words"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        let found = ast
            .find(&|node: &Node| self.offence(node).is_some())
            .and_then(|node| self.offence(node));
        match found {
            Some((note, message)) => Err(ValidationError::new(self.name(), note, message)),
            None => Ok(ast),
        }
    }

    fn as_parametric(&self) -> Option<&dyn ParametricFilter> {
        Some(self)
    }

    fn as_parametric_mut(&mut self) -> Option<&mut dyn ParametricFilter> {
        Some(self)
    }
}

impl ParametricFilter for Security {
    fn set_parameters(&mut self, params: &ParamBundle) -> Result<(), String> {
        if let Some(key) = params.keys().find(|k| !KEYS.contains(k)) {
            return Err(format!("unknown setting '{}'", key));
        }
        let level = match params.get_str("security")? {
            Some(code) => code.parse()?,
            None => SecurityLevel::default(),
        };
        let allow = params.get_words("allowwords")?;
        let forbid = params.get_words("forbidwords")?;

        self.level = level;
        self.allow = allow.into_iter().collect();
        self.forbid = forbid.into_iter().collect();
        Ok(())
    }

    fn parameters(&self) -> ParamBundle {
        ParamBundle::new()
            .with("security", self.level.code())
            .with("allowwords", self.allow.iter().cloned().collect::<Vec<_>>())
            .with("forbidwords", self.forbid.iter().cloned().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn configured(params: ParamBundle) -> Security {
        let mut filter = Security::default();
        filter.set_parameters(&params).unwrap();
        filter
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("s".parse::<SecurityLevel>(), Ok(SecurityLevel::Student));
        assert_eq!("t".parse::<SecurityLevel>(), Ok(SecurityLevel::Teacher));
        assert!("x".parse::<SecurityLevel>().is_err());
        assert_eq!(SecurityLevel::Teacher.to_string(), "t");
    }

    #[test]
    fn test_student_forbidden_functions() {
        let tree = Node::function("eval", vec![Node::atom("x")]);
        let error = Security::default().apply(tree.clone()).unwrap_err();
        assert_eq!(error.answer_note, "forbiddenFunction");
        assert_eq!(error.filter, "998_security");

        assert!(Security::new(SecurityLevel::Teacher).apply(tree.clone()).is_ok());

        let allowed = configured(ParamBundle::new().with("allowwords", "eval"));
        assert!(allowed.apply(tree).is_ok());
    }

    #[test]
    fn test_always_forbidden_cannot_be_allowed() {
        let filter = configured(
            ParamBundle::new()
                .with("security", "t")
                .with("allowwords", json!(["system"])),
        );
        let tree = Node::function("system", vec![Node::string("ls")]);
        assert_eq!(filter.apply(tree).unwrap_err().answer_note, "forbiddenFunction");
    }

    #[test]
    fn test_forbidden_function_as_value() {
        let tree = Node::function(
            "funcall",
            vec![Node::atom("system"), Node::string("rm -rf /")],
        );
        let error = Security::new(SecurityLevel::Teacher).apply(tree).unwrap_err();
        assert_eq!(error.answer_note, "forbiddenFunction");
        assert!(error.message.contains("system"));

        let tree = Node::function("makelist", vec![Node::atom("x")]);
        let passed = Node::function("f", vec![Node::atom("eval")]);
        assert!(Security::default().apply(tree).is_err());
        assert!(Security::default().apply(passed.clone()).is_err());
        assert!(Security::new(SecurityLevel::Teacher).apply(passed).is_ok());
    }

    #[test]
    fn test_forbidden_function_behind_parentheses() {
        let tree = Node::call(
            Node::group(vec![Node::group(vec![Node::atom("system")])]),
            vec![Node::string("ls")],
        );
        let error = Security::new(SecurityLevel::Teacher).apply(tree).unwrap_err();
        assert_eq!(error.answer_note, "forbiddenFunction");

        let tree = Node::call(Node::group(vec![Node::atom("ev")]), vec![Node::atom("x")]);
        assert!(Security::default().apply(tree).is_err());
    }

    #[test]
    fn test_greek_letter_value_is_not_a_function() {
        let letter = Node::op("*", Node::atom("lambda"), Node::atom("x"));
        assert!(Security::default().apply(letter).is_ok());

        let call = Node::function("lambda", vec![Node::List(vec![Node::atom("x")]), Node::atom("x")]);
        assert_eq!(Security::default().apply(call).unwrap_err().answer_note, "forbiddenFunction");
    }

    #[test]
    fn test_forbidden_words() {
        let filter = configured(ParamBundle::new().with("forbidwords", "diff, int"));
        let call = Node::function("diff", vec![Node::atom("f"), Node::atom("x")]);
        assert_eq!(filter.apply(call).unwrap_err().answer_note, "forbiddenWord");

        let value = Node::op("+", Node::atom("int"), Node::int("1"));
        assert!(filter.apply(value).unwrap_err().message.contains("int"));

        assert!(filter.apply(Node::atom("x")).is_ok());
    }

    #[test]
    fn test_parameters_round_trip() {
        let filter = configured(
            ParamBundle::new()
                .with("security", "t")
                .with("forbidwords", json!(["a", "b"])),
        );
        let bound = filter.parameters();
        assert_eq!(bound.get_str("security"), Ok(Some("t")));
        assert_eq!(bound.get_words("forbidwords"), Ok(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(bound.get_words("allowwords"), Ok(Vec::new()));
    }

    #[test]
    fn test_rejects_malformed_settings() {
        let mut filter = Security::default();
        assert!(filter.set_parameters(&ParamBundle::new().with("security", "x")).is_err());
        assert!(filter.set_parameters(&ParamBundle::new().with("security", 1)).is_err());
        assert!(filter.set_parameters(&ParamBundle::new().with("allow", "x")).is_err());
        assert_eq!(filter.level(), SecurityLevel::Student);
    }

    #[test]
    fn test_instances_are_independent() {
        let teacher = configured(ParamBundle::new().with("security", "t"));
        let student = configured(ParamBundle::new().with("security", "s"));
        let tree = Node::function("ev", vec![Node::atom("x")]);
        assert!(teacher.apply(tree.clone()).is_ok());
        assert!(student.apply(tree).is_err());
    }
}
