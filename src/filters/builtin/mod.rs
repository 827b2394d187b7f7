//! Built-in filter implementations.
//!
//! The set of filters is closed: adding one means adding a row to
//! [`BUILTIN_FILTERS`]. Names start with a three digit priority; filters
//! beginning with `0` are core and run unless core filters are switched off.

mod functions;
mod repair;
mod security;
mod split;
mod strictness;
mod syntax;
mod trig;

use crate::core::ast::Node;
use crate::core::error::{FilterResult, ValidationError};
use crate::filters::registry::{boxed, FilterEntry};

/// Registration table of every known filter.
pub static BUILTIN_FILTERS: &[FilterEntry] = &[
    FilterEntry { name: "001_fix_call_of_a_group_or_function", factory: boxed::<FixCallOfAGroupOrFunction> },
    FilterEntry { name: "002_log_candy", factory: boxed::<LogCandy> },
    FilterEntry { name: "003_no_dot_dot", factory: boxed::<NoDotDot> },
    FilterEntry { name: "005_i_is_never_a_function", factory: boxed::<IIsNeverAFunction> },
    FilterEntry { name: "020_no_arc", factory: boxed::<NoArc> },
    FilterEntry { name: "025_no_trig_power", factory: boxed::<NoTrigPower> },
    FilterEntry { name: "030_no_trig_space", factory: boxed::<NoTrigSpace> },
    FilterEntry { name: "031_no_trig_brackets", factory: boxed::<NoTrigBrackets> },
    FilterEntry { name: "050_no_chained_inequalities", factory: boxed::<NoChainedInequalities> },
    FilterEntry { name: "101_no_floats", factory: boxed::<NoFloats> },
    FilterEntry { name: "102_no_strings", factory: boxed::<NoStrings> },
    FilterEntry { name: "402_split_prefix_from_common_function_name", factory: boxed::<SplitPrefixFromCommonFunctionName> },
    FilterEntry { name: "403_split_at_number_letter_boundary", factory: boxed::<SplitAtNumberLetterBoundary> },
    FilterEntry { name: "406_split_implied_variable_names", factory: boxed::<SplitImpliedVariableNames> },
    FilterEntry { name: "410_single_char_vars", factory: boxed::<SingleCharVars> },
    FilterEntry { name: "441_split_unknown_functions", factory: boxed::<SplitUnknownFunctions> },
    FilterEntry { name: "442_split_all_functions", factory: boxed::<SplitAllFunctions> },
    FilterEntry { name: "450_split_floats", factory: boxed::<SplitFloats> },
    FilterEntry { name: "520_no_equality_with_logic", factory: boxed::<NoEqualityWithLogic> },
    FilterEntry { name: "541_no_unknown_functions", factory: boxed::<NoUnknownFunctions> },
    FilterEntry { name: "542_no_functions_at_all", factory: boxed::<NoFunctionsAtAll> },
    FilterEntry { name: "990_no_fixing_spaces", factory: boxed::<NoFixingSpaces> },
    FilterEntry { name: "991_no_fixing_stars", factory: boxed::<NoFixingStars> },
    FilterEntry { name: "998_security", factory: boxed::<Security> },
    FilterEntry { name: "999_strict", factory: boxed::<Strict> },
];

// Re-export for direct access
pub use functions::{NoFunctionsAtAll, NoUnknownFunctions};
pub use repair::{FixCallOfAGroupOrFunction, IIsNeverAFunction, LogCandy};
pub use security::{Security, SecurityLevel};
pub use split::{
    SingleCharVars, SplitAllFunctions, SplitAtNumberLetterBoundary, SplitFloats,
    SplitImpliedVariableNames, SplitPrefixFromCommonFunctionName, SplitUnknownFunctions,
};
pub use strictness::{NoFixingSpaces, NoFixingStars, Strict};
pub use syntax::{NoChainedInequalities, NoDotDot, NoEqualityWithLogic, NoFloats, NoStrings};
pub use trig::{NoArc, NoTrigBrackets, NoTrigPower, NoTrigSpace};

/// Reject the tree if any node matches `pred`, otherwise pass it through.
///
/// `message` builds the learner-facing text from the offending node.
pub(crate) fn reject_if(
    ast: Node,
    filter: &str,
    answer_note: &str,
    pred: impl Fn(&Node) -> bool,
    message: impl FnOnce(&Node) -> String,
) -> FilterResult<Node> {
    match ast.find(&pred) {
        Some(offender) => Err(ValidationError::new(filter, answer_note, message(offender))),
        None => Ok(ast),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::AstFilter;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_unique_and_sorted() {
        let names: Vec<_> = BUILTIN_FILTERS.iter().map(|e| e.name).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_instances_report_their_table_name() {
        for entry in BUILTIN_FILTERS {
            let filter = (entry.factory)();
            assert_eq!(filter.name(), entry.name);
            assert!(!filter.description().is_empty(), "{} has no description", entry.name);
        }
    }

    #[test]
    fn test_capabilities() {
        let parametric: Vec<_> = BUILTIN_FILTERS
            .iter()
            .filter(|e| (e.factory)().as_parametric().is_some())
            .map(|e| e.name)
            .collect();
        assert_eq!(parametric, vec!["998_security"]);

        let exclusive: Vec<_> = BUILTIN_FILTERS
            .iter()
            .filter(|e| (e.factory)().as_exclusion().is_some())
            .map(|e| e.name)
            .collect();
        assert_eq!(
            exclusive,
            vec![
                "406_split_implied_variable_names",
                "410_single_char_vars",
                "441_split_unknown_functions",
                "442_split_all_functions",
            ]
        );
    }
}
