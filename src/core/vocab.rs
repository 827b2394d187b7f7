//! Word lists shared by the built-in filters.

use std::sync::OnceLock;

/// Trigonometric and hyperbolic functions, including their inverses.
pub const TRIG_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "sec", "csc", "cot", "asin", "acos", "atan", "asec", "acsc", "acot",
    "sinh", "cosh", "tanh", "sech", "csch", "coth", "asinh", "acosh", "atanh", "asech", "acsch",
    "acoth",
];

/// The `arc` spellings of inverse trig functions that the CAS does not accept.
pub const ARC_FUNCTIONS: &[&str] = &[
    "arcsin", "arccos", "arctan", "arcsec", "arccsc", "arccot", "arcsinh", "arccosh", "arctanh",
    "arcsech", "arccsch", "arccoth",
];

/// Functions a learner may legitimately call, besides [`TRIG_FUNCTIONS`].
pub const COMMON_FUNCTIONS: &[&str] = &[
    "exp", "ln", "log", "lg", "sqrt", "abs", "floor", "ceiling", "round", "signum", "min", "max",
    "factorial", "binomial", "gcd", "lcm", "mod", "sum", "product", "diff", "integrate", "limit",
    "expand", "factor", "simplify", "matrix", "det", "transpose", "conjugate", "re", "im",
];

/// Names that are constants, never products of shorter names.
pub const CONSTANTS: &[&str] = &["pi", "inf", "minf", "infinity", "und", "ind", "true", "false"];

/// Greek letter names, which are single symbols however many letters they have.
pub const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

/// Inequalities, the relations that learners tend to chain.
pub const INEQUALITIES: &[&str] = &["<", ">", "<=", ">="];

/// Binary logical connectives.
pub const LOGIC_OPERATORS: &[&str] = &["and", "or", "nand", "nor", "xor", "xnor", "implies"];

/// Functions nobody may call from an answer, whatever the security level.
pub const ALWAYS_FORBIDDEN: &[&str] = &[
    "system", "kill", "load", "batch", "batchload", "writefile", "appendfile", "with_stdout",
    "opena", "openw", "openr", "closefile", "save", "stringout", "run_testsuite", "compfile",
    "translate_file", "compile_file", "remfunction", "quit", "to_lisp",
];

/// Functions teachers may call but students may not.
pub const STUDENT_FORBIDDEN: &[&str] = &[
    "ev", "eval", "define", "subst", "apply", "map", "makelist", "block", "lambda", "funmake",
    "remvalue", "kill", "declare", "assume", "forget", "print", "concat", "sconcat",
];

/// Whether `name` is a trig or hyperbolic function.
pub fn is_trig(name: &str) -> bool {
    TRIG_FUNCTIONS.contains(&name)
}

/// Whether `name` is a function the CAS knows about.
pub fn is_known_function(name: &str) -> bool {
    is_trig(name) || COMMON_FUNCTIONS.contains(&name)
}

/// Whether `name` is a named constant.
pub fn is_constant(name: &str) -> bool {
    CONSTANTS.contains(&name) || name.starts_with('%')
}

/// Whether `name` must never be split into shorter names.
pub fn is_reserved_name(name: &str) -> bool {
    is_constant(name) || is_known_function(name) || GREEK_LETTERS.contains(&name)
}

/// All known function names, longest first, for suffix matching.
///
/// Sorted once on first use.
pub fn known_functions_longest_first() -> &'static [&'static str] {
    static SORTED: OnceLock<Vec<&'static str>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut names: Vec<&'static str> = TRIG_FUNCTIONS
            .iter()
            .chain(COMMON_FUNCTIONS.iter())
            .copied()
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    })
}
