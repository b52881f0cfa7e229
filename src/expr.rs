//! Zod expression AST.
//!
//! Validation expressions are built and rewritten as a small tree — a base
//! (a `z` namespace constructor or an arbitrary head such as a schema
//! identifier) followed by an ordered chain of trailing calls — and only
//! serialized to text at emission. Author-supplied override text is parsed
//! into the same shape, so the normalization rules are tree rewrites rather
//! than text surgery:
//!
//! - a bare primitive token serializes in zero-argument call form
//!   (`z.string` → `z.string()`);
//! - an array wrapper enclosing a leading dot-chain becomes a trailing
//!   modifier (`z.string.array(.min(5))` → `z.string().min(5).array()`).
//!
//! Both rewrites are no-ops on already-normalized expressions.

use std::fmt;

/// Head of an expression chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// A `z` namespace constructor, serialized as `z.{token}({args})`.
    Primitive {
        /// Constructor token, e.g. `string`.
        token: String,
        /// Verbatim argument text; `None` serializes as `()`.
        args: Option<String>,
    },

    /// An arbitrary head kept verbatim (schema identifier, pass-through).
    Raw(String),
}

/// One trailing call in an expression chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Method name.
    pub name: String,
    /// Verbatim argument text; `None` serializes as `()`.
    pub args: Option<String>,
}

impl Call {
    fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }
}

/// A Zod validation expression: base plus trailing modifier calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZodExpr {
    base: Base,
    chain: Vec<Call>,
}

impl ZodExpr {
    /// A namespace primitive constructor, e.g. `primitive("string")`.
    pub fn primitive(token: impl Into<String>) -> Self {
        Self {
            base: Base::Primitive {
                token: token.into(),
                args: None,
            },
            chain: Vec::new(),
        }
    }

    /// A namespace constructor with a verbatim argument,
    /// e.g. `primitive_with_arg("instanceof", "Uint8Array")`.
    pub fn primitive_with_arg(token: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            base: Base::Primitive {
                token: token.into(),
                args: Some(arg.into()),
            },
            chain: Vec::new(),
        }
    }

    /// An arbitrary head expression kept verbatim.
    pub fn raw(head: impl Into<String>) -> Self {
        Self {
            base: Base::Raw(head.into()),
            chain: Vec::new(),
        }
    }

    /// Append a zero-argument trailing call (builder form).
    pub fn with_call(mut self, name: impl Into<String>) -> Self {
        self.push_call(name);
        self
    }

    /// Append a zero-argument trailing call.
    pub fn push_call(&mut self, name: impl Into<String>) {
        self.chain.push(Call::bare(name));
    }

    /// Whether the chain (or the base constructor) carries the given call.
    pub fn has_call(&self, name: &str) -> bool {
        if let Base::Primitive { token, .. } = &self.base {
            if token == name {
                return true;
            }
        }
        self.chain.iter().any(|c| c.name == name)
    }

    /// Whether the expression is already an array expression.
    pub fn is_array(&self) -> bool {
        self.has_call("array")
    }

    /// Parse expression text into the tree shape.
    ///
    /// The parser is deliberately narrow: it splits a dot-chain at paren
    /// depth zero, treating a leading `z.` (or a leading dot) as the
    /// namespace head and anything else as a verbatim raw head.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let mut segments = split_chain(text).into_iter();
        let first = segments.next().unwrap_or_default();

        let base = if first.is_empty() || first == "z" {
            match segments.next() {
                Some(seg) => {
                    let (token, args) = split_call(&seg);
                    Base::Primitive { token, args }
                }
                None => Base::Raw("z".to_string()),
            }
        } else {
            Base::Raw(first)
        };

        let chain = segments
            .map(|seg| {
                let (name, args) = split_call(&seg);
                Call { name, args }
            })
            .collect();

        Self { base, chain }
    }

    /// Apply the two structural rewrites. Idempotent.
    pub fn normalize(&mut self) {
        // array wrapper at the base position: z.array(.chain) -> z.<chain>.array()
        let wrapped_chain = match &self.base {
            Base::Primitive {
                token,
                args: Some(a),
            } if token == "array" && a.trim_start().starts_with('.') => Some(a.trim().to_string()),
            _ => None,
        };
        if let Some(arg) = wrapped_chain {
            let mut calls = parse_calls(&arg);
            if !calls.is_empty() {
                calls.push(Call::bare("array"));
                calls.append(&mut self.chain);
                let head = calls.remove(0);
                self.base = Base::Primitive {
                    token: head.name,
                    args: head.args,
                };
                self.chain = calls;
            }
        }

        // array wrappers within the chain: .array(.chain) -> .chain.array()
        let old = std::mem::take(&mut self.chain);
        for call in old {
            if call.name == "array" {
                if let Some(a) = &call.args {
                    let trimmed = a.trim();
                    if trimmed.starts_with('.') {
                        let parsed = parse_calls(trimmed);
                        if !parsed.is_empty() {
                            self.chain.extend(parsed);
                            self.chain.push(Call::bare("array"));
                            continue;
                        }
                    }
                }
            }
            self.chain.push(call);
        }
    }
}

impl fmt::Display for ZodExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            Base::Primitive { token, args } => {
                write!(f, "z.{}({})", token, args.as_deref().unwrap_or(""))?;
            }
            Base::Raw(head) => write!(f, "{}", head)?,
        }
        for call in &self.chain {
            write!(f, ".{}({})", call.name, call.args.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

/// Split a dot-chain at paren depth zero, respecting string literals.
fn split_chain(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_str: Option<char> = None;

    for c in text.chars() {
        match in_str {
            Some(quote) => {
                current.push(c);
                if c == quote {
                    in_str = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    current.push(c);
                    in_str = Some(c);
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    current.push(c);
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                '.' if depth == 0 => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }
    segments.push(current);
    segments
}

/// Split one segment into a call name and verbatim argument text.
fn split_call(segment: &str) -> (String, Option<String>) {
    if let Some(open) = segment.find('(') {
        if segment.ends_with(')') {
            let name = segment[..open].to_string();
            let args = segment[open + 1..segment.len() - 1].to_string();
            return (name, Some(args));
        }
    }
    (segment.to_string(), None)
}

/// Parse a leading dot-chain (`.min(5).max(9)`) into calls.
fn parse_calls(text: &str) -> Vec<Call> {
    split_chain(text)
        .into_iter()
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            let (name, args) = split_call(&seg);
            Call { name, args }
        })
        .collect()
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_head() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("z.string".to_string()),
            Just("z.string()".to_string()),
            Just("z.number().int()".to_string()),
            Just("z.boolean()".to_string()),
            "[A-Z][a-zA-Z]{0,10}Schema".prop_map(|s| s),
        ]
    }

    fn arb_tail() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just(".optional()".to_string()),
                Just(".nullable()".to_string()),
                Just(".array()".to_string()),
                (1u32..100).prop_map(|n| format!(".min({n})")),
                (1u32..100).prop_map(|n| format!(".array(.max({n}))")),
            ],
            0..4,
        )
        .prop_map(|calls| calls.concat())
    }

    proptest! {
        /// Applying the rewrites to already-normalized text is a no-op.
        #[test]
        fn prop_normalization_stable(head in arb_head(), tail in arb_tail()) {
            let text = format!("{head}{tail}");

            let mut first = ZodExpr::parse(&text);
            first.normalize();
            let once = first.to_string();

            let mut second = ZodExpr::parse(&once);
            second.normalize();
            prop_assert_eq!(second.to_string(), once);
        }

        /// Serialized expressions keep parentheses balanced.
        #[test]
        fn prop_balanced_parens(head in arb_head(), tail in arb_tail()) {
            let mut expr = ZodExpr::parse(&format!("{head}{tail}"));
            expr.normalize();
            let code = expr.to_string();
            prop_assert_eq!(
                code.matches('(').count(),
                code.matches(')').count(),
                "unbalanced parens in {}", code
            );
        }
    }
}
