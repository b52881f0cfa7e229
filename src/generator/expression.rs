//! Per-field expression building.
//!
//! Maps one scalar or enum field to its final validation expression through
//! an ordered pipeline: override extraction, normalization, default type
//! mapping, list wrapping, then the nullable/optional trailing modifiers.
//! Wrapping happens before the modifiers so they apply to the whole
//! (possibly array) expression.

use crate::expr::ZodExpr;
use crate::generator::{schema_ident, PassState};
use crate::model::{DataModel, Field, FieldKind};

/// Documentation prefix that marks an author override expression.
const OVERRIDE_MARKER: &str = "@zod";

/// Builds validation expressions for the fields of one model.
pub(crate) struct ExpressionBuilder<'a> {
    model: &'a DataModel,
}

impl<'a> ExpressionBuilder<'a> {
    pub fn new(model: &'a DataModel) -> Self {
        Self { model }
    }

    /// Full pipeline: base expression, list wrapping, nullability,
    /// optionality.
    pub fn field_expr(&self, field: &Field, state: &mut PassState) -> ZodExpr {
        let mut expr = self.lookup_expr(field, state);

        if !field.is_list
            && !field.is_required
            && !expr.has_call("nullable")
            && !expr.has_call("nullish")
        {
            expr.push_call("nullable");
        }

        if (!field.is_required || field.has_default)
            && !expr.has_call("optional")
            && !expr.has_call("nullish")
        {
            expr.push_call("optional");
        }

        expr
    }

    /// Lookup form: base expression plus list wrapping, without the
    /// nullable/optional modifiers. Used by unique-lookup branches.
    pub fn lookup_expr(&self, field: &Field, state: &mut PassState) -> ZodExpr {
        let mut expr = self.base_expr(field, state);
        if field.is_list && !expr.is_array() {
            expr.push_call("array");
        }
        expr
    }

    /// Filter form: lookup expression made optional, for filter-predicate
    /// object bodies.
    pub fn where_expr(&self, field: &Field, state: &mut PassState) -> ZodExpr {
        let mut expr = self.lookup_expr(field, state);
        if !expr.has_call("optional") && !expr.has_call("nullish") {
            expr.push_call("optional");
        }
        expr
    }

    fn base_expr(&self, field: &Field, state: &mut PassState) -> ZodExpr {
        if let Some(doc) = &field.documentation {
            if let Some(mut expr) = override_expr(doc) {
                expr.normalize();
                return expr;
            }
        }

        let mut expr = match &field.kind {
            FieldKind::Scalar => scalar_expr(&field.type_name),
            FieldKind::Enum => match self.model.enum_def(&field.type_name) {
                Some(def) if !def.values.is_empty() => {
                    state.record_enum(&def.name);
                    ZodExpr::raw(schema_ident(&def.name, ""))
                }
                // unknown or empty enum: fall back to a plain string
                _ => ZodExpr::primitive("string"),
            },
            FieldKind::Relation { .. } => ZodExpr::primitive("any"),
        };
        expr.normalize();
        expr
    }
}

/// Fixed scalar type table. Unmapped types accept anything.
fn scalar_expr(type_name: &str) -> ZodExpr {
    match type_name {
        "String" => ZodExpr::primitive("string"),
        "Int" => ZodExpr::primitive("number").with_call("int"),
        "BigInt" => ZodExpr::primitive("bigint"),
        "Float" | "Decimal" => ZodExpr::primitive("number"),
        "Boolean" => ZodExpr::primitive("boolean"),
        "DateTime" => ZodExpr::primitive("date"),
        "Json" => ZodExpr::primitive("any"),
        "Bytes" => ZodExpr::primitive_with_arg("instanceof", "Uint8Array"),
        _ => ZodExpr::primitive("any"),
    }
}

/// Extract an override expression from a documentation string.
///
/// Documentation that does not begin with the marker is ordinary prose and
/// is ignored. `use(...)` passes its content through literally; any other
/// remainder is a dot-chain, prefixed with the `z` namespace unless already
/// so prefixed.
fn override_expr(doc: &str) -> Option<ZodExpr> {
    let rest = doc.trim().strip_prefix(OVERRIDE_MARKER)?.trim();
    if rest.is_empty() {
        return None;
    }

    let text = if let Some(inner) = rest
        .strip_prefix("use(")
        .and_then(|r| r.strip_suffix(')'))
    {
        inner.trim().to_string()
    } else if rest == "z" || rest.starts_with("z.") {
        rest.to_string()
    } else if rest.starts_with('.') {
        format!("z{rest}")
    } else {
        format!("z.{rest}")
    };

    Some(ZodExpr::parse(&text))
}
