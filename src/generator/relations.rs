//! Relation and cross-reference resolution.
//!
//! Entity schemas are mutually recursive through their relations, so a
//! cross-entity reference must not force eager recursion at schema
//! construction time. A reference is deferred behind `z.lazy(() => ...)`
//! whenever the target is the entity currently being built or has not yet
//! been emitted in this pass; otherwise the direct identifier is safe.

use crate::generator::{schema_ident, PassState};
use crate::model::{Entity, Field};

/// Wrap an identifier lazily unless the target entity is already emitted
/// and is not the entity currently being built.
fn deferred(ident: String, target: &str, owner: &str, state: &PassState) -> String {
    if target == owner || !state.is_emitted(target) {
        format!("z.lazy(() => {ident})")
    } else {
        ident
    }
}

/// Reference to the target entity's filter-predicate schema.
pub(crate) fn where_ref(target: &str, owner: &str, state: &PassState) -> String {
    deferred(schema_ident(target, "WhereInput"), target, owner, state)
}

/// Reference to the target entity's unique-lookup schema.
pub(crate) fn unique_ref(target: &str, owner: &str, state: &PassState) -> String {
    deferred(schema_ident(target, "WhereUniqueInput"), target, owner, state)
}

/// Filter-predicate fragment for a relation field: list relations wrap the
/// related filter in the some/every/none combinator, singular relations
/// reference it directly. The caller appends `.optional()`.
pub(crate) fn filter_fragment(field: &Field, owner: &str, state: &PassState) -> String {
    let reference = where_ref(&field.type_name, owner, state);
    if field.is_list {
        format!("listRelationFilter({reference})")
    } else {
        reference
    }
}

/// Inclusion-directive fragment: a boolean flag or a detailed selector
/// (reserved for future nested-argument support).
pub(crate) fn include_fragment() -> String {
    "relationArgument(z.object({}).passthrough())".to_string()
}

/// Aggregate count selector covering every list relation of the entity,
/// when it has any.
pub(crate) fn count_fragment(entity: &Entity) -> Option<String> {
    let selects: Vec<String> = entity
        .relation_fields()
        .filter(|f| f.is_list)
        .map(|f| format!("{}: z.boolean().optional()", f.name))
        .collect();
    if selects.is_empty() {
        return None;
    }
    Some(format!(
        "relationArgument(z.object({{ select: z.object({{ {} }}) }}))",
        selects.join(", ")
    ))
}

/// Create-payload fragment for a relation field: a connect-by-unique-key
/// reference, accepting one or an array of references for list relations.
/// Nested create payloads are deliberately not emitted; they would
/// reintroduce the owning entity as a nested target.
pub(crate) fn connect_fragment(field: &Field, owner: &str, state: &PassState) -> String {
    let unique = unique_ref(&field.type_name, owner, state);
    let connect = if field.is_list {
        format!("z.union([{unique}, z.array({unique})])")
    } else {
        unique
    };
    let mut fragment = format!("z.object({{ connect: {connect} }})");
    if field.is_list || !field.is_required || field.has_default {
        fragment.push_str(".optional()");
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(names: &[&str]) -> PassState {
        let mut state = PassState::new();
        for name in names {
            state.mark_emitted(name);
        }
        state
    }

    #[test]
    fn test_forward_reference_is_deferred() {
        let state = PassState::new();
        assert_eq!(
            where_ref("Post", "User", &state),
            "z.lazy(() => PostWhereInputSchema)"
        );
    }

    #[test]
    fn test_emitted_reference_is_direct() {
        let state = emitted(&["Post"]);
        assert_eq!(where_ref("Post", "User", &state), "PostWhereInputSchema");
    }

    #[test]
    fn test_self_reference_is_always_deferred() {
        // even once emitted, a self reference stays lazy
        let state = emitted(&["Category"]);
        assert_eq!(
            where_ref("Category", "Category", &state),
            "z.lazy(() => CategoryWhereInputSchema)"
        );
    }

    #[test]
    fn test_list_filter_uses_combinator() {
        let state = emitted(&["Post"]);
        let field = Field::relation("posts", "Post", vec![]).with_list(true);
        assert_eq!(
            filter_fragment(&field, "User", &state),
            "listRelationFilter(PostWhereInputSchema)"
        );
    }

    #[test]
    fn test_singular_filter_references_directly() {
        let state = emitted(&["User"]);
        let field = Field::relation("author", "User", vec!["authorId".to_string()]);
        assert_eq!(filter_fragment(&field, "Post", &state), "UserWhereInputSchema");
    }

    #[test]
    fn test_connect_singular_required() {
        let state = emitted(&["User"]);
        let field = Field::relation("author", "User", vec!["authorId".to_string()]);
        assert_eq!(
            connect_fragment(&field, "Post", &state),
            "z.object({ connect: UserWhereUniqueInputSchema })"
        );
    }

    #[test]
    fn test_connect_singular_optional() {
        let state = emitted(&["User"]);
        let field = Field::relation("reviewer", "User", vec![]).with_required(false);
        assert_eq!(
            connect_fragment(&field, "Post", &state),
            "z.object({ connect: UserWhereUniqueInputSchema }).optional()"
        );
    }

    #[test]
    fn test_connect_list_accepts_one_or_many() {
        let state = PassState::new();
        let field = Field::relation("posts", "Post", vec![]).with_list(true);
        assert_eq!(
            connect_fragment(&field, "User", &state),
            "z.object({ connect: z.union([z.lazy(() => PostWhereUniqueInputSchema), \
             z.array(z.lazy(() => PostWhereUniqueInputSchema))]) }).optional()"
        );
    }

    #[test]
    fn test_count_fragment_covers_list_relations() {
        let entity = Entity::new(
            "User",
            vec![
                Field::relation("posts", "Post", vec![]).with_list(true),
                Field::relation("likes", "Like", vec![]).with_list(true),
                Field::relation("profile", "Profile", vec![]),
            ],
        );
        assert_eq!(
            count_fragment(&entity).unwrap(),
            "relationArgument(z.object({ select: z.object({ \
             posts: z.boolean().optional(), likes: z.boolean().optional() }) }))"
        );
    }

    #[test]
    fn test_count_fragment_absent_without_list_relations() {
        let entity = Entity::new(
            "Post",
            vec![Field::relation("author", "User", vec!["authorId".to_string()])],
        );
        assert!(count_fragment(&entity).is_none());
    }
}
