//! Schema assembly.
//!
//! Drives one generation pass: every entity is pushed through the
//! expression builder, unique-key combinator and relation resolver in a
//! fixed emission order, and the final document is assembled from the
//! import preamble, the enums recorded as used, the shared helpers, and the
//! accumulated per-entity text.

use tracing::{debug, trace};

use crate::generator::expression::ExpressionBuilder;
use crate::generator::relations;
use crate::generator::uniques::unique_combinations;
use crate::generator::{pascal, schema_ident, where_body_ident, GeneratorConfig, PassState};
use crate::model::{DataModel, Entity, Field};

/// Generates one TypeScript document of Zod schemas from a data model.
///
/// The pass is single-threaded and synchronous; processing order is
/// observable because later entities may reference earlier ones directly
/// instead of lazily.
#[derive(Debug)]
pub struct ZodGenerator<'a> {
    model: &'a DataModel,
    config: GeneratorConfig,
}

impl<'a> ZodGenerator<'a> {
    /// Create a generator with the default configuration.
    pub fn new(model: &'a DataModel) -> Self {
        Self {
            model,
            config: GeneratorConfig::default(),
        }
    }

    /// Create a generator with an explicit configuration.
    pub fn with_config(model: &'a DataModel, config: GeneratorConfig) -> Self {
        Self { model, config }
    }

    /// Run one generation pass and return the assembled document.
    pub fn generate(&self) -> String {
        debug!(
            entities = self.model.entities.len(),
            "starting generation pass"
        );
        let builder = ExpressionBuilder::new(self.model);
        let mut state = PassState::new();

        for entity in &self.model.entities {
            trace!(entity = %entity.name, "emitting entity block");
            self.emit_entity(entity, &builder, &mut state);
            state.mark_emitted(&entity.name);
        }

        self.assemble(state)
    }

    fn emit_entity(&self, entity: &Entity, builder: &ExpressionBuilder, state: &mut PassState) {
        let ind = self.config.indent.as_str();
        let name = &entity.name;
        let object_ident = schema_ident(name, "");
        let where_ident = schema_ident(name, "WhereInput");
        let unique_ident = schema_ident(name, "WhereUniqueInput");
        let include_ident = schema_ident(name, "Include");

        state.push(format!("// ----- {} -----", pascal(name)));
        state.blank();

        // object schema: scalar and enum fields
        let mut body = Vec::new();
        for field in entity.value_fields() {
            let expr = builder.field_expr(field, state);
            body.push(format!("{ind}{}: {expr},", field.name));
        }
        push_object(state, &format!("export const {object_ident} = "), body);
        state.blank();

        // filter predicate: lazy alias first, then the object body, so
        // self- and mutually-recursive references type-check
        state.push(format!(
            "export const {where_ident} = z.lazy(() => {});",
            where_body_ident(name)
        ));
        let mut body = Vec::new();
        for field in &entity.fields {
            if field.is_relation() {
                let fragment = relations::filter_fragment(field, name, state);
                body.push(format!("{ind}{}: {fragment}.optional(),", field.name));
            } else {
                let expr = builder.where_expr(field, state);
                body.push(format!("{ind}{}: {expr},", field.name));
            }
        }
        push_object(state, &format!("const {} = ", where_body_ident(name)), body);
        state.blank();

        // unique lookup: one intersection branch per combination
        let combos = unique_combinations(entity);
        if combos.is_empty() {
            state.push(format!("export const {unique_ident} = {where_ident};"));
        } else {
            let mut branches = Vec::new();
            for combo in &combos {
                let mut parts = Vec::new();
                for field in combo {
                    parts.push(format!("{}: {}", field.name, builder.lookup_expr(field, state)));
                }
                branches.push(format!(
                    "z.object({{ {} }}).and({where_ident})",
                    parts.join(", ")
                ));
            }
            if branches.len() == 1 {
                state.push(format!("export const {unique_ident} = {};", branches[0]));
            } else {
                state.push(format!("export const {unique_ident} = z.union(["));
                for branch in &branches {
                    state.push(format!("{ind}{branch},"));
                }
                state.push("]);");
            }
        }
        state.blank();

        // inclusion directive
        let mut body = Vec::new();
        for field in entity.relation_fields() {
            body.push(format!(
                "{ind}{}: {}.optional(),",
                field.name,
                relations::include_fragment()
            ));
        }
        if let Some(count) = relations::count_fragment(entity) {
            body.push(format!("{ind}_count: {count}.optional(),"));
        }
        push_object(state, &format!("export const {include_ident} = "), body);
        state.blank();

        // create input: object schema minus ids and foreign-key carriers,
        // extended with connect payloads per relation
        let create_ident = schema_ident(name, "CreateInput");
        let mut omitted = Vec::new();
        for field in entity.value_fields() {
            let carries_fk = entity
                .relation_fields()
                .any(|r| r.fk_fields().iter().any(|n| n == &field.name));
            if field.is_id || carries_fk {
                omitted.push(format!("{}: true", field.name));
            }
        }
        let omit_part = if omitted.is_empty() {
            String::new()
        } else {
            format!(".omit({{ {} }})", omitted.join(", "))
        };
        let rels: Vec<&Field> = entity.relation_fields().collect();
        if rels.is_empty() {
            state.push(format!(
                "export const {create_ident} = {object_ident}{omit_part};"
            ));
        } else {
            state.push(format!(
                "export const {create_ident} = {object_ident}{omit_part}.extend({{"
            ));
            for field in &rels {
                let fragment = relations::connect_fragment(field, name, state);
                state.push(format!(
                    "{ind}{}: {fragment}, // nested create deliberately omitted",
                    field.name
                ));
            }
            state.push("});");
        }
        state.blank();

        // update input: depth-one partial of the create input
        state.push(format!(
            "export const {} = {create_ident}.partial();",
            schema_ident(name, "UpdateInput")
        ));
        state.blank();

        // scalar field enum and order-by input
        let scalar_enum_ident = schema_ident(name, "ScalarFieldEnum");
        let field_names: Vec<String> = entity
            .value_fields()
            .map(|f| format!("\"{}\"", f.name))
            .collect();
        let has_value_fields = !field_names.is_empty();
        if has_value_fields {
            state.push(format!(
                "export const {scalar_enum_ident} = z.enum([{}]);",
                field_names.join(", ")
            ));
            state.blank();
        }

        let order_ident = schema_ident(name, "OrderByInput");
        let mut body = Vec::new();
        for field in entity.value_fields() {
            body.push(format!("{ind}{}: SortOrderSchema.optional(),", field.name));
        }
        push_object(state, &format!("export const {order_ident} = "), body);
        state.blank();

        // operation argument bundles
        state.push(format!(
            "export const {} = z.object({{",
            schema_ident(name, "FindManyArgs")
        ));
        state.push(format!("{ind}where: {where_ident}.optional(),"));
        state.push(format!(
            "{ind}orderBy: z.union([{order_ident}, z.array({order_ident})]).optional(),"
        ));
        state.push(format!("{ind}cursor: {unique_ident}.optional(),"));
        state.push(format!("{ind}take: z.number().int().optional(),"));
        state.push(format!("{ind}skip: z.number().int().optional(),"));
        if has_value_fields {
            state.push(format!(
                "{ind}distinct: z.array({scalar_enum_ident}).optional(),"
            ));
        }
        state.push(format!("{ind}include: {include_ident}.default({{}}),"));
        state.push("});");
        state.blank();

        state.push(format!(
            "export const {} = z.object({{",
            schema_ident(name, "FindUniqueArgs")
        ));
        state.push(format!("{ind}where: {unique_ident},"));
        state.push(format!("{ind}include: {include_ident}.optional(),"));
        state.push("});");
        state.blank();

        state.push(format!(
            "export const {} = z.object({{",
            schema_ident(name, "CreateArgs")
        ));
        state.push(format!("{ind}data: {create_ident},"));
        state.push("});");
        state.blank();

        state.push(format!(
            "export const {} = z.object({{",
            schema_ident(name, "UpdateArgs")
        ));
        state.push(format!("{ind}where: {unique_ident},"));
        state.push(format!(
            "{ind}data: {},",
            schema_ident(name, "UpdateInput")
        ));
        state.push("});");
        state.blank();

        state.push(format!(
            "export const {} = z.object({{",
            schema_ident(name, "DeleteArgs")
        ));
        state.push(format!("{ind}where: {unique_ident},"));
        state.push(format!("{ind}include: {include_ident}.optional(),"));
        state.push("});");
        state.blank();
    }

    fn assemble(&self, state: PassState) -> String {
        let ind = self.config.indent.as_str();
        let mut out: Vec<String> = Vec::new();

        out.push("// Generated by zod-modelgen. Do not edit.".to_string());
        if self.config.include_import {
            out.push("import { z } from 'zod';".to_string());
        }
        out.push(String::new());

        for name in state.used_enums() {
            if let Some(def) = self.model.enum_def(name) {
                let values: Vec<String> =
                    def.values.iter().map(|v| format!("\"{v}\"")).collect();
                out.push(format!(
                    "export const {} = z.enum([{}]);",
                    schema_ident(&def.name, ""),
                    values.join(", ")
                ));
            }
        }
        if !state.used_enums().is_empty() {
            out.push(String::new());
        }

        out.push("export const SortOrderSchema = z.enum([\"asc\", \"desc\"]);".to_string());
        out.push(String::new());

        out.push("const listRelationFilter = <T extends z.ZodTypeAny>(where: T) =>".to_string());
        out.push(format!("{ind}z.object({{"));
        out.push(format!("{ind}{ind}some: where.optional(),"));
        out.push(format!("{ind}{ind}every: where.optional(),"));
        out.push(format!("{ind}{ind}none: where.optional(),"));
        out.push(format!("{ind}}});"));
        out.push(String::new());

        out.push("const relationArgument = <T extends z.ZodTypeAny>(selector: T) =>".to_string());
        out.push(format!("{ind}z.union([z.boolean(), selector]);"));
        out.push(String::new());

        out.extend(state.into_lines());

        while out.last().map_or(false, |line| line.is_empty()) {
            out.pop();
        }
        let mut document = out.join("\n");
        document.push('\n');
        document
    }
}

/// Emit an object schema declaration, collapsing empty bodies to one line.
fn push_object(state: &mut PassState, decl: &str, body: Vec<String>) {
    if body.is_empty() {
        state.push(format!("{decl}z.object({{}});"));
    } else {
        state.push(format!("{decl}z.object({{"));
        for line in body {
            state.push(line);
        }
        state.push("});");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumDef, Field};

    fn single_entity_model(entity: Entity) -> DataModel {
        DataModel::new(vec![], vec![entity])
    }

    #[test]
    fn test_degenerate_lookup_aliases_filter() {
        let model = single_entity_model(Entity::new(
            "Log",
            vec![Field::scalar("line", "String")],
        ));
        let code = ZodGenerator::new(&model).generate();
        assert!(code.contains("export const LogWhereUniqueInputSchema = LogWhereInputSchema;"));
    }

    #[test]
    fn test_single_combination_has_no_union() {
        let model = single_entity_model(Entity::new(
            "User",
            vec![Field::scalar("id", "Int").with_id(true)],
        ));
        let code = ZodGenerator::new(&model).generate();
        assert!(code.contains(
            "export const UserWhereUniqueInputSchema = \
             z.object({ id: z.number().int() }).and(UserWhereInputSchema);"
        ));
        assert!(!code.contains("UserWhereUniqueInputSchema = z.union"));
    }

    #[test]
    fn test_empty_include_collapses() {
        let model = single_entity_model(Entity::new(
            "Log",
            vec![Field::scalar("line", "String")],
        ));
        let code = ZodGenerator::new(&model).generate();
        assert!(code.contains("export const LogIncludeSchema = z.object({});"));
    }

    #[test]
    fn test_entity_without_relations_creates_plain_input() {
        let model = single_entity_model(Entity::new(
            "Log",
            vec![
                Field::scalar("id", "Int").with_id(true),
                Field::scalar("line", "String"),
            ],
        ));
        let code = ZodGenerator::new(&model).generate();
        assert!(code.contains(
            "export const LogCreateInputSchema = LogSchema.omit({ id: true });"
        ));
        assert!(code.contains(
            "export const LogUpdateInputSchema = LogCreateInputSchema.partial();"
        ));
    }

    #[test]
    fn test_unused_enum_not_emitted() {
        let model = DataModel::new(
            vec![EnumDef::new("Role", vec!["ADMIN".to_string()])],
            vec![Entity::new("Log", vec![Field::scalar("line", "String")])],
        );
        let code = ZodGenerator::new(&model).generate();
        assert!(!code.contains("RoleSchema"));
    }

    #[test]
    fn test_import_can_be_suppressed() {
        let model = single_entity_model(Entity::new(
            "Log",
            vec![Field::scalar("line", "String")],
        ));
        let config = GeneratorConfig::new().with_import(false);
        let code = ZodGenerator::with_config(&model, config).generate();
        assert!(!code.contains("import { z } from 'zod';"));
    }
}
