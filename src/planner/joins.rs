//! Join collection for field paths
//!
//! Every resolved field path contributes the association joins leading to it,
//! plus translation joins when the field is translated. Joins are keyed by
//! alias, so two paths sharing a prefix share its joins.

use std::collections::HashSet;

use crate::criteria::Context;
use crate::definition::{AssociationKind, EntityDefinition};
use crate::plan::{Column, Expr, Join, Params, PlanNode, Scan};
use crate::resolver::{JoinStep, ResolvedField};

pub(crate) const LANGUAGE_PARAM: &str = "languageUuid";
pub(crate) const FALLBACK_LANGUAGE_PARAM: &str = "fallbackLanguageUuid";

/// Alias of the translation join of a table alias
pub(crate) fn translation_alias(alias: &str) -> String {
    format!("{}.translation", alias)
}

/// Alias of the fallback-language translation join of a table alias
pub(crate) fn fallback_alias(alias: &str) -> String {
    format!("{}.translation.fallback", alias)
}

/// Scan of an entity's root table, aliased by the entity name
pub(crate) fn root_scan(root: &EntityDefinition) -> PlanNode {
    PlanNode::Scan(Scan::new(root.table_name()).with_alias(&root.name))
}

/// Primary key column of the root entity
pub(crate) fn root_key(root: &EntityDefinition) -> Expr {
    Expr::column(&root.name, &root.primary_key)
}

/// Collects LEFT JOINs in dependency order, deduplicated by alias
pub(crate) struct JoinBuilder<'c> {
    context: &'c Context,
    joins: Vec<(Scan, Expr)>,
    aliases: HashSet<String>,
}

impl<'c> JoinBuilder<'c> {
    pub fn new(context: &'c Context) -> Self {
        Self {
            context,
            joins: Vec::new(),
            aliases: HashSet::new(),
        }
    }

    pub fn context(&self) -> &'c Context {
        self.context
    }

    /// Add the joins needed to read a resolved field
    pub fn add_path(&mut self, field: &ResolvedField<'_>, params: &mut Params) {
        for step in &field.steps {
            self.add_step(step);
        }
        if field.is_translated() {
            self.add_translation(field.entity, &field.alias, params);
        }
    }

    /// Expression reading a resolved field, through its translation joins if needed
    pub fn field_expr(&self, field: &ResolvedField<'_>) -> Expr {
        let column = field.field.column_name();
        let read = |table: String| match &field.json_path {
            Some(path) => Expr::JsonExtract {
                column: Column::new(table, &column),
                path: path.clone(),
            },
            None => Expr::Column(Column::new(table, &column)),
        };

        if !field.is_translated() {
            return read(field.alias.clone());
        }
        let primary = read(translation_alias(&field.alias));
        match self.context.effective_fallback() {
            Some(_) => Expr::Coalesce(vec![primary, read(fallback_alias(&field.alias))]),
            None => primary,
        }
    }

    /// Wrap `base` in the collected joins
    pub fn build(self, base: PlanNode) -> PlanNode {
        self.joins.into_iter().fold(base, |left, (right, condition)| {
            PlanNode::Join(Join {
                left: Box::new(left),
                right,
                condition,
            })
        })
    }

    fn push(&mut self, scan: Scan, condition: Expr) {
        let alias = scan.reference_name().to_string();
        if self.aliases.insert(alias) {
            self.joins.push((scan, condition));
        }
    }

    fn add_step(&mut self, step: &JoinStep<'_>) {
        if self.aliases.contains(&step.alias) {
            return;
        }
        let target = step.to_entity;
        let target_table = Scan::new(target.table_name()).with_alias(&step.alias);

        match &step.association.kind {
            AssociationKind::ManyToOne { local_column } => {
                let condition = Expr::eq(
                    Expr::column(&step.alias, &target.primary_key),
                    Expr::column(&step.from_alias, local_column),
                );
                self.push(target_table, condition);
            }
            AssociationKind::OneToMany { foreign_key } => {
                let condition = Expr::eq(
                    Expr::column(&step.alias, foreign_key),
                    Expr::column(&step.from_alias, &step.from_entity.primary_key),
                );
                self.push(target_table, condition);
            }
            AssociationKind::ManyToMany { mapping, local_column, reference_column } => {
                let mapping_alias = format!("{}.mapping", step.alias);
                let mapping_condition = Expr::eq(
                    Expr::column(&mapping_alias, local_column),
                    Expr::column(&step.from_alias, &step.from_entity.primary_key),
                );
                self.push(Scan::new(mapping).with_alias(&mapping_alias), mapping_condition);

                let condition = Expr::eq(
                    Expr::column(&step.alias, &target.primary_key),
                    Expr::column(&mapping_alias, reference_column),
                );
                self.push(target_table, condition);
            }
        }
    }

    fn add_translation(&mut self, entity: &EntityDefinition, alias: &str, params: &mut Params) {
        let language = params.bind_named(LANGUAGE_PARAM, self.context.language_uuid.clone().into());
        self.push_translation(entity, alias, translation_alias(alias), language);

        if let Some(fallback) = self.context.effective_fallback() {
            let fallback = params.bind_named(FALLBACK_LANGUAGE_PARAM, fallback.into());
            self.push_translation(entity, alias, fallback_alias(alias), fallback);
        }
    }

    fn push_translation(&mut self, entity: &EntityDefinition, alias: &str, join_alias: String, language: Expr) {
        let condition = Expr::And(vec![
            Expr::eq(
                Expr::column(&join_alias, entity.translation_foreign_key()),
                Expr::column(alias, &entity.primary_key),
            ),
            Expr::eq(Expr::column(&join_alias, "language_uuid"), language),
        ]);
        self.push(Scan::new(entity.translation_table()).with_alias(join_alias), condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::resolver::resolve_field;

    const SCHEMA: &str = r#"
entities:
  - name: product
    fields:
      - { name: id, column: uuid }
      - { name: name, translated: true }
    associations:
      - { name: categories, reference: category, kind: many_to_many, mapping: product_category, localColumn: product_uuid, referenceColumn: category_uuid }
      - { name: manufacturer, reference: manufacturer, kind: many_to_one, localColumn: manufacturer_uuid }
  - name: category
    fields:
      - { name: id, column: uuid }
      - { name: name, translated: true }
  - name: manufacturer
    fields:
      - { name: id, column: uuid }
"#;

    fn aliases(node: &PlanNode) -> Vec<String> {
        match node {
            PlanNode::Join(join) => {
                let mut out = aliases(&join.left);
                out.push(join.right.reference_name().to_string());
                out
            }
            _ => vec![],
        }
    }

    #[test]
    fn test_many_to_many_joins_mapping_first() {
        let schema = parse_str(SCHEMA).unwrap();
        let product = schema.get_entity("product").unwrap();
        let context = Context::default();
        let mut params = Params::new();
        let mut joins = JoinBuilder::new(&context);

        let name = resolve_field(&schema, product, "categories.name").unwrap();
        let id = resolve_field(&schema, product, "categories.id").unwrap();
        joins.add_path(&name, &mut params);
        joins.add_path(&id, &mut params);

        let plan = joins.build(root_scan(product));
        assert_eq!(
            aliases(&plan),
            vec![
                "product.categories.mapping",
                "product.categories",
                "product.categories.translation",
            ]
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_translated_field_reads_fallback() {
        let schema = parse_str(SCHEMA).unwrap();
        let product = schema.get_entity("product").unwrap();
        let context = Context::new("de").with_fallback("en");
        let mut params = Params::new();
        let mut joins = JoinBuilder::new(&context);

        let name = resolve_field(&schema, product, "name").unwrap();
        joins.add_path(&name, &mut params);

        assert!(matches!(joins.field_expr(&name), Expr::Coalesce(ref args) if args.len() == 2));
        assert_eq!(params.get(LANGUAGE_PARAM), Some(&"de".into()));
        assert_eq!(params.get(FALLBACK_LANGUAGE_PARAM), Some(&"en".into()));
        assert_eq!(
            aliases(&joins.build(root_scan(product))),
            vec!["product.translation", "product.translation.fallback"]
        );
    }

    #[test]
    fn test_to_one_field_has_no_translation() {
        let schema = parse_str(SCHEMA).unwrap();
        let product = schema.get_entity("product").unwrap();
        let context = Context::default();
        let mut params = Params::new();
        let mut joins = JoinBuilder::new(&context);

        let id = resolve_field(&schema, product, "manufacturer.id").unwrap();
        joins.add_path(&id, &mut params);

        assert!(params.is_empty());
        assert!(matches!(
            joins.field_expr(&id),
            Expr::Column(ref c) if c.table == "product.manufacturer" && c.name == "uuid"
        ));
    }
}
