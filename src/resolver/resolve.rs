use crate::definition::{EntityDefinition, Schema};
use super::error::ResolveError;
use super::types::{JoinStep, ResolvedField};

/// Resolve a field path against a root entity
///
/// The path is a dot-separated list of association names ending in a field
/// name, optionally prefixed with the root entity name:
///
/// - `taxRate` / `tax.taxRate` → field on the root table
/// - `product.categories.name` → join `product.categories`, field `name` of `category`
/// - `price.gross` → accessor `gross` into the JSON field `price`
/// - `product.categories` → identifier field of `category`
pub fn resolve_field<'a>(
    schema: &'a Schema,
    root: &'a EntityDefinition,
    path: &str,
) -> Result<ResolvedField<'a>, ResolveError> {
    if path.is_empty() {
        return Err(ResolveError::EmptyPath);
    }

    // The root prefix is optional, unless the root has a field or association of the same name
    let trimmed = match path.strip_prefix(&root.name).and_then(|rest| rest.strip_prefix('.')) {
        Some(rest) if root.get_field(&root.name).is_none() && root.get_association(&root.name).is_none() => rest,
        _ => path,
    };

    let segments: Vec<&str> = trimmed.split('.').collect();
    let mut entity = root;
    let mut alias = root.name.clone();
    let mut steps: Vec<JoinStep<'a>> = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        if let Some(association) = entity.get_association(segment) {
            let target = schema.get_entity(&association.reference).ok_or_else(|| {
                ResolveError::UnknownReference {
                    entity: entity.name.clone(),
                    association: association.name.clone(),
                    reference: association.reference.clone(),
                }
            })?;
            let step_alias = format!("{}.{}", alias, association.name);
            steps.push(JoinStep {
                association,
                from_entity: entity,
                to_entity: target,
                from_alias: alias,
                alias: step_alias.clone(),
            });
            entity = target;
            alias = step_alias;
            continue;
        }

        let field = entity.get_field(segment).ok_or_else(|| ResolveError::FieldNotFound {
            entity: entity.name.clone(),
            field: segment.to_string(),
        })?;

        let rest = &segments[idx + 1..];
        let json_path = if rest.is_empty() {
            None
        } else if field.data_type.is_json() {
            Some(validate_json_path(path, rest)?)
        } else {
            return Err(ResolveError::NotTraversable {
                path: path.to_string(),
                field: field.name.clone(),
            });
        };

        return Ok(ResolvedField {
            path: path.to_string(),
            steps,
            entity,
            alias,
            field,
            json_path,
        });
    }

    // Path ended on an association: use the referenced identifier
    let field = entity
        .identifier_field()
        .ok_or_else(|| ResolveError::MissingIdentifier(entity.name.clone()))?;

    Ok(ResolvedField {
        path: path.to_string(),
        steps,
        entity,
        alias,
        field,
        json_path: None,
    })
}

fn validate_json_path(path: &str, accessors: &[&str]) -> Result<String, ResolveError> {
    for accessor in accessors {
        let valid = !accessor.is_empty()
            && accessor.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(ResolveError::InvalidJsonPath {
                path: path.to_string(),
                accessor: accessor.to_string(),
            });
        }
    }
    Ok(accessors.join("."))
}
