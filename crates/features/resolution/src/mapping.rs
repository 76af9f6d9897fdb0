//! Platform-mapping selection and application.
//!
//! A mapping applies to a model when its mapping kind matches the model's
//! kind (the closed table on [`ModelKind::mapping_kind`]) and it declares a
//! reference to the model's identifier. The first match in mapping-resource
//! iteration order wins; at most one mapping is applied per model, and more
//! than one candidate is not an error.

use dhub_domain::document::{MappingDoc, ModelDocument, RuleTarget};
use dhub_domain::{ModelKind, ProjectedModel, Stereotype};

/// Selects the mapping for one resolved model, if any.
pub(crate) fn find_mapping<'a>(
    mappings: &[&'a MappingDoc],
    model: &ModelDocument,
) -> Option<&'a MappingDoc> {
    let target_kind = model.kind().mapping_kind()?;
    mappings
        .iter()
        .copied()
        .find(|mapping| {
            mapping.mapping_kind == target_kind && mapping.references.contains(model.id())
        })
}

/// Builds the bundle entry for one flattened model: tags it with the platform
/// key when one was requested, and applies the selected mapping's rules.
pub(crate) fn project(
    document: ModelDocument,
    mapping: Option<&MappingDoc>,
    platform: Option<&str>,
) -> ProjectedModel {
    debug_assert!(document.kind() != ModelKind::Mapping, "mappings are never bundle entries");

    let mut projected = ProjectedModel::unmapped(document, platform.map(str::to_owned));

    if let Some(mapping) = mapping {
        projected.applied_mapping = Some(mapping.id.clone());
        for rule in &mapping.rules {
            let stereotype =
                Stereotype { name: rule.stereotype.clone(), attributes: rule.attributes.clone() };
            match &rule.target {
                RuleTarget::Model => projected.stereotypes.push(stereotype),
                RuleTarget::Property { name } | RuleTarget::Operation { name } => {
                    projected.member_stereotypes.entry(name.clone()).or_default().push(stereotype);
                },
            }
        }
    }

    projected
}
