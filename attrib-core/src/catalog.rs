//! Explainer catalog: construction profile and modality support per kind.
//!
//! Definitions are registered once at startup and read-only thereafter; the
//! recommender filters on declared modality support and the explainer
//! factory dispatches on the registered construction profile.

use crate::error::ConfigError;
use crate::explainer::{ConstructionProfile, ExplainerKind};
use crate::modality::Modality;
use std::collections::HashMap;
use tracing::debug;

/// Registered definition of an explainer kind.
#[derive(Debug, Clone)]
pub struct ExplainerDef {
    pub kind: ExplainerKind,
    pub profile: ConstructionProfile,
    pub modalities: &'static [Modality],
}

impl ExplainerDef {
    pub fn supports(&self, modality: Modality) -> bool {
        self.modalities.contains(&modality)
    }
}

/// The catalog holds all registered explainer definitions in registration
/// order.
pub struct ExplainerCatalog {
    defs: Vec<ExplainerDef>,
    index: HashMap<ExplainerKind, usize>,
}

const ALL_MODALITIES: &[Modality] = &[Modality::Image, Modality::Tabular, Modality::Text];
const IMAGE_ONLY: &[Modality] = &[Modality::Image];
const IMAGE_AND_TEXT: &[Modality] = &[Modality::Image, Modality::Text];

impl ExplainerCatalog {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The built-in catalog covering every known explainer kind.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let builtin = [
            (ExplainerKind::GradCam, ConstructionProfile::ModelOnly, IMAGE_ONLY),
            (ExplainerKind::GuidedGradCam, ConstructionProfile::ModelOnly, IMAGE_ONLY),
            (ExplainerKind::AttentionRollout, ConstructionProfile::ForwardArgs, IMAGE_AND_TEXT),
            (
                ExplainerKind::TransformerAttribution,
                ConstructionProfile::ForwardArgs,
                IMAGE_AND_TEXT,
            ),
            (ExplainerKind::Lime, ConstructionProfile::SurrogateSampling, ALL_MODALITIES),
            (ExplainerKind::KernelShap, ConstructionProfile::SurrogateSampling, ALL_MODALITIES),
            (ExplainerKind::Gradient, ConstructionProfile::LayerAndForwardArgs, ALL_MODALITIES),
            (
                ExplainerKind::GradientXInput,
                ConstructionProfile::LayerAndForwardArgs,
                ALL_MODALITIES,
            ),
            (ExplainerKind::SmoothGrad, ConstructionProfile::LayerAndForwardArgs, ALL_MODALITIES),
            (ExplainerKind::VarGrad, ConstructionProfile::LayerAndForwardArgs, ALL_MODALITIES),
            (
                ExplainerKind::IntegratedGradients,
                ConstructionProfile::LayerAndForwardArgs,
                ALL_MODALITIES,
            ),
            (ExplainerKind::LrpEpsilon, ConstructionProfile::LayerAndForwardArgs, IMAGE_AND_TEXT),
        ];
        for (kind, profile, modalities) in builtin {
            // Built-in kinds are distinct; registration cannot collide.
            let _ = catalog.register(ExplainerDef {
                kind,
                profile,
                modalities,
            });
        }
        catalog
    }

    /// Register a definition. Returns an error if the kind is already
    /// registered.
    pub fn register(&mut self, def: ExplainerDef) -> Result<(), ConfigError> {
        if self.index.contains_key(&def.kind) {
            return Err(ConfigError::AlreadyRegistered {
                name: def.kind.to_string(),
            });
        }
        debug!(explainer = %def.kind, profile = ?def.profile, "Registering explainer");
        self.index.insert(def.kind, self.defs.len());
        self.defs.push(def);
        Ok(())
    }

    pub fn get(&self, kind: ExplainerKind) -> Option<&ExplainerDef> {
        self.index.get(&kind).map(|&i| &self.defs[i])
    }

    /// Construction profile for a kind. Unregistered kinds fall back to the
    /// default layer-dependent path.
    pub fn profile(&self, kind: ExplainerKind) -> ConstructionProfile {
        self.get(kind)
            .map(|def| def.profile)
            .unwrap_or(ConstructionProfile::LayerAndForwardArgs)
    }

    /// Definitions supporting every listed modality, in registration order.
    pub fn supporting_all<'a>(
        &'a self,
        modalities: &'a [Modality],
    ) -> impl Iterator<Item = &'a ExplainerDef> {
        self.defs
            .iter()
            .filter(move |def| modalities.iter().all(|&m| def.supports(m)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplainerDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for ExplainerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_covers_all_kinds() {
        let catalog = ExplainerCatalog::builtin();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.get(ExplainerKind::GradCam).is_some());
        assert!(catalog.get(ExplainerKind::Lime).is_some());
    }

    #[test]
    fn test_profiles_resolved_at_registration() {
        let catalog = ExplainerCatalog::builtin();
        assert_eq!(
            catalog.profile(ExplainerKind::GradCam),
            ConstructionProfile::ModelOnly
        );
        assert_eq!(
            catalog.profile(ExplainerKind::AttentionRollout),
            ConstructionProfile::ForwardArgs
        );
        assert_eq!(
            catalog.profile(ExplainerKind::Lime),
            ConstructionProfile::SurrogateSampling
        );
        assert_eq!(
            catalog.profile(ExplainerKind::IntegratedGradients),
            ConstructionProfile::LayerAndForwardArgs
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = ExplainerCatalog::builtin();
        let result = catalog.register(ExplainerDef {
            kind: ExplainerKind::GradCam,
            profile: ConstructionProfile::ModelOnly,
            modalities: IMAGE_ONLY,
        });
        match result.unwrap_err() {
            ConfigError::AlreadyRegistered { name } => assert_eq!(name, "grad_cam"),
            e => panic!("Expected AlreadyRegistered, got: {:?}", e),
        }
    }

    #[test]
    fn test_supporting_all_filters_by_modality() {
        let catalog = ExplainerCatalog::builtin();
        let image: Vec<ExplainerKind> = catalog
            .supporting_all(&[Modality::Image])
            .map(|d| d.kind)
            .collect();
        assert!(image.contains(&ExplainerKind::GradCam));

        let tabular: Vec<ExplainerKind> = catalog
            .supporting_all(&[Modality::Tabular])
            .map(|d| d.kind)
            .collect();
        assert!(!tabular.contains(&ExplainerKind::GradCam));
        assert!(tabular.contains(&ExplainerKind::Lime));

        // Composite: must support every listed modality.
        let image_text: Vec<ExplainerKind> = catalog
            .supporting_all(&[Modality::Image, Modality::Text])
            .map(|d| d.kind)
            .collect();
        assert!(image_text.contains(&ExplainerKind::AttentionRollout));
        assert!(!image_text.contains(&ExplainerKind::GradCam));
    }
}
