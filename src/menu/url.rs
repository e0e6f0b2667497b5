//! menu::url
//!
//! Pipeline URLs for the current context.

use crate::host::{EntityRef, PipelineContext, SceneSnapshot};

/// Metadata key holding an asset's pipeline URL.
pub const URL_KEY: &str = "url";

/// Detail page of an entity on the pipeline site.
pub fn entity_url(site_url: &str, entity: &EntityRef) -> String {
    format!(
        "{}/detail/{}/{}",
        site_url.trim_end_matches('/'),
        entity.entity_type,
        entity.id
    )
}

/// URL of the context itself, without selection overrides.
///
/// An explicit context URL wins; otherwise the entity (or project) detail
/// page on `site_url`.
pub fn base_context_url(context: &PipelineContext, site_url: Option<&str>) -> Option<String> {
    if let Some(url) = &context.site_url {
        return Some(url.clone());
    }
    let site = site_url?;
    match context.entity.as_ref().or(context.project.as_ref()) {
        Some(entity) => Some(entity_url(site, entity)),
        None => Some(site.trim_end_matches('/').to_string()),
    }
}

/// URL for the context, overridden by the first selected asset's url tag.
pub fn context_url(scene: &SceneSnapshot, site_url: Option<&str>, url_tag: &str) -> Option<String> {
    let selected = scene
        .first_selected()
        .and_then(|asset| asset.metadata.get(url_tag))
        .filter(|value| !value.is_empty());

    match selected {
        Some(url) => Some(url.clone()),
        None => base_context_url(&scene.context, site_url),
    }
}

/// Entity type and id from a `.../detail/<Type>/<id>` URL.
pub fn entity_from_url(url: &str) -> Option<(String, i64)> {
    let tokens: Vec<&str> = url.split('/').collect();
    if tokens.len() <= 3 {
        return None;
    }
    let n = tokens.len();
    if tokens[n - 3] != "detail" {
        return None;
    }
    let id = tokens[n - 1].parse::<i64>().ok()?;
    Some((tokens[n - 2].to_string(), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AssetRecord;
    use std::collections::BTreeMap;

    fn shot() -> EntityRef {
        EntityRef {
            entity_type: "Shot".into(),
            id: 1234,
            name: None,
        }
    }

    #[test]
    fn parses_detail_urls() {
        assert_eq!(
            entity_from_url("https://studio.example.com/detail/Shot/1234"),
            Some(("Shot".to_string(), 1234))
        );
        assert_eq!(entity_from_url("https://studio.example.com/detail/Shot/abc"), None);
        assert_eq!(entity_from_url("https://studio.example.com/page/Shot/12"), None);
        assert_eq!(entity_from_url("detail/Shot/12"), None);
        assert_eq!(entity_from_url(""), None);
    }

    #[test]
    fn context_url_from_entity() {
        let context = PipelineContext {
            entity: Some(shot()),
            ..Default::default()
        };
        assert_eq!(
            base_context_url(&context, Some("https://studio.example.com/")),
            Some("https://studio.example.com/detail/Shot/1234".to_string())
        );
        assert_eq!(base_context_url(&context, None), None);
    }

    #[test]
    fn selected_asset_url_overrides() {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "SG.url".to_string(),
            "https://studio.example.com/detail/Asset/77".to_string(),
        );
        let scene = SceneSnapshot {
            context: PipelineContext {
                entity: Some(shot()),
                ..Default::default()
            },
            assets: vec![AssetRecord {
                path: "/Game/Chair".into(),
                class: "StaticMesh".into(),
                metadata,
            }],
            selected_assets: vec!["/Game/Chair".into()],
            ..Default::default()
        };

        let url = context_url(&scene, Some("https://studio.example.com"), "SG.url").unwrap();
        assert_eq!(url, "https://studio.example.com/detail/Asset/77");
        assert_eq!(entity_from_url(&url), Some(("Asset".to_string(), 77)));
    }
}
