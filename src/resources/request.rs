//! # Load request template and family-specific load options.
//!
//! [`LoadRequest`] is handed verbatim to every load of a component.
//! [`LoadTarget`] bundles it with the identity and the family options
//! (orientation for single-slot resources, size for persistent ones).

use std::collections::BTreeMap;

use super::key::{ResourceKey, ResourceKind};

/// Request template passed to every [`Provider::load`](crate::Provider::load) call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadRequest {
    /// Targeting keywords.
    pub keywords: Vec<String>,
    /// URL of the content the unit will be shown next to.
    pub content_url: Option<String>,
    /// Request non-personalized content.
    pub non_personalized: bool,
    /// Provider-specific extras.
    pub extras: BTreeMap<String, String>,
}

impl LoadRequest {
    /// Returns a new request with an additional keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Returns a new request with the content url set.
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = Some(url.into());
        self
    }

    /// Returns a new request with an extra key/value pair.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Returns a new request asking for non-personalized content.
    pub fn non_personalized(mut self) -> Self {
        self.non_personalized = true;
        self
    }
}

/// Screen orientation a single-slot unit is loaded for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Size of a persistent unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitSize {
    /// 320x50.
    #[default]
    Banner,
    /// 320x100.
    LargeBanner,
    /// 300x250.
    MediumRectangle,
    /// Full width, height chosen by the provider.
    Adaptive { width: u32 },
    /// Explicit dimensions.
    Custom { width: u32, height: u32 },
}

impl UnitSize {
    /// Returns `(width, height)`; `height` is `None` when the provider decides it.
    pub fn dimensions(&self) -> (u32, Option<u32>) {
        match *self {
            UnitSize::Banner => (320, Some(50)),
            UnitSize::LargeBanner => (320, Some(100)),
            UnitSize::MediumRectangle => (300, Some(250)),
            UnitSize::Adaptive { width } => (width, None),
            UnitSize::Custom { width, height } => (width, Some(height)),
        }
    }
}

/// Everything a provider needs to load one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTarget {
    /// Family of the unit.
    pub kind: ResourceKind,
    /// External resource id.
    pub key: ResourceKey,
    /// Request template.
    pub request: LoadRequest,
    /// Set for [`ResourceKind::AppOpen`].
    pub orientation: Option<Orientation>,
    /// Set for [`ResourceKind::Banner`].
    pub size: Option<UnitSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let req = LoadRequest::default()
            .with_keyword("games")
            .with_content_url("https://example.com/a")
            .with_extra("collapsible", "bottom")
            .non_personalized();
        assert_eq!(req.keywords, vec!["games".to_string()]);
        assert_eq!(req.content_url.as_deref(), Some("https://example.com/a"));
        assert_eq!(req.extras.get("collapsible").map(String::as_str), Some("bottom"));
        assert!(req.non_personalized);
    }

    #[test]
    fn test_size_dimensions() {
        assert_eq!(UnitSize::MediumRectangle.dimensions(), (300, Some(250)));
        assert_eq!(UnitSize::Adaptive { width: 411 }.dimensions(), (411, None));
    }
}
