use async_trait::async_trait;
use waymark_core::types::DbId;

/// A catalog artwork reference: the external id plus its display title.
///
/// The catalog may legitimately have no title for an artwork; that is not a
/// lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRef {
    pub external_id: DbId,
    pub title: Option<String>,
}

/// Outcome of a catalog lookup.
///
/// `NotFound` and `Unavailable` are treated identically by callers (the
/// external id cannot be attached either way) but are kept distinct so the
/// client can log transport problems without caching them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The catalog knows this id.
    Found(ArtworkRef),
    /// The catalog definitively does not know this id (cached).
    NotFound,
    /// The catalog could not be reached or answered unexpectedly (never
    /// cached).
    Unavailable,
}

impl Resolution {
    /// The resolved artwork, if the lookup succeeded.
    pub fn into_artwork(self) -> Option<ArtworkRef> {
        match self {
            Resolution::Found(artwork) => Some(artwork),
            Resolution::NotFound | Resolution::Unavailable => None,
        }
    }
}

/// Capability for resolving external catalog ids.
///
/// The production implementation is [`crate::CatalogClient`]; tests inject
/// fakes so handler logic can be exercised without the upstream service.
#[async_trait]
pub trait CatalogResolver: Send + Sync {
    async fn resolve(&self, external_id: DbId) -> Resolution;
}
