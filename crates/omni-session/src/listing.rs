//! The two fixed artifact listing queries

use crate::client::RestClient;
use omni_core::{ArtifactKind, ArtifactRef, Result};
use tracing::info;

/// Active process scripts, excluding integration procedures (those have no
/// compiled LWC and nothing to activate through the compiler page)
pub const SCRIPT_LISTING_QUERY: &str = "SELECT Id, UniqueName FROM OmniProcess \
     WHERE IsActive = true AND IsIntegrationProcedure = false";

/// Active UI cards
pub const CARD_LISTING_QUERY: &str =
    "SELECT Id, UniqueName FROM OmniUiCard WHERE IsActive = true";

/// List the script artifacts to activate, in listing order
pub async fn list_scripts(client: &RestClient) -> Result<Vec<ArtifactRef>> {
    let refs = fetch(client, SCRIPT_LISTING_QUERY, ArtifactKind::Script).await?;
    info!("Listed {} active scripts", refs.len());
    Ok(refs)
}

/// List the card artifacts to activate as one batch
pub async fn list_cards(client: &RestClient) -> Result<Vec<ArtifactRef>> {
    let refs = fetch(client, CARD_LISTING_QUERY, ArtifactKind::Card).await?;
    info!("Listed {} active cards", refs.len());
    Ok(refs)
}

async fn fetch(client: &RestClient, soql: &str, kind: ArtifactKind) -> Result<Vec<ArtifactRef>> {
    let rows = client.query(soql).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let name = row.unique_name.unwrap_or_else(|| row.id.clone());
            ArtifactRef::new(row.id, name, kind)
        })
        .collect())
}
