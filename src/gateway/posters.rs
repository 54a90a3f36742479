//! Poster substitution with rating-overlay artwork.

use streamcat_common::Meta;

const RPDB_BASE_URL: &str = "https://api.ratingposterdb.com";

/// Replace each entry's poster with the rating poster for its IMDb id.
///
/// Entries whose id is not an IMDb id keep their poster. An empty key leaves
/// the list unchanged.
pub fn transform_posters(poster_key: &str, metas: &[Meta]) -> Vec<Meta> {
    let key = poster_key.trim();
    if key.is_empty() {
        return metas.to_vec();
    }

    metas
        .iter()
        .map(|meta| {
            let mut meta = meta.clone();
            if meta.id.starts_with("tt") {
                meta.poster = Some(format!(
                    "{RPDB_BASE_URL}/{key}/imdb/poster-default/{}.jpg?fallback=true",
                    meta.id
                ));
            }
            meta
        })
        .collect()
}
