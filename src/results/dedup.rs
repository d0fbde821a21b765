//! Duplicate suppression for sorted result lists

use super::types::SearchResult;

/// Radius for two POIs of the same category
const POI_RADIUS: f64 = 30.0;
/// Radius for natural features and route markers, which are large or repeated
const WIDE_POI_RADIUS: f64 = 10_000.0;
/// Radius for two address objects
const ADDRESS_RADIUS: f64 = 100.0;

/// Similarity radius for a pair of results, `None` if the pair is never a duplicate
fn similarity_radius(r1: &SearchResult, r2: &SearchResult) -> Option<f64> {
    match (r1.amenity(), r2.amenity()) {
        (Some(a1), Some(a2)) => {
            if a1.category != a2.category {
                None
            } else if a1.category == "natural" {
                Some(WIDE_POI_RADIUS)
            } else if a1.sub_type == a2.sub_type && a1.is_route_marker() {
                Some(WIDE_POI_RADIUS)
            } else {
                Some(POI_RADIUS)
            }
        }
        _ if r1.object_type.is_address() && r2.object_type.is_address() => Some(ADDRESS_RADIUS),
        _ => None,
    }
}

/// Whether `r2` duplicates `r1`: same name, both located, within the radius
pub fn same_search_result(r1: &SearchResult, r2: &SearchResult) -> bool {
    let (Some(l1), Some(l2)) = (r1.location.as_ref(), r2.location.as_ref()) else {
        return false;
    };
    if r1.locale_name != r2.locale_name {
        return false;
    }
    similarity_radius(r1, r2).is_some_and(|radius| l1.distance_to(l2) < radius)
}

/// Drop results that duplicate the previously kept one.
///
/// Single pass over an already sorted list; each result is only compared with
/// the last retained entry, and the earlier (higher ranked) one wins.
pub fn filter_duplicates(results: &mut Vec<SearchResult>) {
    let mut kept: Vec<SearchResult> = Vec::with_capacity(results.len());
    for result in results.drain(..) {
        let duplicate = kept
            .last()
            .is_some_and(|found| same_search_result(found, &result));
        if !duplicate {
            kept.push(result);
        }
    }
    *results = kept;
}
