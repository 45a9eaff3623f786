use crate::taxonomy::ResourceType;
use crate::Publication;

/// True when any subcategory classified as `resource_type` holds at least
/// one link. A publication therefore counts at most once per type, however
/// many of those subcategories are populated.
pub fn contains(publication: &Publication, resource_type: ResourceType) -> bool {
    resource_type
        .entries()
        .any(|e| !publication.links(e.category, e.sub_category).is_empty())
}

/// Per-type counts in `ResourceType::ALL` order.
pub fn tally<'a, I>(publications: I) -> [u64; ResourceType::ALL.len()]
where
    I: IntoIterator<Item = &'a Publication>,
{
    let mut counts = [0u64; ResourceType::ALL.len()];
    for publication in publications {
        for (slot, t) in counts.iter_mut().zip(ResourceType::ALL) {
            if contains(publication, t) {
                *slot += 1;
            }
        }
    }
    counts
}
