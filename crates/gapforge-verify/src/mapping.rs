//! Knowledge-base classes to entity types.

use gapforge_core::EntityType;

const PERSON: &[&str] = &["Q5"];
const ORG: &[&str] = &[
    "Q4830453", // business
    "Q43229",   // organization
    "Q783794",  // company
    "Q891723",  // public company
];
const GPE: &[&str] = &[
    "Q515",     // city
    "Q6256",    // country
    "Q5119",    // capital
    "Q1549591", // big city
    "Q484170",  // commune of France
    "Q3624078", // sovereign state
    "Q35657",   // U.S. state
    "Q1637706", // city with millions of inhabitants
    "Q200250",  // metropolis
];
const PRODUCT: &[&str] = &[
    "Q2424752", // product
    "Q478798",  // software product
    "Q7397",    // software
];

/// Type of an entity from its `instance of` classes. When classes map to
/// several types, PERSON beats ORG beats GPE beats PRODUCT.
pub fn map_classes(instance_of: &[String]) -> Option<EntityType> {
    let by_priority: [(&[&str], EntityType); 4] = [
        (PERSON, EntityType::Person),
        (ORG, EntityType::Org),
        (GPE, EntityType::Gpe),
        (PRODUCT, EntityType::Product),
    ];
    by_priority
        .iter()
        .find(|(classes, _)| instance_of.iter().any(|c| classes.contains(&c.as_str())))
        .map(|(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_classes() {
        assert_eq!(map_classes(&classes(&["Q5"])), Some(EntityType::Person));
        assert_eq!(map_classes(&classes(&["Q783794"])), Some(EntityType::Org));
        assert_eq!(map_classes(&classes(&["Q1549591", "Q484170"])), Some(EntityType::Gpe));
        assert_eq!(map_classes(&classes(&["Q7397"])), Some(EntityType::Product));
    }

    #[test]
    fn test_type_priority_ignores_class_order() {
        assert_eq!(map_classes(&classes(&["Q11424", "Q43229", "Q5"])), Some(EntityType::Person));
        assert_eq!(map_classes(&classes(&["Q7397", "Q515", "Q783794"])), Some(EntityType::Org));
        assert_eq!(map_classes(&classes(&["Q2424752", "Q6256"])), Some(EntityType::Gpe));
        assert_eq!(map_classes(&classes(&["Q11424"])), None);
        assert_eq!(map_classes(&[]), None);
    }
}
