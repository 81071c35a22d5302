//! Load ordering derived from the declared referential links.
//!
//! A table is loaded only after every table it references. Ties keep the
//! declaration order of `Entity::ALL`. The order is advisory: the store
//! declares no foreign keys, so nothing rejects an out-of-order load.

use super::tables::Entity;

/// All ten entities in dependency order.
pub fn load_order() -> Vec<Entity> {
    let mut ordered: Vec<Entity> = Vec::with_capacity(Entity::ALL.len());
    let mut pending: Vec<Entity> = Entity::ALL.to_vec();

    while !pending.is_empty() {
        let ready = pending.iter().position(|entity| {
            entity
                .schema()
                .referenced_tables()
                .iter()
                .filter_map(|t| Entity::from_table_name(t))
                .filter(|dep| dep != entity)
                .all(|dep| ordered.contains(&dep))
        });
        match ready {
            Some(idx) => ordered.push(pending.remove(idx)),
            // Unreachable with the fixed declarations, which are acyclic.
            None => {
                ordered.append(&mut pending);
            }
        }
    }
    ordered
}

/// The requested entities, deduplicated and placed in dependency order.
pub fn order_subset(requested: &[Entity]) -> Vec<Entity> {
    load_order()
        .into_iter()
        .filter(|e| requested.contains(e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[Entity], entity: Entity) -> usize {
        order.iter().position(|e| *e == entity).unwrap()
    }

    #[test]
    fn referencing_tables_follow_their_targets() {
        let order = load_order();
        assert_eq!(order.len(), 10);
        assert_eq!(order[0], Entity::Individual);
        assert!(position(&order, Entity::SnpDefinition) < position(&order, Entity::Genotype));
        assert!(
            position(&order, Entity::IndelDefinition) < position(&order, Entity::IndelGenotype)
        );
    }

    #[test]
    fn subset_is_reordered_and_deduplicated() {
        let order = order_subset(&[Entity::Genotype, Entity::SnpDefinition, Entity::Genotype]);
        assert_eq!(order, vec![Entity::SnpDefinition, Entity::Genotype]);
    }
}
