/// Minimal type-erased component storage.
///
/// Entities are plain indices; each component type gets its own column of
/// `Option`s. Enough for a scene with one globe, a handful of pins, and
/// their arcs.
pub struct World {
    entity_count: usize,
    columns: Vec<Box<dyn ComponentColumn>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entity_count: 0,
            columns: Vec::new(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn new_entity(&mut self) -> usize {
        let entity = self.entity_count;
        for column in self.columns.iter_mut() {
            column.push_none();
        }
        self.entity_count += 1;
        entity
    }

    pub fn attach<T: 'static>(&mut self, entity: usize, component: T) {
        for column in self.columns.iter_mut() {
            if let Some(column) = column.as_any_mut().downcast_mut::<Vec<Option<T>>>() {
                column[entity] = Some(component);
                return;
            }
        }

        // First component of this type: create its column and backfill
        // None for every existing entity.
        let mut column: Vec<Option<T>> = Vec::with_capacity(self.entity_count);
        for _ in 0..self.entity_count {
            column.push(None);
        }
        column[entity] = Some(component);
        self.columns.push(Box::new(column));
    }

    fn column<T: 'static>(&self) -> Option<&Vec<Option<T>>> {
        self.columns
            .iter()
            .find_map(|column| column.as_any().downcast_ref::<Vec<Option<T>>>())
    }

    pub fn get<T: 'static>(&self, entity: usize) -> Option<&T> {
        self.column::<T>()
            .and_then(|column| column.get(entity))
            .and_then(|slot| slot.as_ref())
    }

    /// Entities carrying both component types, in creation order.
    pub fn entities_with_pair<A: 'static, B: 'static>(&self) -> Vec<usize> {
        match (self.column::<A>(), self.column::<B>()) {
            (Some(a), Some(b)) => a
                .iter()
                .zip(b.iter())
                .enumerate()
                .filter(|(_, (a, b))| a.is_some() && b.is_some())
                .map(|(entity, _)| entity)
                .collect(),
            _ => Vec::new(),
        }
    }
}

trait ComponentColumn {
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
    fn push_none(&mut self);
}

impl<T: 'static> ComponentColumn for Vec<Option<T>> {
    fn as_any(&self) -> &dyn std::any::Any {
        self as &dyn std::any::Any
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self as &mut dyn std::any::Any
    }

    fn push_none(&mut self) {
        self.push(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);
    struct Weight(u32);

    #[test]
    fn attach_and_get_round_trip() {
        let mut world = World::new();
        let a = world.new_entity();
        world.attach(a, Label("globe"));
        assert_eq!(world.get::<Label>(a).unwrap().0, "globe");
        assert!(world.get::<Weight>(a).is_none());
    }

    #[test]
    fn pair_query_skips_partial_entities() {
        let mut world = World::new();
        let full = world.new_entity();
        world.attach(full, Label("pin"));
        world.attach(full, Weight(1));
        let partial = world.new_entity();
        world.attach(partial, Label("arc"));

        assert_eq!(world.entities_with_pair::<Label, Weight>(), vec![full]);
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn late_columns_backfill_existing_entities() {
        let mut world = World::new();
        let first = world.new_entity();
        let second = world.new_entity();
        world.attach(second, Weight(2));
        assert!(world.get::<Weight>(first).is_none());
        assert_eq!(world.get::<Weight>(second).unwrap().0, 2);
    }
}
