use crate::Entity;

/// Container of related entities stored in an embedded field.
///
/// `Option<T>` holds an embedded table, `Vec<T>` an embedded list.
pub trait Relation: Default + Send + Sync {
    type Target: Entity;
    /// Holds at most one entity, only the first matching row is fetched.
    const SINGLE: bool;

    fn entities(&self) -> Vec<&Self::Target>;
    fn entities_mut(&mut self) -> Vec<&mut Self::Target>;
    /// Stores the entities fetched for this field.
    fn attach(&mut self, entities: Vec<Self::Target>);
}

impl<T: Entity> Relation for Option<T> {
    type Target = T;
    const SINGLE: bool = true;

    fn entities(&self) -> Vec<&T> {
        self.iter().collect()
    }
    fn entities_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }
    fn attach(&mut self, entities: Vec<T>) {
        if let Some(entity) = entities.into_iter().next() {
            *self = Some(entity);
        }
    }
}

impl<T: Entity> Relation for Vec<T> {
    type Target = T;
    const SINGLE: bool = false;

    fn entities(&self) -> Vec<&T> {
        self.iter().collect()
    }
    fn entities_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }
    fn attach(&mut self, entities: Vec<T>) {
        self.extend(entities);
    }
}
