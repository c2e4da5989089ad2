//! Arena holding every shape of a scene graph
//!
//! Shapes are addressed by [ShapeId] handles. A handle stays valid until the
//! shape is removed, after which it is rejected even if its slot is reused.

use math::AffineTransform;

use crate::{collision, Shape};

/// A handle to a shape inside a [Scene]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("{0:?} does not refer to a shape in this scene")]
    UnknownShape(ShapeId),

    #[error("{0:?} is not a collection")]
    NotACollection(ShapeId),

    #[error("{0:?} already belongs to a collection")]
    AlreadyParented(ShapeId),

    #[error("adding {child:?} to {parent:?} would create a cycle")]
    WouldCreateCycle { parent: ShapeId, child: ShapeId },

    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: ShapeId, child: ShapeId },
}

#[derive(Clone, Debug)]
struct Node {
    shape: Shape,
    parent: Option<ShapeId>,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes in the scene
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a shape to the scene, without a parent
    ///
    /// Children listed in an inserted collection are not adopted, collections
    /// always enter the scene empty.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        if let Some(children) = shape.children_mut() {
            if !children.is_empty() {
                log::debug!("Dropping {} stale children of inserted collection", children.len());
                children.clear();
            }
        }

        let node = Node {
            shape,
            parent: None,
        };

        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            ShapeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            ShapeId {
                index,
                generation: 0,
            }
        }
    }

    fn node(&self, id: ShapeId) -> Result<&Node, SceneError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(SceneError::UnknownShape(id))
    }

    fn node_mut(&mut self, id: ShapeId) -> Result<&mut Node, SceneError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(SceneError::UnknownShape(id))
    }

    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.node(id).is_ok()
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.node(id).ok().map(|node| &node.shape)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.node_mut(id).ok().map(|node| &mut node.shape)
    }

    /// The collection that owns `id`, if any
    #[must_use]
    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.node(id).ok().and_then(|node| node.parent)
    }

    /// The children of a collection, in insertion order
    ///
    /// Empty for anything that is not a collection.
    #[must_use]
    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        match self.get(id).map(Shape::geometry) {
            Some(crate::Geometry::Collection { children }) => children.as_slice(),
            _ => &[],
        }
    }

    /// Iterate over all shapes without a parent
    pub fn roots(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let node = slot.node.as_ref()?;
            node.parent.is_none().then_some(ShapeId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Make `child` a member of the collection `parent`
    ///
    /// Fails if `child` already has a parent or if `child` is `parent` itself
    /// or one of its ancestors.
    pub fn add_child(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SceneError> {
        let parent_node = self.node(parent)?;
        if !matches!(
            parent_node.shape.geometry(),
            crate::Geometry::Collection { .. }
        ) {
            return Err(SceneError::NotACollection(parent));
        }

        if self.node(child)?.parent.is_some() {
            return Err(SceneError::AlreadyParented(child));
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                log::warn!("Refusing to add {child:?} to {parent:?}, it is one of its ancestors");
                return Err(SceneError::WouldCreateCycle { parent, child });
            }
            ancestor = self.parent(current);
        }

        if let Some(children) = self.node_mut(parent)?.shape.children_mut() {
            children.push(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`, the child stays in the scene as a root
    pub fn remove_child(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SceneError> {
        let parent_node = self.node_mut(parent)?;
        let Some(children) = parent_node.shape.children_mut() else {
            return Err(SceneError::NotACollection(parent));
        };

        let Some(position) = children.iter().position(|&id| id == child) else {
            return Err(SceneError::NotAChild { parent, child });
        };
        children.remove(position);

        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Take a shape out of the scene
    ///
    /// The shape is detached from its parent and its children become roots.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, SceneError> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }

        let slot = &mut self.slots[id.index as usize];
        let Some(mut node) = slot.node.take() else {
            return Err(SceneError::UnknownShape(id));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.index);

        if let Some(children) = node.shape.children_mut() {
            for child in children.drain(..) {
                if let Ok(child_node) = self.node_mut(child) {
                    child_node.parent = None;
                }
            }
        }

        Ok(node.shape)
    }

    /// The matrix mapping the local coordinates of the parent of `id` to the root
    ///
    /// Identity for shapes without a parent.
    pub fn parent_transform(&self, id: ShapeId) -> Result<AffineTransform, SceneError> {
        let mut transform = AffineTransform::identity();
        let mut ancestor = self.node(id)?.parent;

        while let Some(current) = ancestor {
            let node = self.node(current)?;
            transform = transform.chain(node.shape.local_matrix());
            ancestor = node.parent;
        }
        Ok(transform)
    }

    /// The matrix mapping the local coordinates of `id` to the root
    ///
    /// Computed from scratch on every call.
    pub fn world_transform(&self, id: ShapeId) -> Result<AffineTransform, SceneError> {
        let local = self.node(id)?.shape.local_matrix();
        Ok(local.chain(self.parent_transform(id)?))
    }

    /// Whether the colliders of two shapes overlap in world space
    ///
    /// Always false unless both shapes have a collider.
    #[must_use]
    pub fn intersects(&self, a: ShapeId, b: ShapeId) -> bool {
        let (Ok(a_parent), Ok(b_parent)) = (self.parent_transform(a), self.parent_transform(b))
        else {
            return false;
        };
        let (Some(a), Some(b)) = (self.get(a), self.get(b)) else {
            return false;
        };

        collision::intersects_in(self, a, a_parent, b, b_parent)
    }
}
