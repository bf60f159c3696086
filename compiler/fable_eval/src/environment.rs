//! The environment chain.
//!
//! Each frame owns one [`Table`] as its user-bindings store plus a separate
//! map for system state (the loop counter). Name reads walk the chain;
//! writes land in the current frame, except that a temporary frame
//! redirects writes to its parent (call blocks mutate the caller's scope).
//!
//! Note that a read consults the frame table through the normal indexed
//! read, so a frame whose table carries an `always` default resolves every
//! name to that default before the parent is ever reached.

use rustc_hash::FxHashMap;

use crate::shared::Shared;
use crate::table::{Table, TableKey};
use crate::value::Value;

/// Keys of the per-frame system store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SysKey {
    /// The running counter a detect or splice drain exposes as `index`.
    LoopIndex,
}

#[derive(Debug)]
struct Frame {
    bindings: Shared<Table>,
    system: FxHashMap<SysKey, Value>,
    parent: Option<Environment>,
    temporary: bool,
}

/// A handle to one frame of the environment chain.
#[derive(Clone, Debug)]
pub struct Environment {
    frame: Shared<Frame>,
}

impl Environment {
    /// A root frame with no parent.
    pub fn root(bindings: Shared<Table>) -> Self {
        Environment::make(bindings, None, false)
    }

    /// A child frame over the given bindings table.
    pub fn child(&self, bindings: Shared<Table>) -> Self {
        Environment::make(bindings, Some(self.clone()), false)
    }

    /// A child frame whose writes are redirected to this frame.
    pub fn temporary_child(&self, bindings: Shared<Table>) -> Self {
        Environment::make(bindings, Some(self.clone()), true)
    }

    fn make(bindings: Shared<Table>, parent: Option<Environment>, temporary: bool) -> Self {
        Environment {
            frame: Shared::new(Frame {
                bindings,
                system: FxHashMap::default(),
                parent,
                temporary,
            }),
        }
    }

    /// Resolve a key against this frame's table, then the parent chain.
    pub fn get(&self, key: &TableKey) -> Option<Value> {
        let frame = self.frame.borrow();
        if let Some(value) = frame.bindings.borrow().get(key) {
            return Some(value);
        }
        frame.parent.as_ref().and_then(|parent| parent.get(key))
    }

    /// Bind a key in this frame, or in the parent for a temporary frame.
    pub fn set(&self, key: TableKey, value: Value) {
        let frame = self.frame.borrow();
        if frame.temporary {
            if let Some(parent) = &frame.parent {
                parent.set(key, value);
                return;
            }
        }
        frame.bindings.borrow_mut().set(key, value);
    }

    pub fn sys_get(&self, key: SysKey) -> Option<Value> {
        let frame = self.frame.borrow();
        if let Some(value) = frame.system.get(&key) {
            return Some(value.clone());
        }
        frame.parent.as_ref().and_then(|parent| parent.sys_get(key))
    }

    pub fn sys_set(&self, key: SysKey, value: Value) {
        self.frame.borrow_mut().system.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Num;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Value {
        Value::Number(Num::Int(n))
    }

    fn key(s: &str) -> TableKey {
        TableKey::Text(s.into())
    }

    #[test]
    fn reads_walk_the_chain_and_writes_stay_local() {
        let root = Environment::root(Shared::default());
        root.set(key("a"), int(1));

        let child = root.child(Shared::default());
        assert_eq!(child.get(&key("a")).map(|v| v.truthy()), Some(true));

        child.set(key("a"), int(2));
        let Some(Value::Number(Num::Int(n))) = root.get(&key("a")) else {
            panic!("expected a number");
        };
        assert_eq!(n, 1);
    }

    #[test]
    fn temporary_frames_write_through_to_the_parent() {
        let root = Environment::root(Shared::default());
        let temp = root.temporary_child(Shared::default());
        temp.set(key("x"), int(9));
        assert!(root.get(&key("x")).is_some());
    }

    #[test]
    fn a_frame_default_shadows_the_whole_parent_chain() {
        let root = Environment::root(Shared::default());
        root.set(key("a"), int(1));

        let bindings = Shared::<Table>::default();
        bindings.borrow_mut().set_default(int(0));
        let child = root.child(bindings);

        let Some(Value::Number(Num::Int(n))) = child.get(&key("a")) else {
            panic!("expected a number");
        };
        assert_eq!(n, 0);
    }

    #[test]
    fn loop_index_is_visible_from_nested_frames() {
        let root = Environment::root(Shared::default());
        root.sys_set(SysKey::LoopIndex, int(3));
        let child = root.child(Shared::default());
        assert!(child.sys_get(SysKey::LoopIndex).is_some());
        assert!(root.sys_get(SysKey::LoopIndex).is_some());
    }
}
