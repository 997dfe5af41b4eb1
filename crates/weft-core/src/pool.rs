//! Typed-key resource pool with scoped release.
//!
//! Process-wide reusable objects (script interpreters and the like) are
//! checked out per use and returned by the [`Pooled`] guard's `Drop`, so
//! the object goes back on every exit path — normal or error — and is
//! never held across requests.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tracing::debug;

/// Identifies one shelf of poolable objects of type `T`.
///
/// Two keys with the same name but different types address different
/// shelves.
pub struct PoolKey<T> {
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}

impl<T> PoolKey<T> {
	/// A key addressing the shelf `name` for objects of type `T`.
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	/// The shelf name.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl<T> fmt::Debug for PoolKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("PoolKey").field(&self.name).finish()
	}
}

type Shelf = Vec<Box<dyn Any + Send>>;

/// Stores idle reusable objects between uses.
pub struct Pool {
	shelves: Mutex<HashMap<(TypeId, &'static str), Shelf>>,
	capacity: usize,
}

impl Pool {
	/// A pool retaining at most `capacity` idle objects per shelf.
	pub fn new(capacity: usize) -> Self {
		Self {
			shelves: Mutex::new(HashMap::new()),
			capacity,
		}
	}

	/// Check an object out, creating one with `create` if the shelf is
	/// empty. The returned guard puts the object back when dropped.
	///
	/// # Examples
	///
	/// ```
	/// use weft_core::{Pool, PoolKey};
	///
	/// const BUFFERS: PoolKey<Vec<u8>> = PoolKey::new("buffers");
	///
	/// let pool = Pool::new(4);
	/// {
	///     let mut buf = pool.retrieve(&BUFFERS, || Vec::with_capacity(512));
	///     buf.push(1);
	/// } // returned here
	/// let buf = pool.retrieve(&BUFFERS, Vec::new);
	/// assert_eq!(buf.len(), 1);
	/// ```
	pub fn retrieve<T: Send + 'static>(
		&self,
		key: &PoolKey<T>,
		create: impl FnOnce() -> T,
	) -> Pooled<'_, T> {
		let idle = self
			.shelves
			.lock()
			.get_mut(&(TypeId::of::<T>(), key.name))
			.and_then(Vec::pop);
		let value = match idle.map(|boxed| boxed.downcast::<T>()) {
			Some(Ok(found)) => *found,
			// Shelves are keyed by TypeId, so a failed downcast cannot
			// happen through this API; recover by creating a new object.
			Some(Err(_)) | None => {
				debug!(key = key.name, "creating new pooled instance");
				create()
			}
		};
		Pooled {
			pool: self,
			name: key.name,
			value: Some(value),
		}
	}

	/// Number of idle objects on a shelf.
	pub fn idle_count<T: Send + 'static>(&self, key: &PoolKey<T>) -> usize {
		self.shelves
			.lock()
			.get(&(TypeId::of::<T>(), key.name))
			.map_or(0, Vec::len)
	}

	fn store(&self, type_id: TypeId, name: &'static str, value: Box<dyn Any + Send>) {
		let mut shelves = self.shelves.lock();
		let shelf = shelves.entry((type_id, name)).or_default();
		if shelf.len() < self.capacity {
			shelf.push(value);
		} else {
			debug!(key = name, "pool shelf full, discarding instance");
		}
	}
}

impl fmt::Debug for Pool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pool")
			.field("capacity", &self.capacity)
			.field("shelves", &self.shelves.lock().len())
			.finish()
	}
}

/// Scoped handle on a checked-out object; returns it to the pool on drop.
pub struct Pooled<'a, T: Send + 'static> {
	pool: &'a Pool,
	name: &'static str,
	value: Option<T>,
}

impl<T: Send + 'static> Deref for Pooled<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		self.value.as_ref().expect("pooled value present until drop")
	}
}

impl<T: Send + 'static> DerefMut for Pooled<'_, T> {
	fn deref_mut(&mut self) -> &mut T {
		self.value.as_mut().expect("pooled value present until drop")
	}
}

impl<T: Send + 'static> Drop for Pooled<'_, T> {
	fn drop(&mut self) {
		if let Some(value) = self.value.take() {
			self.pool.store(TypeId::of::<T>(), self.name, Box::new(value));
		}
	}
}
