//! Singleton service capability.

use std::any::Any;
use std::sync::Arc;

use crate::error::ProviderInitError;

/// A service reachable through the router by name.
///
/// Instances are constructed on first request and cached for the lifetime of the
/// owning [`crate::Router`] (or until [`crate::Router::clear`]).
pub trait Provider: ProviderAny {}

/// Type-erasure helper implemented for every provider; enables [`downcast_provider`].
#[doc(hidden)]
pub trait ProviderAny: Any + Send + Sync {
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> ProviderAny for T {
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// No-argument constructor stored on service destinations.
pub type ProviderConstructor = fn() -> Result<Arc<dyn Provider>, ProviderInitError>;

pub(crate) fn construct_default<T>() -> Result<Arc<dyn Provider>, ProviderInitError>
where
	T: Provider + Default,
{
	Ok(Arc::new(T::default()))
}

/// Downcasts a cached provider to its concrete type.
pub fn downcast_provider<T: Provider>(provider: Arc<dyn Provider>) -> Option<Arc<T>> {
	provider.into_any().downcast::<T>().ok()
}
