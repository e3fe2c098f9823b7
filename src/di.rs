//! Dependency injection infrastructure.
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: make each field of the context extractable
//! - `#[derive(FromContext)]`: build a service by resolving each field
//!
//! ```ignore
//! let ctx = Context::new(catalog, config);
//! let query: QueryService = ctx.resolve();
//! let levels = LevelSelector::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use vademecum_macros::{Context, FromContext};
