/// Path classification predicates.
pub mod paths;

/// Module list construction from resolved manifests.
pub mod modules;

/// Package dependency and dependent traversal.
pub mod packages;

pub use modules::{is_internal, ModuleGraphBuilder};
pub use packages::PackageGraphNavigator;
