pub mod would_you_rather;

use std::sync::Arc;

use crate::handler::HandlerRegistry;

/// Registry containing every game shipped with the crate
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    // Fresh registry, so registration cannot collide
    let _ = registry.register(Arc::new(would_you_rather::WouldYouRather));
    registry
}
