// User profiles mirrored from the identity provider.

pub mod handlers;
