//! Integration tests exercising the full HTTP router over in-memory
//! directory and lease registry implementations.

mod helpers;

mod playback_test;
mod session_test;
