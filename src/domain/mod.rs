// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// The heart of the application: pure Rust types that define
// the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and enums
//
// Why keep this layer pure?
//   - Easy to unit test (no tensors, no filesystem)
//   - Easy to understand (no framework noise)
//
// Think of this layer as the "dictionary" of the system:
// it defines what things ARE, not how they work.

// The binary arithmetic operator a model is trained for
pub mod operation;

// The closed set of pipeline failure stages
pub mod error;
