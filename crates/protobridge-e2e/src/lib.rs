//! protobridge-e2e - End-to-end checks for generated wrappers
//!
//! The build script runs the generator over [`SCHEMA`] for both backends.
//! Integration tests include the generated Rust under `mod pb` and link it
//! against fake native kernels written in Rust, so no C++ toolchain is
//! involved. The heavy backend's C++ thunks are still generated and checked
//! against the Rust declarations.
//!
//! Heavy and light wrappers declare the same thunk symbols with different
//! signatures, so each backend gets its own test binary.

/// Schema every e2e wrapper is generated from
pub const SCHEMA: &str = include_str!("../schema/e2e.json");

/// Generator options used by the build script, minus the backend
pub const OPTIONS: &str = include_str!("../codegen.toml");

/// Generated heavy-backend Rust source
pub const HEAVY_RS: &str = include_str!(concat!(env!("OUT_DIR"), "/heavy/e2e.pb.rs"));

/// Generated heavy-backend C++ thunks
pub const HEAVY_CC: &str = include_str!(concat!(env!("OUT_DIR"), "/heavy/e2e.pb.thunks.cc"));

/// Generated light-backend Rust source
pub const LIGHT_RS: &str = include_str!(concat!(env!("OUT_DIR"), "/light/e2e.pb.rs"));

/// Generated container bridge declarations
pub const BRIDGE_CATALOG: &str = include_str!(concat!(env!("OUT_DIR"), "/bridge/catalog.rs"));
