//! # Skel Remap
//!
//! Skeleton joint auto-remapping for replacement meshes placed over captured skeletons.
//!
//! ## Features
//!
//! - **Layered Scene Model**: override-chain stage with references, opinion stacks and single-layer views
//! - **Binding Resolution**: recover the original skeleton binding of a replacement mesh
//! - **Joint Mapping**: leaf-name matching with optional positional fallback
//! - **Undoable Authoring**: every scene write is a command that can be undone and redone
//! - **Batch Workflow**: remap every bound prim under a new reference, collecting failures
//!
//! ### Example
//!
//! ```
//! use skel_remap::skeleton::{generate_joint_map, remap_joints};
//!
//! let captured = ["Hips", "Hips/Spine", "Hips/Spine/Head"];
//! let mesh = ["Root/Head", "Root/Hips"];
//! let map = generate_joint_map(&mesh, &captured, false).unwrap();
//! assert_eq!(map, vec![2, 0]);
//! assert_eq!(remap_joints(&map, &captured).unwrap(), vec!["Hips/Spine/Head", "Hips"]);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types, logging and shared macros
//! - [`config`]: Configuration loading
//! - [`scene`]: Layered scene model
//! - [`editor`]: Undo/redo command system
//! - [`skeleton`]: Joint remapping pipeline

/// Error types, logging initialization and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Layered scene model
pub mod scene;
/// Undo/redo command system and scene authoring commands
pub mod editor;
/// Skeleton joint remapping
pub mod skeleton;
