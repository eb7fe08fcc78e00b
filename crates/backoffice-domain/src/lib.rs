//! Domain types shared across Backoffice services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod alert;
pub mod kind;
pub mod menu_tree;
pub mod pagination;
pub mod permission;
pub mod template;
