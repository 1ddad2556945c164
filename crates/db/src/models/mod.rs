//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and a create DTO for inserts. Profile records are
//! append-only, so there is no update DTO.

pub mod profile;
