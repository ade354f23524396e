//! Typed ID definitions for the platform resources the CLI addresses.
//!
//! The platform assigns IDs; the CLI never generates one. Typing them keeps an
//! environment ID from being passed where an application ID is expected.

use crate::define_id;

// =============================================================================
// Organization and Project
// =============================================================================

define_id!(OrgId, "organization");
define_id!(ProjectId, "project");

// =============================================================================
// Environment Model
// =============================================================================

define_id!(EnvironmentId, "environment");
define_id!(ApplicationId, "application");
define_id!(DatabaseId, "database");

// =============================================================================
// Storage
// =============================================================================

define_id!(StorageId, "storage");
