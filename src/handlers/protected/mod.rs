// handlers/protected/mod.rs - Protected handlers
//
// Every route here sits behind `require_permission`; handlers can rely on
// `Extension<Claims>` being present.

pub mod drinks;
