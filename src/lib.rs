//! Declarative canvas drawing for server-driven UI hooks.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A host
//! framework pushes lists of `(operation, arguments)` pairs from the server;
//! the crate replays them against the canvas 2D context, stamps reusable
//! templates once per instance row for batch scenes, coalesces redraws to one
//! per animation frame, and forwards pointer and keyboard input back to the
//! host as normalized payloads.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`hook`] | Browser binding ([`hook::EaselHook`]) and testable [`hook::HookCore`] |
//! | [`op`] | Wire ops, template mapping, `draw` payload |
//! | [`command`] | Typed command set and the op decoder |
//! | [`interp`] | Op interpreter with per-op failure isolation |
//! | [`instance`] | Instance rows, column layouts, palettes, batch rendering |
//! | [`surface`] | The [`surface::Surface`] seam and its `CanvasRenderingContext2d` impl |
//! | [`schedule`] | Animation-frame redraw coalescing |
//! | [`viewport`] | Device-pixel-ratio backing-buffer sizing |
//! | [`input`] | Forwarded input payloads |
//! | [`config`] | `data-*` attribute configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Wire names and limits |

use wasm_bindgen::prelude::*;

pub mod command;
pub mod config;
pub mod consts;
pub mod error;
pub mod hook;
pub mod input;
pub mod instance;
pub mod interp;
pub mod op;
pub mod schedule;
pub mod surface;
pub mod viewport;

/// Module start: route `log` to the browser console and panics to `console.error`.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        log::warn!("console logger not installed: {err}");
    }
}
